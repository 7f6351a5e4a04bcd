use latestver::version::filter::FilterPolicy;
use latestver::version::sanitize::Sanitizer;
use latestver::version::select::{RawCandidate, select};
use latestver::version::value::Version;

fn candidates(texts: &[&str]) -> Vec<RawCandidate> {
    texts
        .iter()
        .enumerate()
        .map(|(rank, text)| RawCandidate::new(*text, rank))
        .collect()
}

fn selected(texts: &[&str], policy: &FilterPolicy) -> Option<String> {
    select(candidates(texts), policy).map(|r| r.version.to_string())
}

#[test]
fn even_filter_selects_the_even_minor_release() {
    let policy = FilterPolicy::new().even(true);
    assert_eq!(
        selected(&["1.3.0", "1.4.0", "1.5.2"], &policy),
        Some("1.4.0".to_string())
    );
}

#[test]
fn major_filter_pins_the_release_line() {
    let policy = FilterPolicy::new().with_major("1").unwrap();
    assert_eq!(
        selected(&["1.9.0", "2.0.0", "2.1.3"], &policy),
        Some("1.9.0".to_string())
    );
}

#[test]
fn pre_releases_lose_to_stable_when_not_accepted() {
    let policy = FilterPolicy::new();
    assert_eq!(
        selected(&["3.0.0rc1", "2.9.9"], &policy),
        Some("2.9.9".to_string())
    );

    let policy = policy.pre_ok(true);
    assert_eq!(
        selected(&["3.0.0rc1", "2.9.9"], &policy),
        Some("3.0.0rc1".to_string())
    );
}

#[test]
fn versionless_titles_yield_no_selection() {
    assert_eq!(selected(&["Release Notes", "Changelog"], &FilterPolicy::new()), None);
}

#[test]
fn prose_and_markers_survive_the_full_pipeline() {
    let policy = FilterPolicy::new().pre_ok(true);

    // descriptive words stripped
    assert_eq!(
        selected(&["Version 1.2.3 Stable Release"], &policy),
        Some("1.2.3".to_string())
    );
    // developmental words rewritten
    assert_eq!(
        selected(&["Test devel 1.2"], &policy),
        Some("1.2.dev0".to_string())
    );
    // patch convention rewritten
    assert_eq!(
        selected(&["2.3.4-p2"], &policy),
        Some("2.3.4.post2".to_string())
    );
}

#[test]
fn selection_combines_filters_with_ordering() {
    let policy = FilterPolicy::new()
        .with_only("~^release-")
        .unwrap()
        .even(true);

    let result = select(
        candidates(&[
            "release-1.3.9",
            "release-1.4.2",
            "nightly-1.6.0",
            "release-1.4.1",
        ]),
        &policy,
    )
    .unwrap();

    assert_eq!(result.version.to_string(), "1.4.2");
    assert_eq!(result.candidate.text, "release-1.4.2");
}

#[test]
fn version_ordering_is_total_and_transitive() {
    let sanitizer = Sanitizer::new();
    let inputs = [
        "1.0.0.dev0", "1.0.0a1", "1.0.0b2", "1.0.0rc1", "1.0.0", "1.0.0.post1", "1.0.1",
        "1.2", "1.2.0", "2!0.1",
    ];
    let versions: Vec<Version> = inputs
        .iter()
        .map(|s| sanitizer.sanitize(s).unwrap())
        .collect();

    for a in &versions {
        for b in &versions {
            let lt = a < b;
            let eq = a == b;
            let gt = a > b;
            assert_eq!(
                u8::from(lt) + u8::from(eq) + u8::from(gt),
                1,
                "exactly one relation must hold for {a} vs {b}"
            );
            for c in &versions {
                if a < b && b < c {
                    assert!(a < c, "transitivity broken for {a} < {b} < {c}");
                }
            }
        }
    }
}

#[test]
fn sanitizing_the_canonical_rendering_is_idempotent() {
    let sanitizer = Sanitizer::new();
    for input in ["v1.2.3", "Test devel 1.2", "2.3.4-p2", "1.0.0rc1", "2!1.0+local"] {
        let first = sanitizer.sanitize(input).unwrap();
        let again = sanitizer.sanitize(&first.to_string()).unwrap();
        assert_eq!(first, again);
        assert_eq!(first.to_string(), again.to_string());
    }
}
