//! Version engine: sanitization, filtering, and selection
//!
//! This is the decision-making core of the tool. Host adapters deliver raw
//! candidates; everything from free-form text to the final "latest release"
//! answer happens here.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Sanitizer  │────▶│   Filter    │────▶│  Selector   │
//! │ (text→ver)  │     │  (policy)   │     │ (max fold)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │   Version   │                         │ Selection   │
//! │ (ordering)  │                         │   Result    │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`value`]: immutable [`Version`] with its total order and rendering
//! - [`sanitize`]: heuristics turning raw tag/title text into a version
//! - [`filter`]: [`FilterPolicy`] and the `only`/`exclude` mini-language
//! - [`select`]: the fold that picks the latest accepted candidate

pub mod filter;
pub mod sanitize;
pub mod select;
pub mod value;

pub use filter::FilterPolicy;
pub use sanitize::Sanitizer;
pub use select::{RawCandidate, SelectionResult, select};
pub use value::Version;
