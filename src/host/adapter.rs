//! Adapter trait for fetching release candidates from a hosting platform

use crate::host::HostKind;
use crate::host::error::HostError;
use crate::version::select::RawCandidate;

/// Trait for fetching raw release candidates from a host.
///
/// Adapters own all network and format concerns for their platform; what
/// they return is plain candidate data for the version engine. Candidates
/// carry their `host_order_rank` so the selector can break version ties in
/// host-native order.
#[async_trait::async_trait]
pub trait HostAdapter: Send + Sync {
    /// Returns the platform this adapter handles.
    fn kind(&self) -> HostKind;

    /// Fetches release candidates for a project.
    ///
    /// # Arguments
    /// * `project` - Host-native project path (e.g. "mautic/mautic" on
    ///   GitHub, a page title on Wikipedia)
    ///
    /// # Returns
    /// * `Ok(Vec<RawCandidate>)` - Candidates in host-native order; may be
    ///   empty for a project with no releases
    /// * `Err(HostError)` - If the fetch fails
    async fn fetch_candidates(&self, project: &str) -> Result<Vec<RawCandidate>, HostError>;
}
