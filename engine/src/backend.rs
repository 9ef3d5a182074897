//! Seam between the mini-game and the pet-stat backend.

use futures::future::BoxFuture;
use petarcade_types::{Stat, StatUpdate};

/// Error from a stat backend call.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// One increment per call against the backend.
///
/// Implementations must issue exactly one request per invocation and must not
/// batch or reorder; settlement relies on awaiting each call before issuing
/// the next.
pub trait StatBackend: Send + Sync {
    /// Increment `stat` for `pet_id` and return the backend's update.
    fn increase_stat(
        &self,
        stat: Stat,
        pet_id: u64,
    ) -> BoxFuture<'_, Result<StatUpdate, BackendError>>;
}
