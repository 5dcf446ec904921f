use crate::errors::PollResult;
use crate::models::ApplicationRecord;

/// Query surface of the external broadcasting engine. One implementation
/// speaks the engine's HTTP API; tests substitute a scripted double.
pub trait BroadcastApi: Send + Sync {
    /// Current connection count for the application.
    fn connection_count(&self, app: &ApplicationRecord) -> PollResult<u64>;

    /// Names of the application's currently occupied channels.
    fn channel_names(&self, app: &ApplicationRecord) -> PollResult<Vec<String>>;
}
