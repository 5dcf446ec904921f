//! Error taxonomy, one file per domain.

mod poll_error;
mod provider_error;
mod store_error;
mod validation_error;

pub use poll_error::{CollectError, PollError, PollResult};
pub use provider_error::{ProviderError, ProviderResult};
pub use store_error::{StoreError, StoreResult};
pub use validation_error::ValidationError;
