pub mod metrics;
pub mod providers;

pub use providers::{GenerationParams, ProviderError, TextProvider};
