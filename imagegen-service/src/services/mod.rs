pub mod metrics;
pub mod providers;
pub mod relay;

pub use relay::relay_prompt;
