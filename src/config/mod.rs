mod env_overrides;
mod loader;
mod locale;
pub mod schema;
#[cfg(test)]
mod test_env;

pub use locale::{SUPPORTED_LOCALES, detect_locale};
pub use schema::{Config, InterviewConfig, LlmConfig, MetricsConfig, ProfileConfig};
