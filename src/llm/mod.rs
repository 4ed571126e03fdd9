pub mod anthropic;
pub mod factory;
pub mod http_client;
pub mod scrub;
pub mod traits;

pub use anthropic::AnthropicProvider;
pub use factory::create_provider;
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::{ChatFuture, ChatMessage, ChatProvider, MessageRole};
