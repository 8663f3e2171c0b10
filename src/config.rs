pub use self::parser::{Config, LoggingConfig, SlackConfig};
pub use self::validator::ConfigError;

mod parser;
mod validator;
