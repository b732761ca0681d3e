pub mod env;
pub mod schema;

pub use env::load_env_file;
pub use schema::{Config, NotifyConfig, SlackConfig, ENV_PREFIX};
