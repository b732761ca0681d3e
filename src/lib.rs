pub mod config;
pub mod message;
pub mod payload;
pub mod slack;

pub use message::{build_message, DEFAULT_MESSAGE};
pub use payload::{load_payload, read_payload};
pub use slack::{NotificationError, SlackNotifier};
