pub mod client;
pub mod error;
pub mod transport;

pub use client::{
    retry_after_delay, SlackNotifier, DEFAULT_TIMEOUT_SECS, MAX_RETRY_AFTER_SECS, SLACK_API_BASE,
};
pub use error::{NotificationError, TransportError};
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, Sleeper, TokioSleeper,
};
