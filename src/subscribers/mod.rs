//! Subscriber API: hook into scheduler lifecycle events.

mod log;
mod subscribe;

pub use log::LogWriter;
pub use subscribe::Subscribe;
