pub mod config;
pub mod config_loader;
pub mod error;
pub mod notifier;
pub mod service;

pub use config::*;
pub use config_loader::*;
pub use error::*;
pub use notifier::{ConsoleNotifier, Level, Notifier, RecordingNotifier};
pub use service::*;
