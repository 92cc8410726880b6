//! Interactive surfaces for clinical narrative synthesis: an HTTP service
//! with per-session drafts and a one-shot terminal command.

pub mod error;
pub mod generate;
pub mod logging;
pub mod sessions;
pub mod web;

pub use error::ApiError;
pub use generate::{Destination, generate, read_notes};
pub use logging::init_logging;
pub use sessions::SessionRegistry;
pub use web::{AppState, app, serve};
