//! Built-in request handlers
//!
//! Ready-to-use handlers shared by both services.

pub mod health;
pub mod static_files;

pub use health::health;
pub use static_files::{StaticFileConfig, StaticFiles};
