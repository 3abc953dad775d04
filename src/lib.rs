// Re-export needed modules for testing
pub mod attachment;  // File intake and transient references
pub mod clipboard;
pub mod error;
pub mod models;
pub mod notifications;  // Toasts
pub mod seed;
pub mod session;  // Message store and view controller
pub mod settings;

// Re-export main types for convenience
pub use error::{ChatError, Result};
pub use models::*;
pub use session::{MessageStore, Session};
