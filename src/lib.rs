pub mod collection;
pub mod compose;
pub mod config;
pub mod error;
pub mod generator;
pub mod history;
pub mod http;
pub mod logger;
pub mod session;
pub mod utils;
pub mod variable;

// Re-export commonly used types
pub use error::{Result, RureqError};
