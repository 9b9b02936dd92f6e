pub mod config;
pub mod error;
pub mod types;

pub use config::LexivoxConfig;
pub use error::{LexivoxError, Result};
pub use types::{Chunk, RetrievalResult};
