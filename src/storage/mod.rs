pub mod files;

// Re-export common functions
pub use files::{create_dir, exists, write_atomic};
