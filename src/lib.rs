pub mod error;
pub mod fetch;
pub mod loader;
pub mod storage;
pub mod utils;

// Re-export common types
pub use error::LoadError;
pub use fetch::{Fetcher, FetchError, HttpFetcher};
pub use loader::{load, LoadOutcome};
