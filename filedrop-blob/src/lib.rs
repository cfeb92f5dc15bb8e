pub mod error;
pub mod fs;
pub mod store;

pub use error::BlobError;
pub use fs::FsBlobStore;
pub use store::BlobStore;
