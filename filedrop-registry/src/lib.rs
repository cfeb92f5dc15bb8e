pub mod error;
pub mod memory;
pub mod registry;

pub use error::RegistryError;
pub use memory::MemoryRegistry;
pub use registry::MetadataRegistry;
