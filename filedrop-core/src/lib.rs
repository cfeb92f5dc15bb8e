pub mod id;
pub mod record;
pub mod retention;
pub mod sanitize;

pub use id::generate_file_id;
pub use record::{FileRecord, format_file_size};
pub use retention::RetentionPeriod;
pub use sanitize::{file_extension, sanitize_file_name};
