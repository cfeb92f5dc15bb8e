use uuid::Uuid;

/// Generate an opaque file identifier: 32 lowercase hex characters.
///
/// Backed by a v4 UUID, i.e. 16 bytes from the operating system's
/// cryptographic entropy source. Collisions are treated as impossible for
/// the lifetime of a process; a duplicate identifier reaching the registry
/// is a programming error, not a runtime condition.
pub fn generate_file_id() -> String {
    Uuid::new_v4().simple().to_string()
}
