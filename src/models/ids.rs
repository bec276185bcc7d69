use uuid::Uuid;

/// Prefix for application record IDs
pub const APPLICATION_ID_PREFIX: &str = "app-";

/// Prefix for knowledge-base entry IDs
pub const KB_ID_PREFIX: &str = "kb-";

/// Generate a record ID: `prefix` followed by 8 lowercase hex characters.
///
/// The 4 random bytes come from a v4 UUID, which draws from the OS RNG.
/// No collision check is made against existing records.
pub fn generate_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4();
    let mut id = String::with_capacity(prefix.len() + 8);
    id.push_str(prefix);
    for byte in &uuid.as_bytes()[..4] {
        id.push_str(&format!("{:02x}", byte));
    }
    id
}
