use rand::Rng;

/// Record identifiers are opaque 24-character lowercase hex strings.
pub type EntityId = String;

/// Length of every generated [`EntityId`].
pub const ENTITY_ID_LEN: usize = 24;

/// Generate a fresh entity id.
///
/// Layout: 4 bytes of big-endian Unix seconds followed by 8 random bytes,
/// hex encoded. Ids generated later sort after earlier ones at second
/// granularity.
pub fn new_entity_id() -> EntityId {
    let seconds = chrono::Utc::now().timestamp() as u32;
    let random: [u8; 8] = rand::rng().random();

    let mut id = String::with_capacity(ENTITY_ID_LEN);
    for byte in seconds.to_be_bytes().iter().chain(random.iter()) {
        id.push_str(&format!("{byte:02x}"));
    }
    id
}

/// Whether `value` has the shape of an entity id (24 hex digits).
pub fn is_entity_id(value: &str) -> bool {
    value.len() == ENTITY_ID_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}
