//! Per-run suffixes that keep resource names from colliding.

/// Length of a generated suffix.
pub const UNIQUE_ID_LEN: usize = 6;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a short random suffix for resource names.
///
/// Format: 6 lowercase ASCII letters or digits, so it stays valid inside
/// container registry names that only accept alphanumerics.
/// Entropy sources: nanosecond timestamp and two independent `RandomState` hashes.
#[must_use]
pub fn unique_id() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    hasher.write_u64(RandomState::new().build_hasher().finish());
    hasher.write_u64(RandomState::new().build_hasher().finish());
    encode(hasher.finish())
}

fn encode(mut value: u64) -> String {
    let base = ALPHABET.len() as u64;
    let mut out = String::with_capacity(UNIQUE_ID_LEN);
    for _ in 0..UNIQUE_ID_LEN {
        #[allow(clippy::cast_possible_truncation)] // remainder is < 36
        out.push(char::from(ALPHABET[(value % base) as usize]));
        value /= base;
    }
    out
}
