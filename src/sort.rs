//! Key ordering helper for presenting table keys alphabetically.

/// Sort string keys in place, ascending by byte order.
pub fn sort_keys<S: AsRef<str>>(keys: &mut [S]) {
    keys.sort_unstable_by(|a, b| a.as_ref().cmp(b.as_ref()));
}
