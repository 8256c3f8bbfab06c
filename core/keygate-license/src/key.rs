//! Product key normalization.

/// Returns the canonical form of a submitted product key.
///
/// Every `-` is removed. Nothing else changes: no case folding and no
/// whitespace trimming, so `" 1111-2222"` keeps its leading space.
#[must_use]
pub fn normalize(raw_key: &str) -> String {
    raw_key.chars().filter(|c| *c != '-').collect()
}
