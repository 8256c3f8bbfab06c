use keygate_license::{normalize, StaticKeyDirectory};
use proptest::prelude::*;

const KNOWN_KEYS: [&str; 2] = ["123456789101", "111122223333"];

/// Inserts a dash before each position flagged in `mask`.
fn with_dashes(key: &str, mask: &[bool]) -> String {
    let mut out = String::new();
    for (i, c) in key.chars().enumerate() {
        if mask.get(i).copied().unwrap_or(false) {
            out.push('-');
        }
        out.push(c);
    }
    out
}

#[test]
fn dashed_and_plain_resolve_to_same_record() {
    let dir = StaticKeyDirectory::builtin();
    let dashed = dir.get(&normalize("1234-5678-9101")).unwrap();
    let plain = dir.get(&normalize("123456789101")).unwrap();
    assert_eq!(dashed, plain);
}

proptest! {
    #[test]
    fn dashes_anywhere_normalize_to_canonical(
        idx in 0usize..KNOWN_KEYS.len(),
        mask in proptest::collection::vec(any::<bool>(), 13),
        trailing in 0usize..3,
    ) {
        let key = KNOWN_KEYS[idx];
        let raw = format!("{}{}", with_dashes(key, &mask), "-".repeat(trailing));
        prop_assert_eq!(normalize(&raw), key);
    }

    #[test]
    fn output_never_contains_dashes(raw in ".*") {
        let out = normalize(&raw);
        prop_assert!(!out.contains('-'));
        prop_assert_eq!(out.chars().count(), raw.chars().filter(|c| *c != '-').count());
    }

    #[test]
    fn idempotent(raw in ".*") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once.clone());
    }
}
