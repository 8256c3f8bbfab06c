//! Shared test helpers for license tests.

#![allow(dead_code)]

use async_trait::async_trait;
use keygate_license::{
    KeyDirectory, LicenseError, LicenseGate, LicenseResult, ProductKeyRecord, StaticKeyDirectory,
    TokenService,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-signing-secret";

pub fn test_tokens() -> TokenService {
    TokenService::new(TEST_SECRET).unwrap()
}

/// A gate over the builtin directory signed with [`TEST_SECRET`].
pub fn builtin_gate() -> LicenseGate {
    LicenseGate::new(Arc::new(StaticKeyDirectory::builtin()), test_tokens())
}

/// Directory wrapper that counts lookups.
pub struct CountingDirectory {
    inner: StaticKeyDirectory,
    lookups: AtomicUsize,
}

impl CountingDirectory {
    pub fn new(inner: StaticKeyDirectory) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyDirectory for CountingDirectory {
    async fn lookup(&self, canonical_key: &str) -> LicenseResult<Option<ProductKeyRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(canonical_key).await
    }
}

/// Directory whose backend always fails.
pub struct BrokenDirectory;

#[async_trait]
impl KeyDirectory for BrokenDirectory {
    async fn lookup(&self, _canonical_key: &str) -> LicenseResult<Option<ProductKeyRecord>> {
        Err(LicenseError::Directory("backend unavailable".into()))
    }
}

/// Replaces one character in the signature segment of a JWT.
pub fn tamper_signature(token: &str) -> String {
    let (head, sig) = token.rsplit_once('.').unwrap();
    let mut chars: Vec<char> = sig.chars().collect();
    let idx = chars.len() / 2;
    chars[idx] = if chars[idx] == 'A' { 'B' } else { 'A' };
    format!("{head}.{}", chars.into_iter().collect::<String>())
}
