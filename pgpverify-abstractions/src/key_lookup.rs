// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Key lookup seam.
//!
//! The verifier never owns a keyring. Callers pass an implementation of `KeyLookup` that
//! maps an issuer to key material plus a validity classification.

use crate::{IssuerRef, ResolvedKey};

#[derive(thiserror::Error, Debug)]
pub enum KeyLookupError {
    #[error("{0}")]
    Message(String),

    #[error("key store unavailable: {0}")]
    Unavailable(String),
}

/// Resolves signature issuers to public keys.
///
/// Contract:
/// - Return `Ok(None)` when no key matches (reported as `KEY_MISSING`).
/// - Return `Ok(Some(key))` with the key whose fingerprint matches the issuer. For key-ID
///   issuers any key whose fingerprint ends in that ID may be returned.
/// - Return `Err(...)` when the lookup itself failed; the verifier records it and moves on.
///
/// The verifier calls `resolve` at most once per signature and never retries.
pub trait KeyLookup: Sync {
    fn resolve(&self, issuer: &IssuerRef) -> Result<Option<ResolvedKey>, KeyLookupError>;
}

impl<T: KeyLookup + ?Sized> KeyLookup for &T {
    fn resolve(&self, issuer: &IssuerRef) -> Result<Option<ResolvedKey>, KeyLookupError> {
        (**self).resolve(issuer)
    }
}

impl<T: KeyLookup + ?Sized> KeyLookup for Box<T> {
    fn resolve(&self, issuer: &IssuerRef) -> Result<Option<ResolvedKey>, KeyLookupError> {
        (**self).resolve(issuer)
    }
}
