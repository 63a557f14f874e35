// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-signature hash and verify.
//!
//! Order of checks for one signature:
//! 1. signature type, hash policy and algorithm support (no key lookup on failure)
//! 2. exactly one key lookup
//! 3. digest, hash prefix and public-key verification
//!
//! Expiry is evaluated independently of the cryptographic result.

use pgpverify_abstractions::{ErrorCode, ErrorSource, ErrorValue, IssuerRef, KeyLookup, ResolvedKey};
use pgpverify_packets::SignaturePacket;

use crate::hashing::compute_digest;
use crate::signature_verifier::verify_digest;
use crate::VerifyOptions;

/// What the cryptographic check concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoVerdict {
    /// The signature value verifies.
    Good,
    /// Digest or signature value mismatch.
    Bad,
    /// The issuer could not be resolved; nothing was checked.
    KeyMissing,
    /// The hash algorithm is refused by policy; nothing was checked.
    PolicyRejected,
    /// The signature could not be checked at all.
    Error(ErrorValue),
}

impl CryptoVerdict {
    pub fn is_good(&self) -> bool {
        matches!(self, CryptoVerdict::Good)
    }
}

/// Everything the trust evaluator needs about one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCheck {
    pub verdict: CryptoVerdict,
    /// The resolved signing key, if lookup succeeded.
    pub key: Option<ResolvedKey>,
    pub sig_expired: bool,
    pub key_expired: bool,
}

impl SignatureCheck {
    fn new(verdict: CryptoVerdict, sig: &SignaturePacket, at: u64) -> Self {
        Self {
            verdict,
            key: None,
            sig_expired: sig.expiration_time().is_some_and(|exp| exp <= at),
            key_expired: false,
        }
    }

    pub fn revoked(&self) -> bool {
        self.key.as_ref().is_some_and(|k| k.revoked)
    }
}

fn engine_error(code: ErrorCode) -> CryptoVerdict {
    CryptoVerdict::Error(ErrorValue::new(ErrorSource::Engine, code))
}

/// Check one decoded signature over `signed_data`.
///
/// `at` is the verification time in seconds since the epoch.
pub fn check_signature(
    sig: &SignaturePacket,
    signed_data: &[u8],
    keys: &dyn KeyLookup,
    options: &VerifyOptions,
    at: u64,
) -> SignatureCheck {
    if !sig.signature_type.is_document() {
        tracing::warn!(sig_type = sig.signature_type.id(), "not a document signature");
        return SignatureCheck::new(engine_error(ErrorCode::UnsupportedSignatureType), sig, at);
    }
    if options.is_hash_rejected(sig.hash_algorithm) {
        tracing::warn!(hash = sig.hash_algorithm.name(), "hash algorithm rejected by policy");
        return SignatureCheck::new(CryptoVerdict::PolicyRejected, sig, at);
    }
    if !sig.hash_algorithm.is_computable() || !sig.public_key_algorithm.is_verifiable() {
        tracing::warn!(
            pk = sig.public_key_algorithm.name(),
            hash = sig.hash_algorithm.name(),
            "unsupported algorithm"
        );
        return SignatureCheck::new(engine_error(ErrorCode::UnsupportedAlgorithm), sig, at);
    }

    let Some(issuer) = sig.issuer.as_ref() else {
        tracing::debug!("signature names no issuer");
        return SignatureCheck::new(CryptoVerdict::KeyMissing, sig, at);
    };

    let key = match resolve(keys, issuer) {
        Ok(Some(key)) => key,
        Ok(None) => return SignatureCheck::new(CryptoVerdict::KeyMissing, sig, at),
        Err(status) => return SignatureCheck::new(CryptoVerdict::Error(status), sig, at),
    };

    let verdict = verify_with_key(sig, signed_data, &key);
    let mut check = SignatureCheck::new(verdict, sig, at);
    check.key_expired = key.is_expired_at(at);
    check.key = Some(key);
    check
}

fn resolve(keys: &dyn KeyLookup, issuer: &IssuerRef) -> Result<Option<ResolvedKey>, ErrorValue> {
    match keys.resolve(issuer) {
        Ok(Some(key)) => {
            tracing::debug!(%issuer, fingerprint = %key.fingerprint, "resolved signing key");
            Ok(Some(key))
        }
        Ok(None) => {
            tracing::debug!(%issuer, "signing key not found");
            Ok(None)
        }
        Err(e) => {
            tracing::warn!(%issuer, error = %e, "key lookup failed");
            Err(ErrorValue::new(ErrorSource::KeyLookup, ErrorCode::KeyLookupFailed))
        }
    }
}

fn verify_with_key(sig: &SignaturePacket, signed_data: &[u8], key: &ResolvedKey) -> CryptoVerdict {
    if !key.material.supports(sig.public_key_algorithm) {
        return engine_error(ErrorCode::WrongPublicKeyAlgorithm);
    }

    let Some(digest) = compute_digest(sig, signed_data) else {
        return engine_error(ErrorCode::UnsupportedAlgorithm);
    };
    if digest.get(..2) != Some(&sig.hash_prefix[..]) {
        tracing::debug!(
            expected = ?sig.hash_prefix,
            computed = ?digest.get(..2),
            "hash prefix mismatch"
        );
        return CryptoVerdict::Bad;
    }

    match verify_digest(&key.material, sig, &digest) {
        Ok(()) => CryptoVerdict::Good,
        Err(f) if f.code == ErrorCode::CryptoMismatch => {
            tracing::debug!(reason = %f, "bad signature");
            CryptoVerdict::Bad
        }
        Err(f) => {
            tracing::warn!(reason = %f, "signature could not be checked");
            engine_error(f.code)
        }
    }
}
