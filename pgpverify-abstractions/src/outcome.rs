// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Verification result types.
//!
//! The verifier reports per-signature outcomes as data rather than errors. A verify call
//! that returns a report only tells the caller the input was well formed; each outcome's
//! `summary` and `status` must be inspected to learn whether that signature is good.

use crate::{ErrorValue, HashAlgorithm, PublicKeyAlgorithm, SigSummary, Validity};

/// Status of one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureOutcome {
    pub summary: SigSummary,
    /// Hex fingerprint of the signing key (which may be a subkey).
    ///
    /// When the key could not be resolved this is the issuer fingerprint or key ID taken
    /// from the signature, or empty if the signature names no issuer.
    pub fingerprint: String,
    pub status: ErrorValue,
    /// Signature creation time, seconds since the epoch. `0` if unavailable.
    pub timestamp: u64,
    /// Signature expiration time, seconds since the epoch. `0` if the signature never expires.
    pub exp_timestamp: u64,
    pub validity: Validity,
    pub validity_reason: ErrorValue,
    pub public_key_algorithm: Option<PublicKeyAlgorithm>,
    pub hash_algorithm: Option<HashAlgorithm>,
}

impl SignatureOutcome {
    /// An outcome with no information beyond a failure status.
    pub fn failed(summary: SigSummary, status: ErrorValue) -> Self {
        Self {
            summary,
            fingerprint: String::new(),
            status,
            timestamp: 0,
            exp_timestamp: 0,
            validity: Validity::Unknown,
            validity_reason: ErrorValue::SUCCESS,
            public_key_algorithm: None,
            hash_algorithm: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.summary.contains(SigSummary::VALID)
    }
}

/// Result of one verify call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerifyReport {
    /// One entry per signature packet, in the order the signatures appear in the input.
    pub signatures: Vec<SignatureOutcome>,
    /// Original file name of the embedded plaintext, if the message carried one.
    ///
    /// Not covered by the signature. Never use it for security decisions.
    pub file_name: Option<String>,
}

impl VerifyReport {
    pub fn iter(&self) -> std::slice::Iter<'_, SignatureOutcome> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// True when there is at least one signature and every signature is `VALID`.
    pub fn all_valid(&self) -> bool {
        !self.signatures.is_empty() && self.signatures.iter().all(SignatureOutcome::is_valid)
    }
}

impl<'a> IntoIterator for &'a VerifyReport {
    type Item = &'a SignatureOutcome;
    type IntoIter = std::slice::Iter<'a, SignatureOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.signatures.iter()
    }
}
