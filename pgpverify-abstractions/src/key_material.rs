// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Public key material handed to the verifier by a key lookup.

use crate::{EccCurve, Fingerprint, PublicKeyAlgorithm, Validity};

/// Algorithm-specific public key parameters.
///
/// Integers are unsigned big-endian with leading zeros stripped (OpenPGP MPI contents).
#[derive(Clone, PartialEq, Eq)]
pub enum PublicKeyMaterial {
    Rsa { n: Vec<u8>, e: Vec<u8> },
    Dsa { p: Vec<u8>, q: Vec<u8>, g: Vec<u8>, y: Vec<u8> },
    /// SEC1-encoded point (normally uncompressed, `0x04 || x || y`).
    Ecdsa { curve: EccCurve, point: Vec<u8> },
    /// Prefixed native point: `0x40 || A`.
    EdDsaLegacy { curve: EccCurve, point: Vec<u8> },
    /// Material this crate does not interpret (encryption-only keys, unknown curves).
    Other { algorithm_id: u8, params: Vec<u8> },
}

impl PublicKeyMaterial {
    /// Whether a signature made with `alg` can be checked against this material.
    pub fn supports(&self, alg: PublicKeyAlgorithm) -> bool {
        match self {
            PublicKeyMaterial::Rsa { .. } => {
                matches!(alg, PublicKeyAlgorithm::Rsa | PublicKeyAlgorithm::RsaSignOnly)
            }
            PublicKeyMaterial::Dsa { .. } => alg == PublicKeyAlgorithm::Dsa,
            PublicKeyMaterial::Ecdsa { .. } => alg == PublicKeyAlgorithm::Ecdsa,
            PublicKeyMaterial::EdDsaLegacy { .. } => alg == PublicKeyAlgorithm::EdDsaLegacy,
            PublicKeyMaterial::Other { .. } => false,
        }
    }
}

impl std::fmt::Debug for PublicKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublicKeyMaterial::Rsa { n, .. } => write!(f, "Rsa({} bits)", n.len() * 8),
            PublicKeyMaterial::Dsa { p, .. } => write!(f, "Dsa({} bits)", p.len() * 8),
            PublicKeyMaterial::Ecdsa { curve, .. } => write!(f, "Ecdsa({curve:?})"),
            PublicKeyMaterial::EdDsaLegacy { curve, .. } => write!(f, "EdDsaLegacy({curve:?})"),
            PublicKeyMaterial::Other { algorithm_id, .. } => write!(f, "Other({algorithm_id})"),
        }
    }
}

/// A key returned by a `KeyLookup`, together with the caller's classification of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub fingerprint: Fingerprint,
    pub material: PublicKeyMaterial,
    /// Key creation time, seconds since the Unix epoch.
    pub creation_time: u64,
    /// Absolute expiration time, seconds since the Unix epoch. `None` never expires.
    pub expiration_time: Option<u64>,
    pub revoked: bool,
    pub validity: Validity,
}

impl ResolvedKey {
    pub fn new(fingerprint: Fingerprint, material: PublicKeyMaterial) -> Self {
        Self {
            fingerprint,
            material,
            creation_time: 0,
            expiration_time: None,
            revoked: false,
            validity: Validity::Unknown,
        }
    }

    pub fn with_validity(mut self, validity: Validity) -> Self {
        self.validity = validity;
        self
    }

    pub fn with_expiration_time(mut self, expiration_time: Option<u64>) -> Self {
        self.expiration_time = expiration_time;
        self
    }

    pub fn with_revoked(mut self, revoked: bool) -> Self {
        self.revoked = revoked;
        self
    }

    /// Whether the key had expired at `at` (seconds since the epoch).
    pub fn is_expired_at(&self, at: u64) -> bool {
        self.expiration_time.is_some_and(|exp| exp <= at)
    }
}
