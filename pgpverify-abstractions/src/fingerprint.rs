// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Key identity types.

use std::fmt;

/// 8-byte OpenPGP key ID.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub [u8; 8]);

impl KeyId {
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 8] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({self})")
    }
}

/// Key fingerprint.
///
/// v4 fingerprints are 20 bytes (SHA-1); v5/v6 fingerprints are 32 bytes (SHA-256).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The key ID derived from the fingerprint.
    ///
    /// v4: the low 64 bits. Newer versions: the high 64 bits.
    pub fn key_id(&self) -> Option<KeyId> {
        match self.0.len() {
            20 => KeyId::from_slice(&self.0[12..]),
            n if n >= 8 => KeyId::from_slice(&self.0[..8]),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

/// Issuer identity as recorded in a signature packet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IssuerRef {
    /// Issuer fingerprint subpacket (preferred).
    Fingerprint(Fingerprint),
    /// Legacy issuer key ID subpacket, or the key ID field of a v3 signature.
    KeyId(KeyId),
}

impl IssuerRef {
    /// Whether a key with fingerprint `fpr` is the one this issuer refers to.
    pub fn matches(&self, fpr: &Fingerprint) -> bool {
        match self {
            IssuerRef::Fingerprint(f) => f == fpr,
            IssuerRef::KeyId(id) => fpr.key_id().as_ref() == Some(id),
        }
    }

    pub fn key_id(&self) -> Option<KeyId> {
        match self {
            IssuerRef::Fingerprint(f) => f.key_id(),
            IssuerRef::KeyId(id) => Some(*id),
        }
    }
}

impl fmt::Display for IssuerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssuerRef::Fingerprint(fpr) => fpr.fmt(f),
            IssuerRef::KeyId(id) => id.fmt(f),
        }
    }
}
