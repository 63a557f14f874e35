// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! OpenPGP algorithm identifiers (RFC 4880 §9, RFC 6637, RFC 9580).

/// Public-key algorithm IDs that can appear in signature and key packets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PublicKeyAlgorithm {
    /// RSA (Encrypt or Sign).
    Rsa = 1,
    /// RSA Encrypt-Only. Never valid for signatures.
    RsaEncryptOnly = 2,
    /// RSA Sign-Only.
    RsaSignOnly = 3,
    /// Elgamal (Encrypt-Only).
    Elgamal = 16,
    Dsa = 17,
    Ecdh = 18,
    Ecdsa = 19,
    /// EdDSA in the legacy (RFC 4880bis) encoding, i.e. Ed25519 with MPIs.
    EdDsaLegacy = 22,
}

impl PublicKeyAlgorithm {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Rsa),
            2 => Some(Self::RsaEncryptOnly),
            3 => Some(Self::RsaSignOnly),
            16 => Some(Self::Elgamal),
            17 => Some(Self::Dsa),
            18 => Some(Self::Ecdh),
            19 => Some(Self::Ecdsa),
            22 => Some(Self::EdDsaLegacy),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Number of MPIs that make up a signature value for this algorithm.
    ///
    /// `None` for algorithms that cannot produce signatures.
    pub fn signature_mpi_count(self) -> Option<usize> {
        match self {
            Self::Rsa | Self::RsaSignOnly => Some(1),
            Self::Dsa | Self::Ecdsa | Self::EdDsaLegacy => Some(2),
            Self::RsaEncryptOnly | Self::Elgamal | Self::Ecdh => None,
        }
    }

    /// Whether this crate can verify signatures made with the algorithm.
    pub fn is_verifiable(self) -> bool {
        matches!(self, Self::Rsa | Self::RsaSignOnly | Self::Ecdsa | Self::EdDsaLegacy)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::RsaEncryptOnly => "RSA-E",
            Self::RsaSignOnly => "RSA-S",
            Self::Elgamal => "ELG",
            Self::Dsa => "DSA",
            Self::Ecdh => "ECDH",
            Self::Ecdsa => "ECDSA",
            Self::EdDsaLegacy => "EdDSA",
        }
    }
}

/// Hash algorithm IDs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HashAlgorithm {
    Md5 = 1,
    Sha1 = 2,
    Ripemd160 = 3,
    Sha256 = 8,
    Sha384 = 9,
    Sha512 = 10,
    Sha224 = 11,
    Sha3_256 = 12,
    Sha3_512 = 14,
}

impl HashAlgorithm {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Md5),
            2 => Some(Self::Sha1),
            3 => Some(Self::Ripemd160),
            8 => Some(Self::Sha256),
            9 => Some(Self::Sha384),
            10 => Some(Self::Sha512),
            11 => Some(Self::Sha224),
            12 => Some(Self::Sha3_256),
            14 => Some(Self::Sha3_512),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Whether the hash/verify engine can compute this digest.
    pub fn is_computable(self) -> bool {
        matches!(
            self,
            Self::Sha1 | Self::Sha224 | Self::Sha256 | Self::Sha384 | Self::Sha512
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA1",
            Self::Ripemd160 => "RIPEMD160",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
            Self::Sha224 => "SHA224",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha3_512 => "SHA3-512",
        }
    }
}

/// Elliptic curves usable for signatures, identified by their DER OID contents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EccCurve {
    NistP256,
    NistP384,
    NistP521,
    Ed25519,
}

const OID_NIST_P256: &[u8] = &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07];
const OID_NIST_P384: &[u8] = &[0x2B, 0x81, 0x04, 0x00, 0x22];
const OID_NIST_P521: &[u8] = &[0x2B, 0x81, 0x04, 0x00, 0x23];
const OID_ED25519: &[u8] = &[0x2B, 0x06, 0x01, 0x04, 0x01, 0xDA, 0x47, 0x0F, 0x01];

impl EccCurve {
    pub fn from_oid(oid: &[u8]) -> Option<Self> {
        match oid {
            OID_NIST_P256 => Some(Self::NistP256),
            OID_NIST_P384 => Some(Self::NistP384),
            OID_NIST_P521 => Some(Self::NistP521),
            OID_ED25519 => Some(Self::Ed25519),
            _ => None,
        }
    }

    pub fn oid(self) -> &'static [u8] {
        match self {
            Self::NistP256 => OID_NIST_P256,
            Self::NistP384 => OID_NIST_P384,
            Self::NistP521 => OID_NIST_P521,
            Self::Ed25519 => OID_ED25519,
        }
    }

    /// Size in bytes of one scalar / field element.
    pub fn field_size(self) -> usize {
        match self {
            Self::NistP256 | Self::Ed25519 => 32,
            Self::NistP384 => 48,
            Self::NistP521 => 66,
        }
    }
}
