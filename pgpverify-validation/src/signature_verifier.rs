// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Public-key verification of a precomputed digest.

use pgpverify_abstractions::{EccCurve, ErrorCode, HashAlgorithm, PublicKeyAlgorithm, PublicKeyMaterial};
use pgpverify_packets::SignaturePacket;
use rsa::pkcs1v15::Pkcs1v15Sign;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use signature::hazmat::PrehashVerifier;
use signature::Verifier;

/// Why a digest could not be verified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct VerifyFailure {
    pub code: ErrorCode,
    pub message: String,
}

impl VerifyFailure {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn bad_key(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadPublicKey, message)
    }

    fn bad_signature(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoMismatch, message)
    }
}

/// Verify `digest` against the signature value in `sig` using `key`.
pub fn verify_digest(key: &PublicKeyMaterial, sig: &SignaturePacket, digest: &[u8]) -> Result<(), VerifyFailure> {
    if !key.supports(sig.public_key_algorithm) {
        return Err(VerifyFailure::new(
            ErrorCode::WrongPublicKeyAlgorithm,
            format!("{} signature cannot be checked with a {key:?} key", sig.public_key_algorithm.name()),
        ));
    }

    let mpis = &sig.signature_mpis;
    match (key, sig.public_key_algorithm) {
        (PublicKeyMaterial::Rsa { n, e }, PublicKeyAlgorithm::Rsa | PublicKeyAlgorithm::RsaSignOnly) => {
            verify_rsa_pkcs1_prehash(n, e, sig.hash_algorithm, digest, mpi(mpis, 0)?)
        }
        (PublicKeyMaterial::Ecdsa { curve, point }, PublicKeyAlgorithm::Ecdsa) => {
            let rs = concat_scalars(mpi(mpis, 0)?, mpi(mpis, 1)?, curve.field_size())?;
            // A hash shorter than the field is the same integer with leading zeros.
            let digest = left_pad(digest, digest.len().max(curve.field_size()))?;
            match curve {
                EccCurve::NistP256 => verify_ecdsa_p256_prehash(point, &digest, &rs),
                EccCurve::NistP384 => verify_ecdsa_p384_prehash(point, &digest, &rs),
                EccCurve::NistP521 => verify_ecdsa_p521_prehash(point, &digest, &rs),
                EccCurve::Ed25519 => Err(VerifyFailure::bad_key("Ed25519 is not an ECDSA curve")),
            }
        }
        (PublicKeyMaterial::EdDsaLegacy { point, .. }, PublicKeyAlgorithm::EdDsaLegacy) => {
            let rs = concat_scalars(mpi(mpis, 0)?, mpi(mpis, 1)?, 32)?;
            verify_ed25519_prehash(point, digest, &rs)
        }
        (_, alg) => Err(VerifyFailure::new(
            ErrorCode::UnsupportedAlgorithm,
            format!("{} signatures are not supported", alg.name()),
        )),
    }
}

fn mpi(mpis: &[Vec<u8>], index: usize) -> Result<&[u8], VerifyFailure> {
    mpis.get(index)
        .map(Vec::as_slice)
        .ok_or_else(|| VerifyFailure::bad_signature(format!("signature value is missing MPI {index}")))
}

/// Left-pad `value` to `len` bytes.
fn left_pad(value: &[u8], len: usize) -> Result<Vec<u8>, VerifyFailure> {
    if value.len() > len {
        return Err(VerifyFailure::bad_signature(format!(
            "signature component is {} bytes, expected at most {len}",
            value.len()
        )));
    }
    let mut out = vec![0u8; len - value.len()];
    out.extend_from_slice(value);
    Ok(out)
}

fn concat_scalars(r: &[u8], s: &[u8], size: usize) -> Result<Vec<u8>, VerifyFailure> {
    let mut out = left_pad(r, size)?;
    out.extend(left_pad(s, size)?);
    Ok(out)
}

fn verify_rsa_pkcs1_prehash(
    n: &[u8],
    e: &[u8],
    hash: HashAlgorithm,
    prehash: &[u8],
    sig: &[u8],
) -> Result<(), VerifyFailure> {
    let key = RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))
        .map_err(|err| VerifyFailure::bad_key(format!("bad RSA public key: {err}")))?;
    // OpenPGP strips leading zeros from the signature MPI; PKCS#1 wants the full modulus width.
    let sig = left_pad(sig, key.size())?;

    let scheme = match hash {
        HashAlgorithm::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
        HashAlgorithm::Sha224 => Pkcs1v15Sign::new::<Sha224>(),
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
        other => {
            return Err(VerifyFailure::new(
                ErrorCode::UnsupportedAlgorithm,
                format!("RSA with {} is not supported", other.name()),
            ))
        }
    };
    key.verify(scheme, prehash, &sig)
        .map_err(|_| VerifyFailure::bad_signature("signature verification failed"))
}

fn verify_ecdsa_p256_prehash(point: &[u8], prehash: &[u8], sig: &[u8]) -> Result<(), VerifyFailure> {
    let vk = p256::ecdsa::VerifyingKey::from_sec1_bytes(point)
        .map_err(|e| VerifyFailure::bad_key(format!("bad P-256 public key: {e}")))?;
    let signature = p256::ecdsa::Signature::from_slice(sig)
        .map_err(|e| VerifyFailure::bad_signature(format!("bad P-256 signature: {e}")))?;
    vk.verify_prehash(prehash, &signature)
        .map_err(|_| VerifyFailure::bad_signature("signature verification failed"))
}

fn verify_ecdsa_p384_prehash(point: &[u8], prehash: &[u8], sig: &[u8]) -> Result<(), VerifyFailure> {
    let vk = p384::ecdsa::VerifyingKey::from_sec1_bytes(point)
        .map_err(|e| VerifyFailure::bad_key(format!("bad P-384 public key: {e}")))?;
    let signature = p384::ecdsa::Signature::from_slice(sig)
        .map_err(|e| VerifyFailure::bad_signature(format!("bad P-384 signature: {e}")))?;
    vk.verify_prehash(prehash, &signature)
        .map_err(|_| VerifyFailure::bad_signature("signature verification failed"))
}

fn verify_ecdsa_p521_prehash(point: &[u8], prehash: &[u8], sig: &[u8]) -> Result<(), VerifyFailure> {
    let vk = p521::ecdsa::VerifyingKey::from_sec1_bytes(point)
        .map_err(|e| VerifyFailure::bad_key(format!("bad P-521 public key: {e}")))?;
    let signature = p521::ecdsa::Signature::from_slice(sig)
        .map_err(|e| VerifyFailure::bad_signature(format!("bad P-521 signature: {e}")))?;
    vk.verify_prehash(prehash, &signature)
        .map_err(|_| VerifyFailure::bad_signature("signature verification failed"))
}

/// Legacy EdDSA signs the digest itself as the Ed25519 message.
fn verify_ed25519_prehash(point: &[u8], prehash: &[u8], sig: &[u8]) -> Result<(), VerifyFailure> {
    let raw = match point {
        [0x40, rest @ ..] => rest,
        _ => return Err(VerifyFailure::bad_key("Ed25519 point must carry the 0x40 prefix")),
    };
    let raw: &[u8; 32] = raw
        .try_into()
        .map_err(|_| VerifyFailure::bad_key(format!("Ed25519 public key must be 32 bytes, got {}", raw.len())))?;
    let vk = ed25519_dalek::VerifyingKey::from_bytes(raw)
        .map_err(|e| VerifyFailure::bad_key(format!("bad Ed25519 public key: {e}")))?;
    let signature = ed25519_dalek::Signature::from_slice(sig)
        .map_err(|e| VerifyFailure::bad_signature(format!("bad Ed25519 signature: {e}")))?;
    vk.verify(prehash, &signature)
        .map_err(|_| VerifyFailure::bad_signature("signature verification failed"))
}
