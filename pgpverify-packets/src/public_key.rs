// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Public key and public subkey packets (RFC 4880 §5.5.2).
//!
//! Only v4 keys are decoded. Key blocks may carry user IDs, self-signatures and other
//! certification packets; those are skipped, not evaluated.

use pgpverify_abstractions::{EccCurve, Fingerprint, KeyId, PublicKeyAlgorithm, PublicKeyMaterial};
use sha1::{Digest, Sha1};

use crate::error::{DecodeError, ParseError};
use crate::packet::{PacketParser, Tag};
use crate::reader::Reader;

const PACKET: &str = "public key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyPacket {
    pub version: u8,
    /// Seconds since the epoch.
    pub creation_time: u32,
    pub algorithm: u8,
    pub material: PublicKeyMaterial,
    pub fingerprint: Fingerprint,
    pub is_subkey: bool,
    /// Fingerprint of the primary key a subkey was found under.
    pub primary_fingerprint: Option<Fingerprint>,
}

impl PublicKeyPacket {
    pub fn key_id(&self) -> Option<KeyId> {
        self.fingerprint.key_id()
    }
}

/// Decode one public key (or subkey) packet body.
pub fn decode_public_key(body: &[u8], is_subkey: bool) -> Result<PublicKeyPacket, DecodeError> {
    let mut r = Reader::new(body);
    let version = r.read_u8().map_err(DecodeError::truncated(PACKET, "version"))?;
    if version != 4 {
        return Err(DecodeError::UnsupportedVersion { packet: PACKET, version });
    }
    let creation_time = r.read_u32_be().map_err(DecodeError::truncated(PACKET, "creation time"))?;
    let algorithm = r.read_u8().map_err(DecodeError::truncated(PACKET, "algorithm"))?;
    let material = decode_material(algorithm, &mut r)?;

    Ok(PublicKeyPacket {
        version,
        creation_time,
        algorithm,
        material,
        fingerprint: v4_fingerprint(body)?,
        is_subkey,
        primary_fingerprint: None,
    })
}

/// SHA-1 over `0x99 || len16 || body`.
fn v4_fingerprint(body: &[u8]) -> Result<Fingerprint, DecodeError> {
    let len = u16::try_from(body.len()).map_err(|_| DecodeError::malformed(PACKET, "v4 key body longer than 65535 bytes"))?;
    let mut hasher = Sha1::new();
    hasher.update([0x99]);
    hasher.update(len.to_be_bytes());
    hasher.update(body);
    Ok(Fingerprint::new(hasher.finalize().to_vec()))
}

fn mpi(r: &mut Reader<'_>, field: &'static str) -> Result<Vec<u8>, DecodeError> {
    Ok(r.read_mpi().map_err(DecodeError::truncated(PACKET, field))?.to_vec())
}

fn decode_material(algorithm: u8, r: &mut Reader<'_>) -> Result<PublicKeyMaterial, DecodeError> {
    let material = match PublicKeyAlgorithm::from_id(algorithm) {
        Some(PublicKeyAlgorithm::Rsa | PublicKeyAlgorithm::RsaEncryptOnly | PublicKeyAlgorithm::RsaSignOnly) => {
            let n = mpi(r, "rsa modulus")?;
            let e = mpi(r, "rsa exponent")?;
            PublicKeyMaterial::Rsa { n, e }
        }
        Some(PublicKeyAlgorithm::Dsa) => PublicKeyMaterial::Dsa {
            p: mpi(r, "dsa p")?,
            q: mpi(r, "dsa q")?,
            g: mpi(r, "dsa g")?,
            y: mpi(r, "dsa y")?,
        },
        Some(alg @ (PublicKeyAlgorithm::Ecdsa | PublicKeyAlgorithm::EdDsaLegacy)) => {
            let oid_len = r.read_u8().map_err(DecodeError::truncated(PACKET, "curve oid length"))? as usize;
            if oid_len == 0 || oid_len == 0xFF {
                return Err(DecodeError::malformed(PACKET, format!("reserved curve oid length {oid_len}")));
            }
            let oid = r.take(oid_len).map_err(DecodeError::truncated(PACKET, "curve oid"))?;
            let point = mpi(r, "ec point")?;
            match (alg, EccCurve::from_oid(oid)) {
                (PublicKeyAlgorithm::EdDsaLegacy, Some(curve @ EccCurve::Ed25519)) => {
                    PublicKeyMaterial::EdDsaLegacy { curve, point }
                }
                (PublicKeyAlgorithm::Ecdsa, Some(curve)) if curve != EccCurve::Ed25519 => {
                    PublicKeyMaterial::Ecdsa { curve, point }
                }
                _ => {
                    tracing::debug!(oid = %hex::encode(oid), algorithm, "unsupported curve");
                    PublicKeyMaterial::Other {
                        algorithm_id: algorithm,
                        params: point,
                    }
                }
            }
        }
        _ => PublicKeyMaterial::Other {
            algorithm_id: algorithm,
            params: r.rest().to_vec(),
        },
    };
    Ok(material)
}

/// Decode every public key and subkey in a transferable public key block.
///
/// Several blocks may be concatenated. Keys with a version other than 4 are skipped.
pub fn parse_key_block(input: &[u8]) -> Result<Vec<PublicKeyPacket>, ParseError> {
    let mut keys = Vec::new();
    let mut primary: Option<Fingerprint> = None;

    for packet in PacketParser::new(input) {
        let packet = packet?;
        let is_subkey = match packet.tag {
            Tag::PublicKey => false,
            Tag::PublicSubkey => true,
            Tag::UserId | Tag::UserAttribute | Tag::Signature | Tag::Trust | Tag::Marker | Tag::Padding => continue,
            other => {
                return Err(ParseError::UnexpectedPacket {
                    tag: other.id(),
                    offset: packet.offset,
                })
            }
        };
        match decode_public_key(&packet.body, is_subkey) {
            Ok(mut key) => {
                if is_subkey {
                    key.primary_fingerprint = primary.clone();
                } else {
                    primary = Some(key.fingerprint.clone());
                }
                tracing::debug!(fingerprint = %key.fingerprint, is_subkey, "decoded key");
                keys.push(key);
            }
            Err(DecodeError::UnsupportedVersion { version, .. }) => {
                tracing::warn!(version, offset = packet.offset, "skipping key with unsupported version");
                if !is_subkey {
                    primary = None;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(keys)
}
