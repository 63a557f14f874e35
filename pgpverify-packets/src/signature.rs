// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signature packet decoding (RFC 4880 §5.2).
//!
//! `decode_signature` accepts v3 and v4 signature bodies. Besides the fields the verifier
//! reports, the decoded packet keeps the exact bytes that the signer hashed after the data
//! (`hashed_header`) so the trailer can be rebuilt without re-encoding anything.

use pgpverify_abstractions::{Fingerprint, HashAlgorithm, IssuerRef, KeyId, PublicKeyAlgorithm};

use crate::error::{DecodeError, SignatureDecodeError};
use crate::reader::Reader;

const PACKET: &str = "signature";

/// Signature type (RFC 4880 §5.2.1).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SignatureType {
    /// 0x00: signature over a binary document.
    Binary,
    /// 0x01: signature over a canonical text document.
    Text,
    /// Key certifications, revocations, timestamps and so on.
    Other(u8),
}

impl SignatureType {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => SignatureType::Binary,
            0x01 => SignatureType::Text,
            other => SignatureType::Other(other),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            SignatureType::Binary => 0x00,
            SignatureType::Text => 0x01,
            SignatureType::Other(v) => v,
        }
    }

    /// Whether this is a signature over document data.
    pub fn is_document(self) -> bool {
        matches!(self, SignatureType::Binary | SignatureType::Text)
    }
}

/// Signature subpacket types (RFC 4880 §5.2.3.1, RFC 9580 §5.2.3.7).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SubpacketType {
    SignatureCreationTime,
    SignatureExpirationTime,
    ExportableCertification,
    TrustSignature,
    RegularExpression,
    Revocable,
    KeyExpirationTime,
    PreferredSymmetricAlgorithms,
    RevocationKey,
    Issuer,
    NotationData,
    PreferredHashAlgorithms,
    PreferredCompressionAlgorithms,
    KeyServerPreferences,
    PreferredKeyServer,
    PrimaryUserId,
    PolicyUri,
    KeyFlags,
    SignersUserId,
    ReasonForRevocation,
    Features,
    SignatureTarget,
    EmbeddedSignature,
    IssuerFingerprint,
    Other(u8),
}

impl SubpacketType {
    pub fn from_u8(v: u8) -> Self {
        match v {
            2 => Self::SignatureCreationTime,
            3 => Self::SignatureExpirationTime,
            4 => Self::ExportableCertification,
            5 => Self::TrustSignature,
            6 => Self::RegularExpression,
            7 => Self::Revocable,
            9 => Self::KeyExpirationTime,
            11 => Self::PreferredSymmetricAlgorithms,
            12 => Self::RevocationKey,
            16 => Self::Issuer,
            20 => Self::NotationData,
            21 => Self::PreferredHashAlgorithms,
            22 => Self::PreferredCompressionAlgorithms,
            23 => Self::KeyServerPreferences,
            24 => Self::PreferredKeyServer,
            25 => Self::PrimaryUserId,
            26 => Self::PolicyUri,
            27 => Self::KeyFlags,
            28 => Self::SignersUserId,
            29 => Self::ReasonForRevocation,
            30 => Self::Features,
            31 => Self::SignatureTarget,
            32 => Self::EmbeddedSignature,
            33 => Self::IssuerFingerprint,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subpacket {
    pub typ: SubpacketType,
    /// Raw type octet with the critical bit cleared.
    pub type_id: u8,
    pub critical: bool,
    pub data: Vec<u8>,
}

/// A decoded v3 or v4 signature packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePacket {
    pub version: u8,
    pub signature_type: SignatureType,
    pub public_key_algorithm: PublicKeyAlgorithm,
    pub hash_algorithm: HashAlgorithm,
    /// Seconds since the epoch.
    pub creation_time: u32,
    /// Validity period relative to `creation_time`. `None` or `Some(0)` never expires.
    pub expiration_seconds: Option<u32>,
    pub issuer: Option<IssuerRef>,
    /// Signature fields hashed after the data.
    ///
    /// v4: version through the end of the hashed subpacket area.
    /// v3: signature type and creation time.
    pub hashed_header: Vec<u8>,
    pub hashed_subpackets: Vec<Subpacket>,
    pub unhashed_subpackets: Vec<Subpacket>,
    /// Left 16 bits of the signed digest.
    pub hash_prefix: [u8; 2],
    /// Signature value, one entry per MPI, leading zeros stripped.
    pub signature_mpis: Vec<Vec<u8>>,
}

impl SignaturePacket {
    /// Absolute expiration time in seconds since the epoch, if the signature expires.
    pub fn expiration_time(&self) -> Option<u64> {
        match self.expiration_seconds {
            None | Some(0) => None,
            Some(secs) => Some(self.creation_time as u64 + secs as u64),
        }
    }
}

/// Fields recovered from a signature body before decoding failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialSignature {
    pub version: Option<u8>,
    pub signature_type: Option<u8>,
    pub public_key_algorithm: Option<u8>,
    pub hash_algorithm: Option<u8>,
    pub creation_time: Option<u32>,
    pub expiration_seconds: Option<u32>,
    pub issuer: Option<IssuerRef>,
}

/// Decode a signature packet body.
pub fn decode_signature(body: &[u8]) -> Result<SignaturePacket, SignatureDecodeError> {
    let mut partial = PartialSignature::default();
    match decode_into(body, &mut partial) {
        Ok(sig) => Ok(sig),
        Err(error) => {
            tracing::debug!(%error, "signature packet rejected");
            Err(SignatureDecodeError { error, partial })
        }
    }
}

fn decode_into(body: &[u8], partial: &mut PartialSignature) -> Result<SignaturePacket, DecodeError> {
    let mut r = Reader::new(body);
    let version = r.read_u8().map_err(DecodeError::truncated(PACKET, "version"))?;
    partial.version = Some(version);
    match version {
        2 | 3 => decode_v3(version, &mut r, partial),
        4 => decode_v4(body, &mut r, partial),
        _ => Err(DecodeError::UnsupportedVersion {
            packet: PACKET,
            version,
        }),
    }
}

fn decode_v3(version: u8, r: &mut Reader<'_>, partial: &mut PartialSignature) -> Result<SignaturePacket, DecodeError> {
    let hashed_len = r.read_u8().map_err(DecodeError::truncated(PACKET, "hashed length"))?;
    if hashed_len != 5 {
        return Err(DecodeError::malformed(
            PACKET,
            format!("v3 hashed material length must be 5, got {hashed_len}"),
        ));
    }
    let hashed_header = r.take(5).map_err(DecodeError::truncated(PACKET, "hashed material"))?;
    let sig_type = hashed_header[0];
    let creation_time = u32::from_be_bytes([hashed_header[1], hashed_header[2], hashed_header[3], hashed_header[4]]);
    partial.signature_type = Some(sig_type);
    partial.creation_time = Some(creation_time);

    let key_id: [u8; 8] = r.read_array().map_err(DecodeError::truncated(PACKET, "key id"))?;
    let issuer = IssuerRef::KeyId(KeyId(key_id));
    partial.issuer = Some(issuer.clone());

    let pk_id = r.read_u8().map_err(DecodeError::truncated(PACKET, "public-key algorithm"))?;
    let hash_id = r.read_u8().map_err(DecodeError::truncated(PACKET, "hash algorithm"))?;
    partial.public_key_algorithm = Some(pk_id);
    partial.hash_algorithm = Some(hash_id);
    let (public_key_algorithm, hash_algorithm, mpi_count) = resolve_algorithms(pk_id, hash_id)?;

    let hash_prefix = r.read_array().map_err(DecodeError::truncated(PACKET, "hash prefix"))?;
    let signature_mpis = read_signature_mpis(r, mpi_count)?;

    Ok(SignaturePacket {
        version,
        signature_type: SignatureType::from_u8(sig_type),
        public_key_algorithm,
        hash_algorithm,
        creation_time,
        expiration_seconds: None,
        issuer: Some(issuer),
        hashed_header: hashed_header.to_vec(),
        hashed_subpackets: Vec::new(),
        unhashed_subpackets: Vec::new(),
        hash_prefix,
        signature_mpis,
    })
}

fn decode_v4(body: &[u8], r: &mut Reader<'_>, partial: &mut PartialSignature) -> Result<SignaturePacket, DecodeError> {
    let sig_type = r.read_u8().map_err(DecodeError::truncated(PACKET, "signature type"))?;
    partial.signature_type = Some(sig_type);
    let pk_id = r.read_u8().map_err(DecodeError::truncated(PACKET, "public-key algorithm"))?;
    let hash_id = r.read_u8().map_err(DecodeError::truncated(PACKET, "hash algorithm"))?;
    partial.public_key_algorithm = Some(pk_id);
    partial.hash_algorithm = Some(hash_id);

    let hashed_len = r.read_u16_be().map_err(DecodeError::truncated(PACKET, "hashed area length"))? as usize;
    if hashed_len > r.remaining() {
        return Err(DecodeError::malformed(
            PACKET,
            format!("hashed area length {hashed_len} exceeds the {} remaining bytes", r.remaining()),
        ));
    }
    let hashed_area = r.take(hashed_len).map_err(DecodeError::truncated(PACKET, "hashed area"))?;
    let hashed_header = body[..r.position()].to_vec();
    let hashed_subpackets = parse_subpackets(hashed_area)?;

    let unhashed_len = r.read_u16_be().map_err(DecodeError::truncated(PACKET, "unhashed area length"))? as usize;
    let unhashed_area = r.take(unhashed_len).map_err(DecodeError::truncated(PACKET, "unhashed area"))?;
    let unhashed_subpackets = parse_subpackets(unhashed_area)?;

    let mut creation_time = None;
    let mut expiration_seconds = None;
    for sp in &hashed_subpackets {
        match sp.typ {
            SubpacketType::SignatureCreationTime => creation_time = Some(subpacket_u32(sp, "creation time")?),
            SubpacketType::SignatureExpirationTime => {
                expiration_seconds = Some(subpacket_u32(sp, "expiration time")?)
            }
            _ => {}
        }
    }
    partial.creation_time = creation_time;
    partial.expiration_seconds = expiration_seconds;

    let issuer = select_issuer(&hashed_subpackets, &unhashed_subpackets)?;
    partial.issuer = issuer.clone();

    // Checked after the issuer is known so that a rejected packet still names its signer.
    let (public_key_algorithm, hash_algorithm, mpi_count) = resolve_algorithms(pk_id, hash_id)?;

    let creation_time = creation_time
        .ok_or_else(|| DecodeError::malformed(PACKET, "hashed area has no signature creation time"))?;

    if let Some(sp) = hashed_subpackets
        .iter()
        .find(|sp| sp.critical && matches!(sp.typ, SubpacketType::Other(_)))
    {
        return Err(DecodeError::UnknownCriticalSubpacket(sp.type_id));
    }

    let hash_prefix = r.read_array().map_err(DecodeError::truncated(PACKET, "hash prefix"))?;
    let signature_mpis = read_signature_mpis(r, mpi_count)?;

    Ok(SignaturePacket {
        version: 4,
        signature_type: SignatureType::from_u8(sig_type),
        public_key_algorithm,
        hash_algorithm,
        creation_time,
        expiration_seconds,
        issuer,
        hashed_header,
        hashed_subpackets,
        unhashed_subpackets,
        hash_prefix,
        signature_mpis,
    })
}

fn resolve_algorithms(pk_id: u8, hash_id: u8) -> Result<(PublicKeyAlgorithm, HashAlgorithm, usize), DecodeError> {
    let pk = PublicKeyAlgorithm::from_id(pk_id).ok_or(DecodeError::UnsupportedPublicKeyAlgorithm(pk_id))?;
    let mpi_count = pk
        .signature_mpi_count()
        .ok_or(DecodeError::UnsupportedPublicKeyAlgorithm(pk_id))?;
    let hash = HashAlgorithm::from_id(hash_id).ok_or(DecodeError::UnsupportedHashAlgorithm(hash_id))?;
    Ok((pk, hash, mpi_count))
}

fn read_signature_mpis(r: &mut Reader<'_>, count: usize) -> Result<Vec<Vec<u8>>, DecodeError> {
    let mut mpis = Vec::with_capacity(count);
    for _ in 0..count {
        let mpi = r.read_mpi().map_err(DecodeError::truncated(PACKET, "signature value"))?;
        mpis.push(mpi.to_vec());
    }
    if !r.is_empty() {
        tracing::debug!(trailing = r.remaining(), "ignoring bytes after signature value");
    }
    Ok(mpis)
}

/// Issuer precedence: hashed fingerprint, unhashed fingerprint, hashed key ID, unhashed key ID.
fn select_issuer(hashed: &[Subpacket], unhashed: &[Subpacket]) -> Result<Option<IssuerRef>, DecodeError> {
    let find = |area: &[Subpacket], typ: SubpacketType| area.iter().find(|sp| sp.typ == typ).cloned();

    let fpr = find(hashed, SubpacketType::IssuerFingerprint).or_else(|| find(unhashed, SubpacketType::IssuerFingerprint));
    if let Some(sp) = fpr {
        // One version octet, then the fingerprint itself.
        let expected = match sp.data.first() {
            Some(4) => 20,
            Some(5) | Some(6) => 32,
            Some(v) => {
                return Err(DecodeError::malformed(
                    PACKET,
                    format!("issuer fingerprint has unknown key version {v}"),
                ))
            }
            None => return Err(DecodeError::malformed(PACKET, "empty issuer fingerprint subpacket")),
        };
        if sp.data.len() != expected + 1 {
            return Err(DecodeError::malformed(
                PACKET,
                format!("issuer fingerprint must be {expected} bytes, got {}", sp.data.len() - 1),
            ));
        }
        return Ok(Some(IssuerRef::Fingerprint(Fingerprint::new(sp.data[1..].to_vec()))));
    }

    let key_id = find(hashed, SubpacketType::Issuer).or_else(|| find(unhashed, SubpacketType::Issuer));
    match key_id {
        Some(sp) => KeyId::from_slice(&sp.data)
            .map(|id| Some(IssuerRef::KeyId(id)))
            .ok_or_else(|| DecodeError::malformed(PACKET, format!("issuer key id must be 8 bytes, got {}", sp.data.len()))),
        None => Ok(None),
    }
}

fn subpacket_u32(sp: &Subpacket, what: &str) -> Result<u32, DecodeError> {
    let arr: [u8; 4] = sp
        .data
        .as_slice()
        .try_into()
        .map_err(|_| DecodeError::malformed(PACKET, format!("{what} subpacket must be 4 bytes, got {}", sp.data.len())))?;
    Ok(u32::from_be_bytes(arr))
}

fn parse_subpackets(area: &[u8]) -> Result<Vec<Subpacket>, DecodeError> {
    let mut r = Reader::new(area);
    let mut out = Vec::new();
    while !r.is_empty() {
        let first = r.read_u8().map_err(DecodeError::truncated(PACKET, "subpacket length"))?;
        let len = match first {
            0..=191 => first as usize,
            192..=254 => {
                let second = r.read_u8().map_err(DecodeError::truncated(PACKET, "subpacket length"))?;
                (((first as usize) - 192) << 8) + second as usize + 192
            }
            255 => r.read_u32_be().map_err(DecodeError::truncated(PACKET, "subpacket length"))? as usize,
        };
        if len == 0 {
            return Err(DecodeError::malformed(PACKET, "zero-length subpacket"));
        }
        let content = r.take(len).map_err(DecodeError::truncated(PACKET, "subpacket"))?;
        let type_id = content[0] & 0x7F;
        out.push(Subpacket {
            typ: SubpacketType::from_u8(type_id),
            type_id,
            critical: content[0] & 0x80 != 0,
            data: content[1..].to_vec(),
        });
    }
    Ok(out)
}
