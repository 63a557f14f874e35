// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parser and decoder errors.
//!
//! `ParseError` covers framing and message structure. The verifier treats it as fatal to the
//! whole input. `DecodeError` covers the body of a single packet and only affects that packet.

use pgpverify_abstractions::{ErrorCode, ErrorSource, ErrorValue};

use crate::signature::PartialSignature;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("packet header truncated at offset {offset}")]
    TruncatedHeader { offset: usize },

    #[error("packet at offset {offset} declares {declared} body bytes but only {available} remain")]
    TruncatedBody {
        offset: usize,
        declared: usize,
        available: usize,
    },

    #[error("invalid packet header byte 0x{byte:02x} at offset {offset}")]
    InvalidHeader { offset: usize, byte: u8 },

    #[error("reserved packet tag 0 at offset {offset}")]
    ReservedTag { offset: usize },

    #[error("partial body length is not allowed for packet tag {tag}")]
    PartialLengthNotAllowed { tag: u8 },

    #[error("unexpected packet tag {tag} at offset {offset}")]
    UnexpectedPacket { tag: u8, offset: usize },

    #[error("invalid armor: {0}")]
    Armor(String),

    #[error("armor checksum mismatch: expected {expected:06x}, computed {computed:06x}")]
    ArmorChecksum { expected: u32, computed: u32 },

    #[error("unsupported compression algorithm {0}")]
    UnsupportedCompression(u8),

    #[error("decompression failed: {0}")]
    Decompression(String),

    #[error("decompressed data exceeds {limit} bytes")]
    DecompressedTooLarge { limit: usize },

    #[error("compressed packets nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("malformed message: {0}")]
    Structure(String),

    #[error("{0}")]
    Packet(#[from] DecodeError),

    #[error("no signature found")]
    NoSignatures,

    #[error("no signed data found")]
    NoSignedData,
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::Armor(_) | ParseError::ArmorChecksum { .. } => ErrorCode::InvalidArmor,
            ParseError::UnsupportedCompression(_) => ErrorCode::UnsupportedAlgorithm,
            ParseError::DecompressedTooLarge { .. } => ErrorCode::TooLarge,
            ParseError::NoSignatures | ParseError::NoSignedData => ErrorCode::NoData,
            ParseError::Packet(e) => e.code(),
            _ => ErrorCode::MalformedInput,
        }
    }

    pub fn error_value(&self) -> ErrorValue {
        ErrorValue::new(ErrorSource::Parser, self.code())
    }
}

/// Failure decoding the body of one packet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{packet} packet truncated while reading {field}")]
    Truncated {
        packet: &'static str,
        field: &'static str,
    },

    #[error("malformed {packet} packet: {reason}")]
    Malformed { packet: &'static str, reason: String },

    #[error("unsupported {packet} packet version {version}")]
    UnsupportedVersion { packet: &'static str, version: u8 },

    #[error("unsupported public-key algorithm {0}")]
    UnsupportedPublicKeyAlgorithm(u8),

    #[error("unsupported hash algorithm {0}")]
    UnsupportedHashAlgorithm(u8),

    #[error("unknown critical subpacket type {0}")]
    UnknownCriticalSubpacket(u8),
}

impl DecodeError {
    pub(crate) fn truncated(packet: &'static str, field: &'static str) -> impl FnOnce(crate::EofError) -> Self {
        move |_| DecodeError::Truncated { packet, field }
    }

    pub(crate) fn malformed(packet: &'static str, reason: impl Into<String>) -> Self {
        DecodeError::Malformed {
            packet,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::Truncated { .. } | DecodeError::Malformed { .. } => ErrorCode::MalformedInput,
            DecodeError::UnsupportedVersion { .. } => ErrorCode::UnsupportedVersion,
            DecodeError::UnsupportedPublicKeyAlgorithm(_) | DecodeError::UnsupportedHashAlgorithm(_) => {
                ErrorCode::UnsupportedAlgorithm
            }
            DecodeError::UnknownCriticalSubpacket(_) => ErrorCode::UnknownCriticalSubpacket,
        }
    }

    pub fn error_value(&self) -> ErrorValue {
        ErrorValue::new(ErrorSource::Decoder, self.code())
    }
}

/// A signature packet that could not be decoded, with whatever metadata was read before the
/// failure. The verifier uses the partial data to fill in the failed outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct SignatureDecodeError {
    pub error: DecodeError,
    pub partial: PartialSignature,
}
