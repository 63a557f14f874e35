// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Two-axis error values.
//!
//! Every status reported by the verifier is an `ErrorValue` that packs the originating
//! component (`ErrorSource`) into the top 8 bits and the failure kind (`ErrorCode`) into the
//! low 16 bits. `strerror` and `strsource` describe the two axes independently.

use std::fmt;

/// Component that produced an error value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorSource {
    Unknown = 0,
    /// Packet framing and ASCII armor.
    Parser = 1,
    /// Signature, one-pass, literal and key packet bodies.
    Decoder = 2,
    /// Pre-image construction, hashing and public-key verification.
    Engine = 3,
    /// Summary and validity evaluation.
    Trust = 4,
    /// The caller-supplied key lookup.
    KeyLookup = 5,
    /// Invalid arguments or data handed in by the caller.
    User = 6,
}

impl ErrorSource {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Parser,
            2 => Self::Decoder,
            3 => Self::Engine,
            4 => Self::Trust,
            5 => Self::KeyLookup,
            6 => Self::User,
            _ => Self::Unknown,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Unknown => "Unspecified source",
            Self::Parser => "Packet parser",
            Self::Decoder => "Packet decoder",
            Self::Engine => "Hash/verify engine",
            Self::Trust => "Trust evaluator",
            Self::KeyLookup => "Key lookup",
            Self::User => "User defined source",
        }
    }
}

/// Failure kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    NoError = 0,
    General = 1,
    /// Packet framing or a packet body is structurally invalid.
    MalformedInput = 2,
    UnsupportedVersion = 3,
    /// Unknown or unusable public-key, hash or compression algorithm.
    UnsupportedAlgorithm = 4,
    BadPublicKey = 6,
    /// Digest or signature value did not verify.
    CryptoMismatch = 8,
    /// The issuer could not be resolved by the key lookup.
    KeyMissing = 9,
    InvalidArmor = 15,
    WrongPublicKeyAlgorithm = 41,
    InvalidValue = 55,
    NoData = 58,
    UnsupportedSignatureType = 60,
    /// A hashed subpacket is marked critical but is not understood.
    UnknownCriticalSubpacket = 61,
    Revoked = 94,
    BadPolicy = 96,
    TooLarge = 67,
    KeyLookupFailed = 100,
    KeyExpired = 153,
    SigExpired = 154,
    Io = 200,
}

impl ErrorCode {
    pub fn from_u16(v: u16) -> Option<Self> {
        let code = match v {
            0 => Self::NoError,
            1 => Self::General,
            2 => Self::MalformedInput,
            3 => Self::UnsupportedVersion,
            4 => Self::UnsupportedAlgorithm,
            6 => Self::BadPublicKey,
            8 => Self::CryptoMismatch,
            9 => Self::KeyMissing,
            15 => Self::InvalidArmor,
            41 => Self::WrongPublicKeyAlgorithm,
            55 => Self::InvalidValue,
            58 => Self::NoData,
            60 => Self::UnsupportedSignatureType,
            61 => Self::UnknownCriticalSubpacket,
            67 => Self::TooLarge,
            94 => Self::Revoked,
            96 => Self::BadPolicy,
            100 => Self::KeyLookupFailed,
            153 => Self::KeyExpired,
            154 => Self::SigExpired,
            200 => Self::Io,
            _ => return None,
        };
        Some(code)
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::NoError => "Success",
            Self::General => "General error",
            Self::MalformedInput => "Invalid packet",
            Self::UnsupportedVersion => "Unknown version in packet",
            Self::UnsupportedAlgorithm => "Unsupported algorithm",
            Self::BadPublicKey => "Bad public key",
            Self::CryptoMismatch => "Bad signature",
            Self::KeyMissing => "No public key",
            Self::InvalidArmor => "Invalid armor",
            Self::WrongPublicKeyAlgorithm => "Wrong public key algorithm",
            Self::InvalidValue => "Invalid value",
            Self::NoData => "No data",
            Self::UnsupportedSignatureType => "Unsupported signature class",
            Self::UnknownCriticalSubpacket => "Unknown critical signature subpacket",
            Self::TooLarge => "Input too large",
            Self::Revoked => "Certificate revoked",
            Self::BadPolicy => "Policy violation",
            Self::KeyLookupFailed => "Key lookup failed",
            Self::KeyExpired => "Key expired",
            Self::SigExpired => "Signature expired",
            Self::Io => "I/O error",
        }
    }
}

/// Packed `(source, code)` error value; `0` means success.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ErrorValue(u32);

impl ErrorValue {
    pub const SUCCESS: ErrorValue = ErrorValue(0);

    /// Pack a source and code. `ErrorCode::NoError` always yields `SUCCESS`.
    pub fn new(source: ErrorSource, code: ErrorCode) -> Self {
        if code == ErrorCode::NoError {
            return Self::SUCCESS;
        }
        Self(((source as u32) << 24) | code as u32)
    }

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.code() == Some(ErrorCode::NoError)
    }

    /// The failure kind; `None` when the raw value carries an unknown code.
    pub fn code(self) -> Option<ErrorCode> {
        ErrorCode::from_u16((self.0 & 0xFFFF) as u16)
    }

    pub fn source(self) -> ErrorSource {
        ErrorSource::from_u8((self.0 >> 24) as u8)
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorValue({:?}/{:?})", self.source(), self.code())
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", strerror(*self), strsource(*self))
    }
}

impl From<ErrorCode> for ErrorValue {
    fn from(code: ErrorCode) -> Self {
        ErrorValue::new(ErrorSource::Unknown, code)
    }
}

/// Description of the code axis of `err`.
pub fn strerror(err: ErrorValue) -> &'static str {
    match err.code() {
        Some(code) => code.description(),
        None => "Unknown error code",
    }
}

/// Description of the source axis of `err`.
pub fn strsource(err: ErrorValue) -> &'static str {
    err.source().description()
}
