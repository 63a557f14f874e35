// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! High-level OpenPGP signature verification facade.
//!
//! This crate is the primary entry point for verifying detached, inline and cleartext
//! OpenPGP signatures. A `Context` owns the verification options and a `KeyLookup`. Each
//! verify call returns a `VerifyReport` with one `SignatureOutcome` per signature.
//!
//! Design note: the types callers need from the lower crates are re-exported at the crate
//! root, so most users depend on this crate alone.

// Internal implementation modules.
mod assembler;

// Public API organization (lib.rs is a publisher).
mod api;
mod context;
mod data;
mod error;
mod keyring;

pub use api::{check_version, VERSION};
pub use context::Context;
pub use data::{CopyMode, Data};
pub use error::VerifyError;
pub use keyring::Keyring;

pub use pgpverify_abstractions::{
    strerror, strsource, EccCurve, ErrorCode, ErrorSource, ErrorValue, Fingerprint, HashAlgorithm, IssuerRef, KeyId,
    KeyLookup, KeyLookupError, PublicKeyAlgorithm, PublicKeyMaterial, ResolvedKey, SigSummary, SignatureOutcome,
    Validity, VerifyReport,
};
pub use pgpverify_validation::{VerifyOptions, DEFAULT_MAX_DECOMPRESSED_LEN, DEFAULT_MAX_INPUT_LEN};
