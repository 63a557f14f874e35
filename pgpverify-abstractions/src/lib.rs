// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared interfaces and datatypes for the pgpverify Rust crates.
//!
//! This crate exists to prevent circular dependencies across:
//! - packet parsing (`pgpverify-packets`)
//! - hashing, signature checks and trust evaluation (`pgpverify-validation`)
//! - the high-level facade (`pgpverify`)
//!
//! It is intentionally kept small and stable. It owns the caller-visible result shape
//! (`SignatureOutcome`, `VerifyReport`) and the key-lookup seam (`KeyLookup`).

pub mod algorithms;
pub mod error_code;
pub mod fingerprint;
pub mod key_lookup;
pub mod key_material;
pub mod outcome;
pub mod summary;
pub mod validity;

pub use algorithms::{EccCurve, HashAlgorithm, PublicKeyAlgorithm};
pub use error_code::{strerror, strsource, ErrorCode, ErrorSource, ErrorValue};
pub use fingerprint::{Fingerprint, IssuerRef, KeyId};
pub use key_lookup::{KeyLookup, KeyLookupError};
pub use key_material::{PublicKeyMaterial, ResolvedKey};
pub use outcome::{SignatureOutcome, VerifyReport};
pub use summary::SigSummary;
pub use validity::Validity;
