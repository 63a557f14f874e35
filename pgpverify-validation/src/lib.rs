// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Hash/verify engine and trust evaluator for OpenPGP document signatures.

pub mod engine;
pub mod hashing;
pub mod signature_verifier;
pub mod trust;
pub mod verify_options;

pub use engine::{check_signature, CryptoVerdict, SignatureCheck};
pub use hashing::{canonicalize_text, compute_digest, signature_trailer, DocumentHasher};
pub use signature_verifier::{verify_digest, VerifyFailure};
pub use trust::{evaluate, TrustEvaluation};
pub use verify_options::{VerifyOptions, DEFAULT_MAX_DECOMPRESSED_LEN, DEFAULT_MAX_INPUT_LEN};
