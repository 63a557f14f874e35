// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Turns signature packet bodies into a `VerifyReport`.

use pgpverify_abstractions::{
    ErrorCode, ErrorSource, ErrorValue, HashAlgorithm, KeyLookup, PublicKeyAlgorithm, SigSummary, SignatureOutcome,
    VerifyReport,
};
use pgpverify_packets::{decode_signature, SignatureDecodeError, SignaturePacket};
use pgpverify_validation::{check_signature, evaluate, VerifyOptions};

/// One outcome per body, in input order. A failed signature never stops later ones.
///
/// A signature whose hash algorithm `hash_allowed` rejects is reported as a failure without
/// being checked.
pub(crate) fn assemble_report(
    signatures: &[Vec<u8>],
    signed_data: &[u8],
    keys: &dyn KeyLookup,
    options: &VerifyOptions,
    at: u64,
    file_name: Option<String>,
    hash_allowed: &dyn Fn(HashAlgorithm) -> bool,
) -> VerifyReport {
    let signatures = signatures
        .iter()
        .enumerate()
        .map(|(index, body)| {
            let outcome = match decode_signature(body) {
                Ok(sig) if !hash_allowed(sig.hash_algorithm) => undeclared_hash_outcome(&sig),
                Ok(sig) => checked_outcome(&sig, signed_data, keys, options, at),
                Err(e) => undecodable_outcome(&e),
            };
            tracing::debug!(
                index,
                summary = ?outcome.summary,
                status = %outcome.status,
                fingerprint = %outcome.fingerprint,
                "signature processed"
            );
            outcome
        })
        .collect();

    VerifyReport { signatures, file_name }
}

fn checked_outcome(
    sig: &SignaturePacket,
    signed_data: &[u8],
    keys: &dyn KeyLookup,
    options: &VerifyOptions,
    at: u64,
) -> SignatureOutcome {
    let check = check_signature(sig, signed_data, keys, options, at);
    let trust = evaluate(&check);

    let fingerprint = match (&check.key, &sig.issuer) {
        (Some(key), _) => key.fingerprint.to_hex(),
        (None, Some(issuer)) => issuer.to_string(),
        (None, None) => String::new(),
    };

    SignatureOutcome {
        summary: trust.summary,
        fingerprint,
        status: trust.status,
        timestamp: u64::from(sig.creation_time),
        exp_timestamp: sig.expiration_time().unwrap_or(0),
        validity: trust.validity,
        validity_reason: trust.validity_reason,
        public_key_algorithm: Some(sig.public_key_algorithm),
        hash_algorithm: Some(sig.hash_algorithm),
    }
}

fn undeclared_hash_outcome(sig: &SignaturePacket) -> SignatureOutcome {
    tracing::warn!(hash = sig.hash_algorithm.name(), "signature hash is not listed in the Hash armor header");
    let mut outcome = SignatureOutcome::failed(
        SigSummary::SYS_ERROR,
        ErrorValue::new(ErrorSource::Parser, ErrorCode::InvalidArmor),
    );
    outcome.fingerprint = sig.issuer.as_ref().map(ToString::to_string).unwrap_or_default();
    outcome.timestamp = u64::from(sig.creation_time);
    outcome.exp_timestamp = sig.expiration_time().unwrap_or(0);
    outcome.public_key_algorithm = Some(sig.public_key_algorithm);
    outcome.hash_algorithm = Some(sig.hash_algorithm);
    outcome
}

fn undecodable_outcome(e: &SignatureDecodeError) -> SignatureOutcome {
    tracing::warn!(error = %e.error, "signature packet could not be decoded");
    let partial = &e.partial;

    let mut outcome = SignatureOutcome::failed(SigSummary::SYS_ERROR, e.error.error_value());
    outcome.fingerprint = partial.issuer.as_ref().map(ToString::to_string).unwrap_or_default();
    outcome.timestamp = partial.creation_time.map(u64::from).unwrap_or(0);
    outcome.exp_timestamp = match (partial.creation_time, partial.expiration_seconds) {
        (Some(created), Some(secs)) if secs != 0 => u64::from(created) + u64::from(secs),
        _ => 0,
    };
    outcome.public_key_algorithm = partial.public_key_algorithm.and_then(PublicKeyAlgorithm::from_id);
    outcome.hash_algorithm = partial.hash_algorithm.and_then(HashAlgorithm::from_id);
    outcome
}
