// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Maps a `SignatureCheck` to summary bits, status and validity.

use pgpverify_abstractions::{ErrorCode, ErrorSource, ErrorValue, SigSummary, Validity};

use crate::engine::{CryptoVerdict, SignatureCheck};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrustEvaluation {
    pub summary: SigSummary,
    pub status: ErrorValue,
    pub validity: Validity,
    pub validity_reason: ErrorValue,
}

/// Combine the verdict, key classification and expiry flags.
///
/// Status precedence, highest first: an error that prevented checking, policy rejection,
/// revoked key, expired key, expired signature, missing key, bad signature.
/// `validity_reason` names the highest trust condition (revoked, expired or missing key).
pub fn evaluate(check: &SignatureCheck) -> TrustEvaluation {
    let mut summary = SigSummary::empty();
    let revoked = check.revoked();
    let key_missing = check.verdict == CryptoVerdict::KeyMissing;

    summary.set(SigSummary::KEY_REVOKED, revoked);
    summary.set(SigSummary::KEY_EXPIRED, check.key_expired);
    summary.set(SigSummary::SIG_EXPIRED, check.sig_expired);
    summary.set(SigSummary::KEY_MISSING, key_missing);
    match check.verdict {
        CryptoVerdict::Bad => summary |= SigSummary::RED,
        CryptoVerdict::PolicyRejected => summary |= SigSummary::BAD_POLICY,
        CryptoVerdict::Error(_) => summary |= SigSummary::SYS_ERROR,
        CryptoVerdict::Good | CryptoVerdict::KeyMissing => {}
    }

    let trust_condition = if revoked {
        Some(ErrorValue::new(ErrorSource::Trust, ErrorCode::Revoked))
    } else if check.key_expired {
        Some(ErrorValue::new(ErrorSource::Trust, ErrorCode::KeyExpired))
    } else if check.sig_expired {
        Some(ErrorValue::new(ErrorSource::Trust, ErrorCode::SigExpired))
    } else if key_missing {
        Some(ErrorValue::new(ErrorSource::KeyLookup, ErrorCode::KeyMissing))
    } else {
        None
    };

    let status = match &check.verdict {
        CryptoVerdict::Error(e) => *e,
        CryptoVerdict::PolicyRejected => ErrorValue::new(ErrorSource::Engine, ErrorCode::BadPolicy),
        CryptoVerdict::Bad if trust_condition.is_none() => {
            ErrorValue::new(ErrorSource::Engine, ErrorCode::CryptoMismatch)
        }
        _ => trust_condition.unwrap_or(ErrorValue::SUCCESS),
    };

    if check.verdict.is_good() && !summary.intersects(SigSummary::NEGATIVE) {
        summary |= SigSummary::GREEN;
    }

    let validity = match &check.key {
        _ if key_missing => Validity::Unknown,
        Some(_) if revoked => Validity::Never,
        Some(key) => key.validity,
        None => Validity::Unknown,
    };

    if status.is_success() && summary.contains(SigSummary::GREEN) && validity.is_fully_trusted() {
        summary |= SigSummary::VALID;
    }

    TrustEvaluation {
        summary,
        status,
        validity,
        validity_reason: trust_condition.unwrap_or(ErrorValue::SUCCESS),
    }
}
