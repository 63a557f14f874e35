// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use pgpverify_abstractions::{ErrorCode, ErrorSource, ErrorValue};
use pgpverify_packets::ParseError;

/// A verify call or data operation that failed as a whole.
///
/// Failures of individual signatures are not errors. They are reported in the `VerifyReport`.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl VerifyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            VerifyError::Parse(e) => e.code(),
            VerifyError::Io(_) => ErrorCode::Io,
            VerifyError::TooLarge { .. } => ErrorCode::TooLarge,
            VerifyError::InvalidValue(_) => ErrorCode::InvalidValue,
        }
    }

    /// Two-axis value for this error, suitable for `strerror` and `strsource`.
    pub fn error_value(&self) -> ErrorValue {
        match self {
            VerifyError::Parse(e) => e.error_value(),
            _ => ErrorValue::new(ErrorSource::User, self.code()),
        }
    }
}
