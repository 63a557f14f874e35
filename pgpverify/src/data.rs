// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Input buffers for verify calls.

use std::borrow::Cow;
use std::io::Read;

use crate::VerifyError;

/// Whether `Data::from_mem` copies the caller's bytes or borrows them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CopyMode {
    #[default]
    Copy,
    /// The buffer must outlive the `Data` and every call that uses it.
    Borrow,
}

/// A byte buffer handed to `Context::verify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data<'a> {
    buf: Cow<'a, [u8]>,
}

impl<'a> Data<'a> {
    pub fn from_mem(bytes: &'a [u8], mode: CopyMode) -> Self {
        let buf = match mode {
            CopyMode::Copy => Cow::Owned(bytes.to_vec()),
            CopyMode::Borrow => Cow::Borrowed(bytes),
        };
        Self { buf }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.buf, Cow::Borrowed(_))
    }

    pub fn into_owned(self) -> Data<'static> {
        Data {
            buf: Cow::Owned(self.buf.into_owned()),
        }
    }
}

impl Data<'static> {
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { buf: Cow::Owned(bytes) }
    }

    /// Read all of `reader`, failing with `TooLarge` once more than `max_len` bytes arrive.
    pub fn from_reader(reader: impl Read, max_len: usize) -> Result<Self, VerifyError> {
        let mut buf = Vec::new();
        let limit = u64::try_from(max_len).unwrap_or(u64::MAX).saturating_add(1);
        reader.take(limit).read_to_end(&mut buf)?;
        if buf.len() > max_len {
            tracing::warn!(max_len, "input exceeds size limit");
            return Err(VerifyError::TooLarge { limit: max_len });
        }
        Ok(Self::from_vec(buf))
    }
}

impl From<Vec<u8>> for Data<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl<'a> From<&'a [u8]> for Data<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::from_mem(bytes, CopyMode::Borrow)
    }
}
