// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Bounds-checked byte cursor.

/// Ran out of input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected end of data")]
pub struct EofError;

/// A read cursor over a borrowed byte slice.
///
/// Every accessor checks the remaining length first; nothing here can read past the end.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Everything not yet consumed.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], EofError> {
        if n > self.remaining() {
            return Err(EofError);
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, EofError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, EofError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, EofError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], EofError> {
        let b = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(b);
        Ok(out)
    }

    /// Read an OpenPGP multiprecision integer and return its magnitude bytes.
    ///
    /// The 2-byte bit count determines how many bytes follow. Leading zero bytes that a
    /// sloppy encoder may have left in are stripped.
    pub fn read_mpi(&mut self) -> Result<&'a [u8], EofError> {
        let bits = self.read_u16_be()? as usize;
        let bytes = self.take(bits.div_ceil(8))?;
        let first_nonzero = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        Ok(&bytes[first_nonzero..])
    }
}
