// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Literal data packets (RFC 4880 §5.9).

use crate::error::DecodeError;
use crate::reader::Reader;

const PACKET: &str = "literal data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralData {
    /// `b`, `t`, `u`, `l`, `1` or `m`. Informational only; signatures define how data is hashed.
    pub format: u8,
    /// Raw file name bytes. Not covered by any signature.
    pub file_name: Vec<u8>,
    /// Modification date, seconds since the epoch. Not covered by any signature.
    pub date: u32,
    pub body: Vec<u8>,
}

impl LiteralData {
    /// The file name as text, or `None` if it is empty.
    pub fn file_name_lossy(&self) -> Option<String> {
        if self.file_name.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.file_name).into_owned())
        }
    }
}

pub fn decode_literal(body: &[u8]) -> Result<LiteralData, DecodeError> {
    let mut r = Reader::new(body);
    let format = r.read_u8().map_err(DecodeError::truncated(PACKET, "format"))?;
    let name_len = r.read_u8().map_err(DecodeError::truncated(PACKET, "file name length"))? as usize;
    let file_name = r.take(name_len).map_err(DecodeError::truncated(PACKET, "file name"))?.to_vec();
    let date = r.read_u32_be().map_err(DecodeError::truncated(PACKET, "date"))?;
    Ok(LiteralData {
        format,
        file_name,
        date,
        body: r.rest().to_vec(),
    })
}
