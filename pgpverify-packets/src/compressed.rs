// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compressed data packets (RFC 4880 §5.6).

use std::io::Read;

use flate2::read::{DeflateDecoder, ZlibDecoder};

use crate::error::ParseError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompressionAlgorithm {
    Uncompressed,
    /// Raw deflate (RFC 1951).
    Zip,
    /// Deflate with a zlib wrapper (RFC 1950).
    Zlib,
    BZip2,
    Other(u8),
}

impl CompressionAlgorithm {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Uncompressed,
            1 => Self::Zip,
            2 => Self::Zlib,
            3 => Self::BZip2,
            other => Self::Other(other),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Self::Uncompressed => 0,
            Self::Zip => 1,
            Self::Zlib => 2,
            Self::BZip2 => 3,
            Self::Other(v) => v,
        }
    }
}

/// Inflate a compressed data packet body, refusing output longer than `limit` bytes.
pub fn decompress(body: &[u8], limit: usize) -> Result<Vec<u8>, ParseError> {
    let (&algo, data) = body
        .split_first()
        .ok_or_else(|| ParseError::Structure("empty compressed data packet".into()))?;
    let algo = CompressionAlgorithm::from_u8(algo);
    tracing::debug!(?algo, compressed_len = data.len(), "inflating compressed packet");

    let out = match algo {
        CompressionAlgorithm::Uncompressed => data.to_vec(),
        CompressionAlgorithm::Zip => read_limited(DeflateDecoder::new(data), limit)?,
        CompressionAlgorithm::Zlib => read_limited(ZlibDecoder::new(data), limit)?,
        CompressionAlgorithm::BZip2 | CompressionAlgorithm::Other(_) => {
            return Err(ParseError::UnsupportedCompression(algo.id()))
        }
    };
    if out.len() > limit {
        return Err(ParseError::DecompressedTooLarge { limit });
    }
    Ok(out)
}

fn read_limited<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>, ParseError> {
    let mut out = Vec::new();
    reader
        .take(u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|e| ParseError::Decompression(e.to_string()))?;
    Ok(out)
}
