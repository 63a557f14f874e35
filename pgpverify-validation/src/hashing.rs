// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signature pre-image and digest computation (RFC 4880 §5.2.4).

use std::borrow::Cow;

use pgpverify_abstractions::HashAlgorithm;
use pgpverify_packets::{SignaturePacket, SignatureType};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

/// Convert lone LF line endings to CRLF. Existing CRLF pairs and lone CR are kept.
pub fn canonicalize_text(data: &[u8]) -> Cow<'_, [u8]> {
    let lone_lf = data
        .iter()
        .enumerate()
        .any(|(i, b)| *b == b'\n' && (i == 0 || data[i - 1] != b'\r'));
    if !lone_lf {
        return Cow::Borrowed(data);
    }

    let mut out = Vec::with_capacity(data.len() + data.len() / 32);
    let mut prev = 0u8;
    for &b in data {
        if b == b'\n' && prev != b'\r' {
            out.push(b'\r');
        }
        out.push(b);
        prev = b;
    }
    Cow::Owned(out)
}

/// Bytes hashed after the document: the signature's hashed fields plus, for v4, the final trailer.
pub fn signature_trailer(sig: &SignaturePacket) -> Vec<u8> {
    let mut out = sig.hashed_header.clone();
    if sig.version >= 4 {
        let len = sig.hashed_header.len() as u32;
        out.push(sig.version);
        out.push(0xFF);
        out.extend_from_slice(&len.to_be_bytes());
    }
    out
}

/// Incremental hasher over the algorithms this crate can compute.
#[derive(Clone)]
pub enum DocumentHasher {
    Sha1(Sha1),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl DocumentHasher {
    pub fn new(alg: HashAlgorithm) -> Option<Self> {
        let h = match alg {
            HashAlgorithm::Sha1 => Self::Sha1(Sha1::new()),
            HashAlgorithm::Sha224 => Self::Sha224(Sha224::new()),
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => Self::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => Self::Sha512(Sha512::new()),
            _ => return None,
        };
        Some(h)
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha1(h) => h.update(data),
            Self::Sha224(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            Self::Sha1(h) => h.finalize().to_vec(),
            Self::Sha224(h) => h.finalize().to_vec(),
            Self::Sha256(h) => h.finalize().to_vec(),
            Self::Sha384(h) => h.finalize().to_vec(),
            Self::Sha512(h) => h.finalize().to_vec(),
        }
    }
}

/// Digest of `data` as covered by `sig`, or `None` if the hash algorithm is not computable.
///
/// Text signatures hash the canonical (CRLF) form of `data`.
pub fn compute_digest(sig: &SignaturePacket, data: &[u8]) -> Option<Vec<u8>> {
    let mut hasher = DocumentHasher::new(sig.hash_algorithm)?;
    match sig.signature_type {
        SignatureType::Text => hasher.update(&canonicalize_text(data)),
        _ => hasher.update(data),
    }
    hasher.update(&signature_trailer(sig));
    Some(hasher.finalize())
}
