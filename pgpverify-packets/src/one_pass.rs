// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! One-pass signature packets (RFC 4880 §5.4).

use pgpverify_abstractions::KeyId;

use crate::error::DecodeError;
use crate::reader::Reader;
use crate::signature::SignatureType;

const PACKET: &str = "one-pass signature";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnePassSignature {
    pub signature_type: SignatureType,
    pub hash_algorithm: u8,
    pub public_key_algorithm: u8,
    pub key_id: KeyId,
    /// `false` when another one-pass packet follows that is covered by the same signature.
    pub last: bool,
}

pub fn decode_one_pass(body: &[u8]) -> Result<OnePassSignature, DecodeError> {
    let mut r = Reader::new(body);
    let version = r.read_u8().map_err(DecodeError::truncated(PACKET, "version"))?;
    if version != 3 {
        return Err(DecodeError::UnsupportedVersion { packet: PACKET, version });
    }
    let signature_type = SignatureType::from_u8(r.read_u8().map_err(DecodeError::truncated(PACKET, "signature type"))?);
    let hash_algorithm = r.read_u8().map_err(DecodeError::truncated(PACKET, "hash algorithm"))?;
    let public_key_algorithm = r.read_u8().map_err(DecodeError::truncated(PACKET, "public-key algorithm"))?;
    let key_id = KeyId(r.read_array().map_err(DecodeError::truncated(PACKET, "key id"))?);
    let nested = r.read_u8().map_err(DecodeError::truncated(PACKET, "nested flag"))?;
    if !r.is_empty() {
        return Err(DecodeError::malformed(PACKET, format!("{} trailing bytes", r.remaining())));
    }
    Ok(OnePassSignature {
        signature_type,
        hash_algorithm,
        public_key_algorithm,
        key_id,
        last: nested != 0,
    })
}
