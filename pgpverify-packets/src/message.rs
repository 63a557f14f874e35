// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Message structure: which packets are signatures and which bytes they sign.
//!
//! Accepted shapes:
//! - detached: `Signature+`
//! - one-pass: `OnePassSignature+ LiteralData Signature+`
//! - prefix: `Signature+ LiteralData`
//!
//! Any of these may be wrapped in one or more compressed data packets. Marker and padding
//! packets are ignored wherever they appear.

use crate::compressed::decompress;
use crate::error::ParseError;
use crate::literal::{decode_literal, LiteralData};
use crate::one_pass::{decode_one_pass, OnePassSignature};
use crate::packet::{PacketParser, Tag};

/// Compressed packets nested deeper than this are rejected.
pub const MAX_COMPRESSION_DEPTH: usize = 8;

/// The parts of an inline signed message the verifier needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    /// Signature packet bodies, in the order they appear.
    pub signatures: Vec<Vec<u8>>,
    pub one_pass: Vec<OnePassSignature>,
    pub literal: LiteralData,
}

/// Split a detached signature stream into signature packet bodies.
pub fn split_detached_signatures(input: &[u8]) -> Result<Vec<Vec<u8>>, ParseError> {
    let mut signatures = Vec::new();
    for packet in PacketParser::new(input) {
        let packet = packet?;
        match packet.tag {
            Tag::Signature => signatures.push(packet.body.into_owned()),
            Tag::Marker | Tag::Padding => {}
            other => {
                tracing::warn!(tag = other.id(), offset = packet.offset, "unexpected packet in detached signature");
                return Err(ParseError::UnexpectedPacket {
                    tag: other.id(),
                    offset: packet.offset,
                });
            }
        }
    }
    if signatures.is_empty() {
        return Err(ParseError::NoSignatures);
    }
    tracing::debug!(count = signatures.len(), "split detached signatures");
    Ok(signatures)
}

#[derive(Default)]
struct Collector {
    leading: Vec<Vec<u8>>,
    trailing: Vec<Vec<u8>>,
    one_pass: Vec<OnePassSignature>,
    literal: Option<LiteralData>,
}

/// Extract signatures and signed data from an inline signed message.
///
/// `max_decompressed` bounds the output of every compressed packet.
pub fn extract_signed_message(input: &[u8], max_decompressed: usize) -> Result<SignedMessage, ParseError> {
    let mut c = Collector::default();
    collect(input, 0, max_decompressed, &mut c)?;

    let literal = c.literal.ok_or(ParseError::NoSignedData)?;
    if c.leading.is_empty() && c.trailing.is_empty() {
        return Err(ParseError::NoSignatures);
    }
    if c.one_pass.len() != c.trailing.len() {
        return Err(ParseError::Structure(format!(
            "{} one-pass signature packets but {} trailing signatures",
            c.one_pass.len(),
            c.trailing.len()
        )));
    }

    let mut signatures = c.leading;
    signatures.extend(c.trailing);
    tracing::debug!(
        signatures = signatures.len(),
        one_pass = c.one_pass.len(),
        literal_len = literal.body.len(),
        "extracted signed message"
    );
    Ok(SignedMessage {
        signatures,
        one_pass: c.one_pass,
        literal,
    })
}

fn collect(input: &[u8], depth: usize, max_decompressed: usize, c: &mut Collector) -> Result<(), ParseError> {
    for packet in PacketParser::new(input) {
        let packet = packet?;
        match packet.tag {
            Tag::Marker | Tag::Padding => {}
            Tag::CompressedData => {
                if depth >= MAX_COMPRESSION_DEPTH {
                    return Err(ParseError::NestingTooDeep(MAX_COMPRESSION_DEPTH));
                }
                let inner = decompress(&packet.body, max_decompressed)?;
                collect(&inner, depth + 1, max_decompressed, c)?;
            }
            Tag::OnePassSignature => {
                if c.literal.is_some() {
                    return Err(ParseError::Structure("one-pass signature after literal data".into()));
                }
                c.one_pass.push(decode_one_pass(&packet.body)?);
            }
            Tag::Signature => {
                if c.literal.is_some() {
                    c.trailing.push(packet.body.into_owned());
                } else {
                    c.leading.push(packet.body.into_owned());
                }
            }
            Tag::LiteralData => {
                if c.literal.is_some() {
                    return Err(ParseError::Structure("more than one literal data packet".into()));
                }
                c.literal = Some(decode_literal(&packet.body)?);
            }
            other => {
                tracing::warn!(tag = other.id(), offset = packet.offset, "unexpected packet in signed message");
                return Err(ParseError::UnexpectedPacket {
                    tag: other.id(),
                    offset: packet.offset,
                });
            }
        }
    }
    Ok(())
}
