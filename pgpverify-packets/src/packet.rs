// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! OpenPGP packet framing (RFC 4880 §4.2).
//!
//! `PacketParser` is a lazy iterator over the packets in a byte slice. It only understands
//! headers: tag, header format and body length. Bodies are returned as-is; bodies sent
//! with partial lengths are reassembled into an owned buffer.

use std::borrow::Cow;

use crate::error::ParseError;
use crate::reader::Reader;

/// Packet tags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    PublicKeyEncryptedSessionKey,
    Signature,
    SymmetricKeyEncryptedSessionKey,
    OnePassSignature,
    SecretKey,
    PublicKey,
    SecretSubkey,
    CompressedData,
    SymmetricallyEncryptedData,
    Marker,
    LiteralData,
    Trust,
    UserId,
    PublicSubkey,
    UserAttribute,
    SymEncryptedIntegrityProtectedData,
    ModificationDetectionCode,
    AeadEncryptedData,
    Padding,
    Other(u8),
}

impl Tag {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Tag::PublicKeyEncryptedSessionKey,
            2 => Tag::Signature,
            3 => Tag::SymmetricKeyEncryptedSessionKey,
            4 => Tag::OnePassSignature,
            5 => Tag::SecretKey,
            6 => Tag::PublicKey,
            7 => Tag::SecretSubkey,
            8 => Tag::CompressedData,
            9 => Tag::SymmetricallyEncryptedData,
            10 => Tag::Marker,
            11 => Tag::LiteralData,
            12 => Tag::Trust,
            13 => Tag::UserId,
            14 => Tag::PublicSubkey,
            17 => Tag::UserAttribute,
            18 => Tag::SymEncryptedIntegrityProtectedData,
            19 => Tag::ModificationDetectionCode,
            20 => Tag::AeadEncryptedData,
            21 => Tag::Padding,
            other => Tag::Other(other),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Tag::PublicKeyEncryptedSessionKey => 1,
            Tag::Signature => 2,
            Tag::SymmetricKeyEncryptedSessionKey => 3,
            Tag::OnePassSignature => 4,
            Tag::SecretKey => 5,
            Tag::PublicKey => 6,
            Tag::SecretSubkey => 7,
            Tag::CompressedData => 8,
            Tag::SymmetricallyEncryptedData => 9,
            Tag::Marker => 10,
            Tag::LiteralData => 11,
            Tag::Trust => 12,
            Tag::UserId => 13,
            Tag::PublicSubkey => 14,
            Tag::UserAttribute => 17,
            Tag::SymEncryptedIntegrityProtectedData => 18,
            Tag::ModificationDetectionCode => 19,
            Tag::AeadEncryptedData => 20,
            Tag::Padding => 21,
            Tag::Other(v) => v,
        }
    }

    /// Only data packets may use partial body lengths.
    fn allows_partial_length(self) -> bool {
        matches!(
            self,
            Tag::CompressedData
                | Tag::SymmetricallyEncryptedData
                | Tag::LiteralData
                | Tag::SymEncryptedIntegrityProtectedData
                | Tag::AeadEncryptedData
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeaderFormat {
    /// Legacy header: tag in bits 5..2, length type in bits 1..0.
    Old,
    /// New header: tag in bits 5..0, variable-length length octets.
    New,
}

/// One framed packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet<'a> {
    pub tag: Tag,
    pub format: HeaderFormat,
    /// Offset of the packet header within the parsed input.
    pub offset: usize,
    pub body: Cow<'a, [u8]>,
}

impl Packet<'_> {
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_owned(self) -> Packet<'static> {
        Packet {
            tag: self.tag,
            format: self.format,
            offset: self.offset,
            body: Cow::Owned(self.body.into_owned()),
        }
    }
}

/// Lazy packet iterator.
///
/// Yields `Err` at most once: after a framing error the iterator is exhausted because the
/// position of the next header can no longer be trusted.
#[derive(Debug, Clone)]
pub struct PacketParser<'a> {
    input: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> PacketParser<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            failed: false,
        }
    }

    /// Start over on a new input.
    pub fn restart(&mut self, input: &'a [u8]) {
        self.input = input;
        self.pos = 0;
        self.failed = false;
    }

    /// Offset of the next packet header.
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn next_packet(&mut self) -> Result<Packet<'a>, ParseError> {
        let offset = self.pos;
        let mut r = Reader::new(&self.input[offset..]);

        let ctb = r.read_u8().map_err(|_| ParseError::TruncatedHeader { offset })?;
        if ctb & 0x80 == 0 {
            return Err(ParseError::InvalidHeader { offset, byte: ctb });
        }

        let (packet, consumed) = if ctb & 0x40 != 0 {
            let tag = Tag::from_u8(ctb & 0x3F);
            if tag == Tag::Other(0) {
                return Err(ParseError::ReservedTag { offset });
            }
            let body = read_new_format_body(&mut r, tag, offset)?;
            (
                Packet {
                    tag,
                    format: HeaderFormat::New,
                    offset,
                    body,
                },
                r.position(),
            )
        } else {
            let tag = Tag::from_u8((ctb >> 2) & 0x0F);
            if tag == Tag::Other(0) {
                return Err(ParseError::ReservedTag { offset });
            }
            let len = match ctb & 0x03 {
                0 => Some(r.read_u8().map(usize::from)),
                1 => Some(r.read_u16_be().map(usize::from)),
                2 => Some(r.read_u32_be().map(|v| v as usize)),
                _ => None,
            };
            let len = match len {
                Some(l) => l.map_err(|_| ParseError::TruncatedHeader { offset })?,
                // Indeterminate length: the packet extends to the end of the input.
                None => r.remaining(),
            };
            let body = take_body(&mut r, len, offset)?;
            (
                Packet {
                    tag,
                    format: HeaderFormat::Old,
                    offset,
                    body: Cow::Borrowed(body),
                },
                r.position(),
            )
        };

        self.pos = offset + consumed;
        tracing::trace!(tag = ?packet.tag, offset, len = packet.body.len(), "parsed packet");
        Ok(packet)
    }
}

impl<'a> Iterator for PacketParser<'a> {
    type Item = Result<Packet<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.input.len() {
            return None;
        }
        match self.next_packet() {
            Ok(p) => Some(Ok(p)),
            Err(e) => {
                self.failed = true;
                tracing::warn!(error = %e, "packet framing error");
                Some(Err(e))
            }
        }
    }
}

/// Parse every packet in `input`, failing on the first framing error.
pub fn parse_packets(input: &[u8]) -> Result<Vec<Packet<'_>>, ParseError> {
    PacketParser::new(input).collect()
}

fn take_body<'a>(r: &mut Reader<'a>, len: usize, offset: usize) -> Result<&'a [u8], ParseError> {
    let available = r.remaining();
    r.take(len).map_err(|_| ParseError::TruncatedBody {
        offset,
        declared: len,
        available,
    })
}

enum NewLength {
    Full(usize),
    Partial(usize),
}

fn read_new_length(r: &mut Reader<'_>, offset: usize) -> Result<NewLength, ParseError> {
    let truncated = |_| ParseError::TruncatedHeader { offset };
    let first = r.read_u8().map_err(truncated)?;
    let len = match first {
        0..=191 => NewLength::Full(first as usize),
        192..=223 => {
            let second = r.read_u8().map_err(truncated)?;
            NewLength::Full((((first as usize) - 192) << 8) + second as usize + 192)
        }
        224..=254 => NewLength::Partial(1usize << (first & 0x1F)),
        255 => NewLength::Full(r.read_u32_be().map_err(truncated)? as usize),
    };
    Ok(len)
}

fn read_new_format_body<'a>(r: &mut Reader<'a>, tag: Tag, offset: usize) -> Result<Cow<'a, [u8]>, ParseError> {
    match read_new_length(r, offset)? {
        NewLength::Full(len) => Ok(Cow::Borrowed(take_body(r, len, offset)?)),
        NewLength::Partial(first_len) => {
            if !tag.allows_partial_length() {
                return Err(ParseError::PartialLengthNotAllowed { tag: tag.id() });
            }
            let mut body = take_body(r, first_len, offset)?.to_vec();
            loop {
                match read_new_length(r, offset)? {
                    NewLength::Partial(len) => body.extend_from_slice(take_body(r, len, offset)?),
                    NewLength::Full(len) => {
                        body.extend_from_slice(take_body(r, len, offset)?);
                        break;
                    }
                }
            }
            Ok(Cow::Owned(body))
        }
    }
}
