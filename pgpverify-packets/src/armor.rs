// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! ASCII armor (RFC 4880 §6).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ParseError;

const BEGIN_PREFIX: &[u8] = b"-----BEGIN PGP ";
const END_PREFIX: &[u8] = b"-----END PGP ";
const DASHES: &[u8] = b"-----";

const CRC24_INIT: u32 = 0x00B7_04CE;
const CRC24_POLY: u32 = 0x0186_4CFB;

/// The label of an armor block (`-----BEGIN PGP <label>-----`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArmorKind {
    Message,
    Signature,
    SignedMessage,
    PublicKeyBlock,
    PrivateKeyBlock,
    Other(String),
}

impl ArmorKind {
    fn from_label(label: &str) -> Self {
        match label {
            "MESSAGE" => Self::Message,
            "SIGNATURE" => Self::Signature,
            "SIGNED MESSAGE" => Self::SignedMessage,
            "PUBLIC KEY BLOCK" => Self::PublicKeyBlock,
            "PRIVATE KEY BLOCK" => Self::PrivateKeyBlock,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Message => "MESSAGE",
            Self::Signature => "SIGNATURE",
            Self::SignedMessage => "SIGNED MESSAGE",
            Self::PublicKeyBlock => "PUBLIC KEY BLOCK",
            Self::PrivateKeyBlock => "PRIVATE KEY BLOCK",
            Self::Other(s) => s,
        }
    }
}

/// A decoded armor block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Armored {
    pub kind: ArmorKind,
    pub headers: Vec<(String, String)>,
    pub data: Vec<u8>,
    /// Number of input bytes up to and including the END line.
    pub consumed: usize,
}

/// CRC-24 as used by the armor checksum line.
pub fn crc24(data: &[u8]) -> u32 {
    let mut crc = CRC24_INIT;
    for &b in data {
        crc ^= (b as u32) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= CRC24_POLY;
            }
        }
    }
    crc & 0x00FF_FFFF
}

/// Whether `input` starts (after leading whitespace) with an armor BEGIN line.
pub fn is_armored(input: &[u8]) -> bool {
    input.trim_ascii_start().starts_with(BEGIN_PREFIX)
}

/// One input line with its trailing `\r\n` or `\n` removed.
pub(crate) struct Line<'a> {
    pub start: usize,
    /// Offset just past the line terminator.
    pub end: usize,
    pub text: &'a [u8],
}

pub(crate) fn lines(input: &[u8]) -> impl Iterator<Item = Line<'_>> {
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= input.len() {
            return None;
        }
        let start = pos;
        let (text_end, end) = match input[start..].iter().position(|b| *b == b'\n') {
            Some(i) => (start + i, start + i + 1),
            None => (input.len(), input.len()),
        };
        pos = end;
        let mut text = &input[start..text_end];
        if let [rest @ .., b'\r'] = text {
            text = rest;
        }
        Some(Line { start, end, text })
    })
}

/// Parse `-----BEGIN PGP <label>-----`, tolerating trailing whitespace.
pub(crate) fn begin_label(line: &[u8]) -> Option<&str> {
    armor_label(line, BEGIN_PREFIX)
}

fn armor_label<'a>(line: &'a [u8], prefix: &[u8]) -> Option<&'a str> {
    let line = line.trim_ascii_end();
    let inner = line.strip_prefix(prefix)?.strip_suffix(DASHES)?;
    std::str::from_utf8(inner).ok()
}

/// Decode the first armor block in `input`. Text before the BEGIN line is ignored.
pub fn dearmor(input: &[u8]) -> Result<Armored, ParseError> {
    let mut lines = lines(input);

    let kind = loop {
        let line = lines
            .next()
            .ok_or_else(|| ParseError::Armor("no BEGIN PGP line".into()))?;
        if let Some(label) = begin_label(line.text) {
            break ArmorKind::from_label(label);
        }
    };
    if kind == ArmorKind::SignedMessage {
        return Err(ParseError::Armor("cleartext signed message is not an armor block".into()));
    }

    let mut headers = Vec::new();
    let mut body = String::new();
    let mut checksum = None;
    let mut in_headers = true;
    let mut consumed = None;

    for line in lines.by_ref() {
        let text = std::str::from_utf8(line.text)
            .map_err(|_| ParseError::Armor("armor contains non UTF-8 text".into()))?
            .trim_end();

        if in_headers {
            if text.is_empty() {
                in_headers = false;
                continue;
            }
            if let Some((key, value)) = text.split_once(": ") {
                headers.push((key.to_string(), value.to_string()));
                continue;
            }
            // No header block at all.
            in_headers = false;
        }

        if let Some(label) = armor_label(text.as_bytes(), END_PREFIX) {
            if label != kind.label() {
                return Err(ParseError::Armor(format!(
                    "END PGP {label} does not match BEGIN PGP {}",
                    kind.label()
                )));
            }
            consumed = Some(line.end);
            break;
        }
        if checksum.is_some() {
            return Err(ParseError::Armor("data after the armor checksum".into()));
        }
        match text.strip_prefix('=') {
            Some(crc) if crc.len() == 4 => checksum = Some(decode_checksum(crc)?),
            _ => body.push_str(text),
        }
    }

    let consumed = consumed.ok_or_else(|| ParseError::Armor(format!("missing END PGP {} line", kind.label())))?;
    let data = STANDARD
        .decode(body.as_bytes())
        .map_err(|e| ParseError::Armor(format!("invalid base64: {e}")))?;

    if let Some(expected) = checksum {
        let computed = crc24(&data);
        if expected != computed {
            tracing::warn!(expected, computed, "armor checksum mismatch");
            return Err(ParseError::ArmorChecksum { expected, computed });
        }
    }

    tracing::debug!(kind = kind.label(), len = data.len(), "decoded armor");
    Ok(Armored {
        kind,
        headers,
        data,
        consumed,
    })
}

fn decode_checksum(text: &str) -> Result<u32, ParseError> {
    let bytes = STANDARD
        .decode(text)
        .map_err(|e| ParseError::Armor(format!("invalid checksum line: {e}")))?;
    match bytes.as_slice() {
        [a, b, c] => Ok(((*a as u32) << 16) | ((*b as u32) << 8) | *c as u32),
        _ => Err(ParseError::Armor("checksum must be 3 bytes".into())),
    }
}

/// Armor `data` with a CRC-24 checksum. Lines are 64 characters wide.
pub fn enarmor(kind: &ArmorKind, data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut out = format!("-----BEGIN PGP {}-----\n\n", kind.label());
    for chunk in encoded.as_bytes().chunks(64) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push('\n');
    }
    let crc = crc24(data).to_be_bytes();
    out.push('=');
    out.push_str(&STANDARD.encode(&crc[1..]));
    out.push('\n');
    out.push_str(&format!("-----END PGP {}-----\n", kind.label()));
    out
}
