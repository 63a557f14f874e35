// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cleartext signature framework (RFC 4880 §7).

use pgpverify_abstractions::HashAlgorithm;

use crate::armor::{begin_label, dearmor, lines, ArmorKind};
use crate::error::ParseError;

/// A parsed `-----BEGIN PGP SIGNED MESSAGE-----` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleartext {
    /// Values of the `Hash:` armor headers, in order.
    pub hash_headers: Vec<String>,
    /// The text as it was signed: dash escaping removed, trailing spaces and tabs removed,
    /// lines joined with CRLF and no line ending after the last line.
    pub signed_text: Vec<u8>,
    /// The text for display: dash escaping removed, one LF after every line.
    pub plaintext: Vec<u8>,
    /// Binary signature packets from the trailing armored signature block.
    pub signature: Vec<u8>,
}

impl Cleartext {
    /// Whether a signature made with `hash` may cover this text. Without `Hash:` headers every
    /// algorithm is accepted.
    pub fn declares_hash(&self, hash: HashAlgorithm) -> bool {
        self.hash_headers.is_empty()
            || self
                .hash_headers
                .iter()
                .any(|declared| declared.eq_ignore_ascii_case(hash.name()))
    }
}

pub fn is_cleartext_signed(input: &[u8]) -> bool {
    lines(input.trim_ascii_start())
        .next()
        .and_then(|l| begin_label(l.text))
        .is_some_and(|label| label == ArmorKind::SignedMessage.label())
}

pub fn parse_cleartext(input: &[u8]) -> Result<Cleartext, ParseError> {
    let mut lines = lines(input);

    loop {
        let line = lines
            .next()
            .ok_or_else(|| ParseError::Armor("no BEGIN PGP SIGNED MESSAGE line".into()))?;
        if begin_label(line.text) == Some(ArmorKind::SignedMessage.label()) {
            break;
        }
    }

    let mut hash_headers = Vec::new();
    loop {
        let line = lines
            .next()
            .ok_or_else(|| ParseError::Armor("cleartext header block is not terminated".into()))?;
        let text = line.text.trim_ascii_end();
        if text.is_empty() {
            break;
        }
        let text = std::str::from_utf8(text)
            .map_err(|_| ParseError::Armor("cleartext header is not UTF-8".into()))?;
        match text.split_once(": ") {
            Some(("Hash", value)) => hash_headers.extend(value.split(',').map(|v| v.trim().to_string())),
            Some(_) => {}
            None => return Err(ParseError::Armor(format!("invalid cleartext header line {text:?}"))),
        }
    }

    let mut text_lines: Vec<&[u8]> = Vec::new();
    let signature_start = loop {
        let line = lines
            .next()
            .ok_or_else(|| ParseError::Armor("cleartext message has no signature block".into()))?;
        if begin_label(line.text) == Some(ArmorKind::Signature.label()) {
            break line.start;
        }
        let text = line.text.strip_prefix(b"- ").unwrap_or(line.text);
        text_lines.push(text);
    };

    let mut signed_text = Vec::new();
    let mut plaintext = Vec::new();
    for (i, line) in text_lines.iter().enumerate() {
        if i > 0 {
            signed_text.extend_from_slice(b"\r\n");
        }
        signed_text.extend_from_slice(trim_spaces_and_tabs(line));
        plaintext.extend_from_slice(line);
        plaintext.push(b'\n');
    }

    let armored = dearmor(&input[signature_start..])?;
    if armored.kind != ArmorKind::Signature {
        return Err(ParseError::Armor(format!(
            "expected a PGP SIGNATURE block, found {}",
            armored.kind.label()
        )));
    }

    tracing::debug!(lines = text_lines.len(), hash = ?hash_headers, "parsed cleartext signed message");
    Ok(Cleartext {
        hash_headers,
        signed_text,
        plaintext,
        signature: armored.data,
    })
}

fn trim_spaces_and_tabs(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| *b != b' ' && *b != b'\t')
        .map_or(0, |i| i + 1);
    &line[..end]
}
