// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod common;

use common::*;
use pgpverify_abstractions::{ErrorCode, HashAlgorithm};
use pgpverify_packets::{
    crc24, dearmor, enarmor, is_armored, is_cleartext_signed, parse_cleartext, ArmorKind, ParseError,
};

#[test]
fn crc24_matches_known_values() {
    assert_eq!(crc24(b""), 0xB704CE);
    // Check value from RFC 4880 reference implementation for "123456789".
    assert_eq!(crc24(b"123456789"), 0x21CF02);
}

#[test]
fn enarmored_data_decodes_back() {
    let data = new_packet(2, &simple_signature_body());
    let text = enarmor(&ArmorKind::Signature, &data);
    assert!(is_armored(text.as_bytes()));

    let armored = dearmor(text.as_bytes()).unwrap();
    assert_eq!(armored.kind, ArmorKind::Signature);
    assert_eq!(armored.data, data);
    assert_eq!(armored.consumed, text.len());
}

#[test]
fn headers_and_crlf_are_accepted() {
    let data = b"\xc2\x01\x00".to_vec();
    let text = enarmor(&ArmorKind::Message, &data)
        .replacen("\n\n", "\nVersion: test 1.0\nComment: hi\n\n", 1)
        .replace('\n', "\r\n");
    let text = format!("leading noise\r\n{text}");

    let armored = dearmor(text.as_bytes()).unwrap();
    assert_eq!(armored.kind, ArmorKind::Message);
    assert_eq!(
        armored.headers,
        vec![
            ("Version".to_string(), "test 1.0".to_string()),
            ("Comment".to_string(), "hi".to_string())
        ]
    );
    assert_eq!(armored.data, data);
}

#[test]
fn checksum_mismatch_is_rejected() {
    let text = enarmor(&ArmorKind::Signature, b"hello world");
    let crc_line = text.lines().find(|l| l.starts_with('=')).unwrap();
    let tampered = text.replace(crc_line, "=AAAA");

    let err = dearmor(tampered.as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::ArmorChecksum { .. }));
    assert_eq!(err.code(), ErrorCode::InvalidArmor);
}

#[test]
fn missing_end_line_is_rejected() {
    let text = enarmor(&ArmorKind::Signature, b"hello world");
    let cut = text.replace("-----END PGP SIGNATURE-----\n", "");
    assert!(matches!(dearmor(cut.as_bytes()), Err(ParseError::Armor(_))));
}

#[test]
fn mismatched_end_label_is_rejected() {
    let text = enarmor(&ArmorKind::Signature, b"x").replace("END PGP SIGNATURE", "END PGP MESSAGE");
    assert!(matches!(dearmor(text.as_bytes()), Err(ParseError::Armor(_))));
}

#[test]
fn binary_input_is_not_armored() {
    assert!(!is_armored(&new_packet(2, &[1, 2, 3])));
    assert!(matches!(dearmor(b"no armor here"), Err(ParseError::Armor(_))));
}

fn cleartext_document(body: &str) -> String {
    let sig = enarmor(&ArmorKind::Signature, &new_packet(2, &simple_signature_body()));
    format!("-----BEGIN PGP SIGNED MESSAGE-----\nHash: SHA256\n\n{body}{sig}")
}

#[test]
fn cleartext_is_unescaped_and_canonicalized() {
    let doc = cleartext_document("Hello  \n- -----dashes\n- - nested\n\ttabbed\t\n");
    assert!(is_cleartext_signed(doc.as_bytes()));
    assert!(!is_armored(b"plain text"));

    let ct = parse_cleartext(doc.as_bytes()).unwrap();
    assert_eq!(ct.hash_headers, vec!["SHA256".to_string()]);
    assert_eq!(ct.signed_text, b"Hello\r\n-----dashes\r\n- nested\r\n\ttabbed".to_vec());
    assert_eq!(ct.plaintext, b"Hello  \n-----dashes\n- nested\n\ttabbed\t\n".to_vec());
    assert_eq!(ct.signature, new_packet(2, &simple_signature_body()));
}

#[test]
fn hash_headers_limit_the_accepted_algorithms() {
    let sig = enarmor(&ArmorKind::Signature, &new_packet(2, &simple_signature_body()));
    let doc = format!("-----BEGIN PGP SIGNED MESSAGE-----\nHash: SHA1, sha512\nHash: RIPEMD160\n\ntext\n{sig}");
    let ct = parse_cleartext(doc.as_bytes()).unwrap();
    assert_eq!(ct.hash_headers, ["SHA1", "sha512", "RIPEMD160"]);
    assert!(ct.declares_hash(HashAlgorithm::Sha1));
    assert!(ct.declares_hash(HashAlgorithm::Sha512));
    assert!(ct.declares_hash(HashAlgorithm::Ripemd160));
    assert!(!ct.declares_hash(HashAlgorithm::Sha256));

    let doc = format!("-----BEGIN PGP SIGNED MESSAGE-----\n\ntext\n{sig}");
    let ct = parse_cleartext(doc.as_bytes()).unwrap();
    assert!(ct.hash_headers.is_empty());
    assert!(ct.declares_hash(HashAlgorithm::Sha256));
}

#[test]
fn cleartext_with_crlf_input_matches_lf_input() {
    let lf = cleartext_document("line one\nline two\n");
    let crlf = lf.replace('\n', "\r\n");
    let a = parse_cleartext(lf.as_bytes()).unwrap();
    let b = parse_cleartext(crlf.as_bytes()).unwrap();
    assert_eq!(a.signed_text, b.signed_text);
    assert_eq!(a.signed_text, b"line one\r\nline two".to_vec());
}

#[test]
fn cleartext_without_signature_block_is_rejected() {
    let doc = "-----BEGIN PGP SIGNED MESSAGE-----\nHash: SHA256\n\nno signature\n";
    let err = parse_cleartext(doc.as_bytes()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArmor);
}

#[test]
fn signed_message_label_is_not_a_plain_armor_block() {
    let doc = cleartext_document("text\n");
    assert!(dearmor(doc.as_bytes()).is_err());
}
