// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Byte-level builders for OpenPGP packets used by the parser tests.

#![allow(dead_code)]

/// New-format packet with the shortest length encoding for `body`.
pub(crate) fn new_packet(tag: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![0xC0 | tag];
    let len = body.len();
    if len < 192 {
        out.push(len as u8);
    } else if len < 8384 {
        let v = len - 192;
        out.push(((v >> 8) as u8) + 192);
        out.push((v & 0xFF) as u8);
    } else {
        out.push(0xFF);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    }
    out.extend_from_slice(body);
    out
}

/// Old-format packet using a 1, 2 or 4 byte length (`len_type` 0, 1 or 2).
pub(crate) fn old_packet(tag: u8, len_type: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![0x80 | (tag << 2) | len_type];
    match len_type {
        0 => out.push(body.len() as u8),
        1 => out.extend_from_slice(&(body.len() as u16).to_be_bytes()),
        2 => out.extend_from_slice(&(body.len() as u32).to_be_bytes()),
        _ => {}
    }
    out.extend_from_slice(body);
    out
}

/// Signature subpacket with a one-byte length.
pub(crate) fn subpacket(typ: u8, data: &[u8]) -> Vec<u8> {
    let mut out = vec![(data.len() + 1) as u8, typ];
    out.extend_from_slice(data);
    out
}

pub(crate) fn creation_time(t: u32) -> Vec<u8> {
    subpacket(2, &t.to_be_bytes())
}

pub(crate) fn issuer_key_id(id: [u8; 8]) -> Vec<u8> {
    subpacket(16, &id)
}

pub(crate) fn issuer_fingerprint(fpr: [u8; 20]) -> Vec<u8> {
    let mut data = vec![4];
    data.extend_from_slice(&fpr);
    subpacket(33, &data)
}

/// MPI encoding of `value` (leading zeros are not stripped).
pub(crate) fn mpi(value: &[u8]) -> Vec<u8> {
    let bits = match value.iter().position(|b| *b != 0) {
        Some(i) => (value.len() - i) * 8 - value[i].leading_zeros() as usize,
        None => 0,
    };
    let mut out = (bits as u16).to_be_bytes().to_vec();
    out.extend_from_slice(value);
    out
}

/// v4 signature body with a fake RSA signature value.
pub(crate) fn v4_signature_body(sig_type: u8, pk: u8, hash: u8, hashed: &[Vec<u8>], unhashed: &[Vec<u8>]) -> Vec<u8> {
    let hashed: Vec<u8> = hashed.concat();
    let unhashed: Vec<u8> = unhashed.concat();
    let mut out = vec![4, sig_type, pk, hash];
    out.extend_from_slice(&(hashed.len() as u16).to_be_bytes());
    out.extend_from_slice(&hashed);
    out.extend_from_slice(&(unhashed.len() as u16).to_be_bytes());
    out.extend_from_slice(&unhashed);
    out.extend_from_slice(&[0xAB, 0xCD]);
    match pk {
        19 | 22 => {
            out.extend(mpi(&[0x11; 32]));
            out.extend(mpi(&[0x22; 32]));
        }
        _ => out.extend(mpi(&[0x5A; 128])),
    }
    out
}

/// Minimal valid binary signature: RSA/SHA-256, creation time and issuer key ID in the hashed area.
pub(crate) fn simple_signature_body() -> Vec<u8> {
    v4_signature_body(
        0x00,
        1,
        8,
        &[creation_time(1_700_000_000), issuer_key_id([1, 2, 3, 4, 5, 6, 7, 8])],
        &[],
    )
}

pub(crate) fn literal_body(format: u8, name: &[u8], date: u32, data: &[u8]) -> Vec<u8> {
    let mut out = vec![format, name.len() as u8];
    out.extend_from_slice(name);
    out.extend_from_slice(&date.to_be_bytes());
    out.extend_from_slice(data);
    out
}

pub(crate) fn one_pass_body(sig_type: u8, hash: u8, pk: u8, key_id: [u8; 8], last: bool) -> Vec<u8> {
    let mut out = vec![3, sig_type, hash, pk];
    out.extend_from_slice(&key_id);
    out.push(last as u8);
    out
}
