// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! OpenPGP packet parsing.
//!
//! This crate turns raw (or ASCII-armored) OpenPGP data into typed packets:
//! - `packet`: header framing (old and new format, partial body lengths)
//! - `signature`: full signature packets (v3/v4) and their subpackets
//! - `one_pass`, `literal`, `compressed`, `public_key`: the other packets a signed
//!   message or key block is made of
//! - `armor`, `cleartext`: the text encodings wrapped around binary packets
//! - `message`: splits a detached signature stream or an inline signed message into the
//!   pieces the verifier needs
//!
//! Nothing here performs cryptography beyond computing v4 key fingerprints.

pub mod armor;
pub mod cleartext;
pub mod compressed;
pub mod error;
pub mod literal;
pub mod message;
pub mod one_pass;
pub mod packet;
pub mod public_key;
pub mod reader;
pub mod signature;

pub use armor::{crc24, dearmor, enarmor, is_armored, ArmorKind, Armored};
pub use cleartext::{is_cleartext_signed, parse_cleartext, Cleartext};
pub use compressed::{decompress, CompressionAlgorithm};
pub use error::{DecodeError, ParseError, SignatureDecodeError};
pub use literal::{decode_literal, LiteralData};
pub use message::{extract_signed_message, split_detached_signatures, SignedMessage};
pub use one_pass::{decode_one_pass, OnePassSignature};
pub use packet::{parse_packets, HeaderFormat, Packet, PacketParser, Tag};
pub use public_key::{decode_public_key, parse_key_block, PublicKeyPacket};
pub use reader::{EofError, Reader};
pub use signature::{decode_signature, PartialSignature, SignaturePacket, SignatureType, Subpacket, SubpacketType};
