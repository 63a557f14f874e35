// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared helpers for `pgpverify-validation` integration tests.
//!
//! Keys are generated once per test binary. Signatures are assembled byte by byte and
//! hashed here independently of the crate's own pre-image code.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use pgpverify_abstractions::{
    EccCurve, Fingerprint, HashAlgorithm, IssuerRef, KeyLookup, KeyLookupError, PublicKeyMaterial, ResolvedKey,
    Validity,
};
use pgpverify_packets::{decode_public_key, decode_signature, SignaturePacket};
use rand_core::OsRng;
use rsa::pkcs1v15::Pkcs1v15Sign;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use signature::hazmat::PrehashSigner;
use signature::Signer as _;

pub(crate) const CREATED: u32 = 1_700_000_000;

pub(crate) enum TestSigner {
    Rsa(RsaPrivateKey),
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    P521(p521::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

pub(crate) fn rsa_signer() -> &'static TestSigner {
    static KEY: OnceLock<TestSigner> = OnceLock::new();
    KEY.get_or_init(|| TestSigner::Rsa(RsaPrivateKey::new(&mut OsRng, 1024).unwrap()))
}

pub(crate) fn p256_signer() -> &'static TestSigner {
    static KEY: OnceLock<TestSigner> = OnceLock::new();
    KEY.get_or_init(|| TestSigner::P256(p256::ecdsa::SigningKey::random(&mut OsRng)))
}

pub(crate) fn p384_signer() -> &'static TestSigner {
    static KEY: OnceLock<TestSigner> = OnceLock::new();
    KEY.get_or_init(|| TestSigner::P384(p384::ecdsa::SigningKey::random(&mut OsRng)))
}

pub(crate) fn p521_signer() -> &'static TestSigner {
    static KEY: OnceLock<TestSigner> = OnceLock::new();
    KEY.get_or_init(|| TestSigner::P521(p521::ecdsa::SigningKey::random(&mut OsRng)))
}

pub(crate) fn ed25519_signer() -> &'static TestSigner {
    static KEY: OnceLock<TestSigner> = OnceLock::new();
    KEY.get_or_init(|| TestSigner::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng)))
}

impl TestSigner {
    pub(crate) fn algorithm_id(&self) -> u8 {
        match self {
            TestSigner::Rsa(_) => 1,
            TestSigner::P256(_) | TestSigner::P384(_) | TestSigner::P521(_) => 19,
            TestSigner::Ed25519(_) => 22,
        }
    }

    pub(crate) fn material(&self) -> PublicKeyMaterial {
        match self {
            TestSigner::Rsa(k) => PublicKeyMaterial::Rsa {
                n: k.n().to_bytes_be(),
                e: k.e().to_bytes_be(),
            },
            TestSigner::P256(k) => PublicKeyMaterial::Ecdsa {
                curve: EccCurve::NistP256,
                point: k.verifying_key().to_encoded_point(false).as_bytes().to_vec(),
            },
            TestSigner::P384(k) => PublicKeyMaterial::Ecdsa {
                curve: EccCurve::NistP384,
                point: k.verifying_key().to_encoded_point(false).as_bytes().to_vec(),
            },
            TestSigner::P521(k) => PublicKeyMaterial::Ecdsa {
                curve: EccCurve::NistP521,
                point: p521::ecdsa::VerifyingKey::from(k)
                    .to_encoded_point(false).as_bytes().to_vec(),
            },
            TestSigner::Ed25519(k) => {
                let mut point = vec![0x40];
                point.extend_from_slice(&k.verifying_key().to_bytes());
                PublicKeyMaterial::EdDsaLegacy {
                    curve: EccCurve::Ed25519,
                    point,
                }
            }
        }
    }

    /// v4 public key packet body.
    pub(crate) fn key_body(&self) -> Vec<u8> {
        let mut body = vec![4];
        body.extend_from_slice(&1_600_000_000u32.to_be_bytes());
        body.push(self.algorithm_id());
        match self.material() {
            PublicKeyMaterial::Rsa { n, e } => {
                body.extend(mpi(&n));
                body.extend(mpi(&e));
            }
            PublicKeyMaterial::Ecdsa { curve, point } | PublicKeyMaterial::EdDsaLegacy { curve, point } => {
                body.push(curve.oid().len() as u8);
                body.extend_from_slice(curve.oid());
                body.extend(mpi(&point));
            }
            _ => unreachable!(),
        }
        body
    }

    pub(crate) fn fingerprint(&self) -> Fingerprint {
        decode_public_key(&self.key_body(), false).unwrap().fingerprint
    }

    pub(crate) fn resolved(&self, validity: Validity) -> ResolvedKey {
        ResolvedKey::new(self.fingerprint(), self.material()).with_validity(validity)
    }

    /// Signature value MPIs over `digest`.
    pub(crate) fn sign_digest(&self, hash: HashAlgorithm, digest: &[u8]) -> Vec<u8> {
        match self {
            TestSigner::Rsa(k) => {
                let scheme = match hash {
                    HashAlgorithm::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
                    HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
                    HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
                    other => panic!("test signer does not support {other:?}"),
                };
                mpi(&k.sign(scheme, digest).unwrap())
            }
            TestSigner::P256(k) => {
                let sig: p256::ecdsa::Signature = k.sign_prehash(digest).unwrap();
                let bytes = sig.to_bytes();
                [mpi(&bytes[..32]), mpi(&bytes[32..])].concat()
            }
            TestSigner::P384(k) => {
                let sig: p384::ecdsa::Signature = k.sign_prehash(&widen(digest, 48)).unwrap();
                let bytes = sig.to_bytes();
                [mpi(&bytes[..48]), mpi(&bytes[48..])].concat()
            }
            TestSigner::P521(k) => {
                let sig: p521::ecdsa::Signature = k.sign_prehash(&widen(digest, 66)).unwrap();
                let bytes = sig.to_bytes();
                [mpi(&bytes[..66]), mpi(&bytes[66..])].concat()
            }
            TestSigner::Ed25519(k) => {
                let bytes = k.sign(digest).to_bytes();
                [mpi(&bytes[..32]), mpi(&bytes[32..])].concat()
            }
        }
    }
}

/// `digest` left-padded with zeros to at least `len` bytes, so short hashes reach the signer
/// as the same integer.
fn widen(digest: &[u8], len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len.saturating_sub(digest.len())];
    out.extend_from_slice(digest);
    out
}

/// MPI encoding of an unsigned big-endian integer.
pub(crate) fn mpi(value: &[u8]) -> Vec<u8> {
    let start = value.iter().position(|b| *b != 0).unwrap_or(value.len());
    let value = &value[start..];
    let bits = match value.first() {
        Some(b) => value.len() * 8 - b.leading_zeros() as usize,
        None => 0,
    };
    let mut out = (bits as u16).to_be_bytes().to_vec();
    out.extend_from_slice(value);
    out
}

pub(crate) fn subpacket(typ: u8, data: &[u8]) -> Vec<u8> {
    let mut out = vec![(data.len() + 1) as u8, typ];
    out.extend_from_slice(data);
    out
}

pub(crate) fn digest(hash: HashAlgorithm, parts: &[&[u8]]) -> Vec<u8> {
    fn run<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
        let mut d = D::new();
        for p in parts {
            d.update(p);
        }
        d.finalize().to_vec()
    }
    match hash {
        HashAlgorithm::Sha1 => run::<Sha1>(parts),
        HashAlgorithm::Sha256 => run::<Sha256>(parts),
        HashAlgorithm::Sha512 => run::<Sha512>(parts),
        other => panic!("test digest does not support {other:?}"),
    }
}

/// Line endings rewritten to CRLF, written without looking at the crate's implementation.
pub(crate) fn crlf(text: &[u8]) -> Vec<u8> {
    let s = String::from_utf8_lossy(text).replace("\r\n", "\n").replace('\n', "\r\n");
    s.into_bytes()
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Issuer {
    Fingerprint,
    KeyId,
    None,
}

#[derive(Clone)]
pub(crate) struct SigParams {
    pub sig_type: u8,
    pub hash: HashAlgorithm,
    pub created: u32,
    pub expires_in: Option<u32>,
    pub issuer: Issuer,
}

impl Default for SigParams {
    fn default() -> Self {
        Self {
            sig_type: 0x00,
            hash: HashAlgorithm::Sha256,
            created: CREATED,
            expires_in: None,
            issuer: Issuer::Fingerprint,
        }
    }
}

/// v4 signature packet body over `data`.
pub(crate) fn sign_v4(signer: &TestSigner, params: &SigParams, data: &[u8]) -> Vec<u8> {
    let fpr = signer.fingerprint();
    let mut hashed = subpacket(2, &params.created.to_be_bytes());
    if let Some(secs) = params.expires_in {
        hashed.extend(subpacket(3, &secs.to_be_bytes()));
    }
    if params.issuer == Issuer::Fingerprint {
        let mut data = vec![4];
        data.extend_from_slice(fpr.as_bytes());
        hashed.extend(subpacket(33, &data));
    }
    let unhashed = match params.issuer {
        Issuer::KeyId => subpacket(16, fpr.key_id().unwrap().as_bytes()),
        _ => Vec::new(),
    };

    let mut header = vec![4, params.sig_type, signer.algorithm_id(), params.hash.id()];
    header.extend_from_slice(&(hashed.len() as u16).to_be_bytes());
    header.extend_from_slice(&hashed);

    let document = if params.sig_type == 0x01 { crlf(data) } else { data.to_vec() };
    let mut trailer = vec![4, 0xFF];
    trailer.extend_from_slice(&(header.len() as u32).to_be_bytes());
    let d = digest(params.hash, &[&document, &header, &trailer]);

    let mut body = header;
    body.extend_from_slice(&(unhashed.len() as u16).to_be_bytes());
    body.extend_from_slice(&unhashed);
    body.extend_from_slice(&d[..2]);
    body.extend(signer.sign_digest(params.hash, &d));
    body
}

/// v3 signature packet body over `data`.
pub(crate) fn sign_v3(signer: &TestSigner, sig_type: u8, hash: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    let key_id = *signer.fingerprint().key_id().unwrap().as_bytes();
    let mut hashed = vec![sig_type];
    hashed.extend_from_slice(&CREATED.to_be_bytes());
    let d = digest(hash, &[data, &hashed]);

    let mut body = vec![3, 5];
    body.extend_from_slice(&hashed);
    body.extend_from_slice(&key_id);
    body.push(signer.algorithm_id());
    body.push(hash.id());
    body.extend_from_slice(&d[..2]);
    body.extend(signer.sign_digest(hash, &d));
    body
}

pub(crate) fn decode(body: &[u8]) -> SignaturePacket {
    decode_signature(body).unwrap()
}

/// Key lookup backed by a map, counting every resolve call.
#[derive(Default)]
pub(crate) struct CountingLookup {
    pub keys: HashMap<Fingerprint, ResolvedKey>,
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl CountingLookup {
    pub(crate) fn with(keys: impl IntoIterator<Item = ResolvedKey>) -> Self {
        Self {
            keys: keys.into_iter().map(|k| (k.fingerprint.clone(), k)).collect(),
            ..Default::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyLookup for CountingLookup {
    fn resolve(&self, issuer: &IssuerRef) -> Result<Option<ResolvedKey>, KeyLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(KeyLookupError::Unavailable("offline".into()));
        }
        Ok(self.keys.values().find(|k| issuer.matches(&k.fingerprint)).cloned())
    }
}
