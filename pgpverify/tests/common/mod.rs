// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builders for end-to-end verify tests: real keys, packet framing and message layouts.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use pgpverify::{
    Context, EccCurve, Fingerprint, HashAlgorithm, IssuerRef, KeyLookup, KeyLookupError, Keyring, ResolvedKey, Validity,
    VerifyOptions,
};
use rand_core::OsRng;
use rsa::pkcs1v15::Pkcs1v15Sign;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use signature::hazmat::PrehashSigner;
use signature::Signer as _;

pub(crate) const CREATED: u32 = 1_700_000_000;
pub(crate) const NOW: u64 = CREATED as u64 + 3600;

pub(crate) enum TestSigner {
    Rsa(RsaPrivateKey),
    P256(p256::ecdsa::SigningKey),
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

pub(crate) fn ed25519_signer() -> &'static TestSigner {
    static KEY: OnceLock<TestSigner> = OnceLock::new();
    KEY.get_or_init(|| TestSigner::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng)))
}

impl TestSigner {
    pub(crate) fn algorithm_id(&self) -> u8 {
        match self {
            TestSigner::Rsa(_) => 1,
            TestSigner::P256(_) => 19,
            TestSigner::Ed25519(_) => 22,
        }
    }

    /// v4 public key packet body.
    pub(crate) fn key_body(&self) -> Vec<u8> {
        let mut body = vec![4];
        body.extend_from_slice(&1_600_000_000u32.to_be_bytes());
        body.push(self.algorithm_id());
        match self {
            TestSigner::Rsa(k) => {
                body.extend(mpi(&k.n().to_bytes_be()));
                body.extend(mpi(&k.e().to_bytes_be()));
            }
            TestSigner::P256(k) => {
                let oid = EccCurve::NistP256.oid();
                body.push(oid.len() as u8);
                body.extend_from_slice(oid);
                body.extend(mpi(k.verifying_key().to_encoded_point(false).as_bytes()));
            }
            TestSigner::Ed25519(k) => {
                let oid = EccCurve::Ed25519.oid();
                body.push(oid.len() as u8);
                body.extend_from_slice(oid);
                let mut point = vec![0x40];
                point.extend_from_slice(&k.verifying_key().to_bytes());
                body.extend(mpi(&point));
            }
        }
        body
    }

    /// v4 fingerprint, computed here rather than by the crate under test.
    pub(crate) fn fingerprint(&self) -> Fingerprint {
        let body = self.key_body();
        let mut h = Sha1::new();
        h.update([0x99]);
        h.update((body.len() as u16).to_be_bytes());
        h.update(&body);
        Fingerprint::new(h.finalize().to_vec())
    }

    /// Transferable public key: key packet plus a user ID.
    pub(crate) fn key_block(&self) -> Vec<u8> {
        let mut out = packet(6, &self.key_body());
        out.extend(packet(13, b"Test Signer <test@example.org>"));
        out
    }

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
            TestSigner::Ed25519(k) => {
                let bytes = k.sign(digest).to_bytes();
                [mpi(&bytes[..32]), mpi(&bytes[32..])].concat()
            }
        }
    }
}

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

/// New-format packet with a definite length.
pub(crate) fn packet(tag: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![0xC0 | tag];
    let len = body.len();
    if len < 192 {
        out.push(len as u8);
    } else if len < 8384 {
        let v = len - 192;
        out.push(((v >> 8) + 192) as u8);
        out.push((v & 0xFF) as u8);
    } else {
        out.push(0xFF);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    }
    out.extend_from_slice(body);
    out
}

fn subpacket(typ: u8, data: &[u8]) -> Vec<u8> {
    let mut out = vec![(data.len() + 1) as u8, typ];
    out.extend_from_slice(data);
    out
}

fn digest(hash: HashAlgorithm, parts: &[&[u8]]) -> Vec<u8> {
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

pub(crate) fn crlf(text: &[u8]) -> Vec<u8> {
    String::from_utf8_lossy(text)
        .replace("\r\n", "\n")
        .replace('\n', "\r\n")
        .into_bytes()
}

#[derive(Clone)]
pub(crate) struct SigParams {
    pub sig_type: u8,
    pub hash: HashAlgorithm,
    pub created: u32,
    pub expires_in: Option<u32>,
    pub version: u8,
}

impl Default for SigParams {
    fn default() -> Self {
        Self {
            sig_type: 0x00,
            hash: HashAlgorithm::Sha256,
            created: CREATED,
            expires_in: None,
            version: 4,
        }
    }
}

impl SigParams {
    pub(crate) fn text() -> Self {
        Self {
            sig_type: 0x01,
            ..Default::default()
        }
    }
}

/// Signature packet body over `data`, issuer given as a hashed fingerprint subpacket.
pub(crate) fn sign(signer: &TestSigner, params: &SigParams, data: &[u8]) -> Vec<u8> {
    let fpr = signer.fingerprint();
    let mut hashed = subpacket(2, &params.created.to_be_bytes());
    if let Some(secs) = params.expires_in {
        hashed.extend(subpacket(3, &secs.to_be_bytes()));
    }
    let mut issuer = vec![4];
    issuer.extend_from_slice(fpr.as_bytes());
    hashed.extend(subpacket(33, &issuer));

    let mut header = vec![params.version, params.sig_type, signer.algorithm_id(), params.hash.id()];
    header.extend_from_slice(&(hashed.len() as u16).to_be_bytes());
    header.extend_from_slice(&hashed);

    let document = if params.sig_type == 0x01 { crlf(data) } else { data.to_vec() };
    let mut trailer = vec![4, 0xFF];
    trailer.extend_from_slice(&(header.len() as u32).to_be_bytes());
    let d = digest(params.hash, &[&document, &header, &trailer]);

    let mut body = header;
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&d[..2]);
    body.extend(signer.sign_digest(params.hash, &d));
    body
}

/// Detached signature stream: one signature packet per body.
pub(crate) fn detached(bodies: &[Vec<u8>]) -> Vec<u8> {
    bodies.iter().flat_map(|b| packet(2, b)).collect()
}

pub(crate) fn one_pass_body(signer: &TestSigner, params: &SigParams, last: bool) -> Vec<u8> {
    let mut body = vec![3, params.sig_type, params.hash.id(), signer.algorithm_id()];
    body.extend_from_slice(signer.fingerprint().key_id().unwrap().as_bytes());
    body.push(u8::from(last));
    body
}

pub(crate) fn literal_body(file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = vec![b'b', file_name.len() as u8];
    body.extend_from_slice(file_name.as_bytes());
    body.extend_from_slice(&CREATED.to_be_bytes());
    body.extend_from_slice(data);
    body
}

/// `OnePass* Literal Signature*` with the signatures in reverse one-pass order.
pub(crate) fn one_pass_message(signers: &[&TestSigner], params: &SigParams, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, s) in signers.iter().enumerate() {
        out.extend(packet(4, &one_pass_body(s, params, i + 1 == signers.len())));
    }
    out.extend(packet(11, &literal_body(file_name, data)));
    for s in signers.iter().rev() {
        out.extend(packet(2, &sign(s, params, data)));
    }
    out
}

pub(crate) fn keyring(signers: &[&TestSigner], validity: Validity) -> Keyring {
    let mut keys = Keyring::new();
    for s in signers {
        keys.import(&s.key_block()).unwrap();
        assert!(keys.set_validity(&s.fingerprint(), validity));
    }
    keys
}

pub(crate) fn options() -> VerifyOptions {
    VerifyOptions::default().with_verification_time(NOW)
}

pub(crate) fn context(signers: &[&TestSigner], validity: Validity) -> Context<Keyring> {
    Context::with_options(keyring(signers, validity), options())
}

/// Key lookup that counts resolve calls and delegates to a keyring.
pub(crate) struct CountingLookup {
    inner: Keyring,
    calls: AtomicUsize,
}

impl CountingLookup {
    pub(crate) fn new(inner: Keyring) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyLookup for CountingLookup {
    fn resolve(&self, issuer: &IssuerRef) -> Result<Option<ResolvedKey>, KeyLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(issuer)
    }
}

/// Lookup that always fails.
pub(crate) struct OfflineLookup;

impl KeyLookup for OfflineLookup {
    fn resolve(&self, _issuer: &IssuerRef) -> Result<Option<ResolvedKey>, KeyLookupError> {
        Err(KeyLookupError::Unavailable("keyserver unreachable".into()))
    }
}
