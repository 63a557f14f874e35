// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory key store.
//!
//! The keyring does not evaluate self-signatures or certifications. Validity, revocation and
//! expiration are whatever the caller sets. A subkey takes its validity from its primary key and
//! is treated as revoked or expired when either it or its primary is.

use pgpverify_abstractions::{Fingerprint, IssuerRef, KeyLookup, KeyLookupError, ResolvedKey, Validity};
use pgpverify_packets::{dearmor, is_armored, parse_key_block, ArmorKind, PublicKeyPacket};

use crate::VerifyError;

#[derive(Debug, Clone)]
struct Entry {
    key: PublicKeyPacket,
    validity: Validity,
    revoked: bool,
    expiration_time: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Keyring {
    entries: Vec<Entry>,
}

impl Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a binary or ASCII-armored public key block.
    ///
    /// Returns the fingerprints of newly added keys, primaries and subkeys alike. Keys already
    /// present are left untouched, including their settings.
    pub fn import(&mut self, input: &[u8]) -> Result<Vec<Fingerprint>, VerifyError> {
        let keys = if is_armored(input) {
            let armored = dearmor(input)?;
            if armored.kind != ArmorKind::PublicKeyBlock {
                return Err(VerifyError::InvalidValue(format!(
                    "expected a public key block, found {}",
                    armored.kind.label()
                )));
            }
            parse_key_block(&armored.data)?
        } else {
            parse_key_block(input)?
        };

        let mut added = Vec::new();
        for key in keys {
            if self.find(&key.fingerprint).is_some() {
                tracing::debug!(fingerprint = %key.fingerprint, "key already present");
                continue;
            }
            added.push(key.fingerprint.clone());
            self.entries.push(Entry {
                key,
                validity: Validity::Unknown,
                revoked: false,
                expiration_time: None,
            });
        }
        tracing::debug!(added = added.len(), total = self.entries.len(), "imported keys");
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.find(fingerprint).is_some()
    }

    /// Set the owner-trust derived validity of a key. Returns `false` if the key is unknown.
    pub fn set_validity(&mut self, fingerprint: &Fingerprint, validity: Validity) -> bool {
        self.update(fingerprint, |e| e.validity = validity)
    }

    pub fn set_revoked(&mut self, fingerprint: &Fingerprint, revoked: bool) -> bool {
        self.update(fingerprint, |e| e.revoked = revoked)
    }

    /// Absolute expiration time in seconds since the epoch, or `None` for no expiry.
    pub fn set_expiration_time(&mut self, fingerprint: &Fingerprint, expiration_time: Option<u64>) -> bool {
        self.update(fingerprint, |e| e.expiration_time = expiration_time)
    }

    fn find(&self, fingerprint: &Fingerprint) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.key.fingerprint == fingerprint)
    }

    fn update(&mut self, fingerprint: &Fingerprint, f: impl FnOnce(&mut Entry)) -> bool {
        match self.entries.iter_mut().find(|e| &e.key.fingerprint == fingerprint) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }

    fn to_resolved(&self, entry: &Entry) -> ResolvedKey {
        let primary = entry
            .key
            .primary_fingerprint
            .as_ref()
            .and_then(|fpr| self.find(fpr));

        let (validity, revoked, expiration_time) = match primary {
            Some(p) => (
                p.validity,
                entry.revoked || p.revoked,
                earliest(entry.expiration_time, p.expiration_time),
            ),
            None => (entry.validity, entry.revoked, entry.expiration_time),
        };

        let mut key = ResolvedKey::new(entry.key.fingerprint.clone(), entry.key.material.clone())
            .with_validity(validity)
            .with_revoked(revoked)
            .with_expiration_time(expiration_time);
        key.creation_time = u64::from(entry.key.creation_time);
        key
    }
}

fn earliest(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

impl KeyLookup for Keyring {
    fn resolve(&self, issuer: &IssuerRef) -> Result<Option<ResolvedKey>, KeyLookupError> {
        Ok(self
            .entries
            .iter()
            .find(|e| issuer.matches(&e.key.fingerprint))
            .map(|e| self.to_resolved(e)))
    }
}
