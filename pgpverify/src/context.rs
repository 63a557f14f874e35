// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::io::{Read, Write};

use pgpverify_abstractions::{KeyLookup, VerifyReport};
use pgpverify_packets::{
    dearmor, extract_signed_message, is_armored, is_cleartext_signed, parse_cleartext, split_detached_signatures,
};
use pgpverify_validation::VerifyOptions;

use crate::assembler::assemble_report;
use crate::{Data, VerifyError};

/// A verification context: options plus the key lookup used to resolve signers.
///
/// A context holds no per-call state, so one context may serve many verify calls, including
/// concurrent ones when `K` is `Sync`.
#[derive(Debug, Clone)]
pub struct Context<K> {
    keys: K,
    options: VerifyOptions,
}

impl<K: KeyLookup> Context<K> {
    pub fn new(keys: K) -> Self {
        Self::with_options(keys, VerifyOptions::default())
    }

    pub fn with_options(keys: K, options: VerifyOptions) -> Self {
        Self { keys, options }
    }

    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: VerifyOptions) {
        self.options = options;
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut K {
        &mut self.keys
    }

    pub fn into_keys(self) -> K {
        self.keys
    }

    /// Buffer `reader` into a `Data`, bounded by `max_input_len`.
    pub fn read_data(&self, reader: impl Read) -> Result<Data<'static>, VerifyError> {
        Data::from_reader(reader, self.options.max_input_len)
    }

    /// Verify the signatures in `sig`.
    ///
    /// - With `signed_text`, `sig` is a detached signature over it.
    /// - Without it, `sig` is an inline signed message or a cleartext signed message, and the
    ///   recovered content is written to `plaintext` when one is given.
    ///
    /// `Ok` means the input was well formed. Each outcome in the report still has to be checked.
    pub fn verify(
        &self,
        sig: &Data<'_>,
        signed_text: Option<&Data<'_>>,
        plaintext: Option<&mut dyn Write>,
    ) -> Result<VerifyReport, VerifyError> {
        let at = self.options.effective_time();
        let input = sig.as_bytes();

        if let Some(signed_text) = signed_text {
            if is_cleartext_signed(input) {
                return Err(VerifyError::InvalidValue(
                    "a cleartext signed message cannot be checked against separate signed text".into(),
                ));
            }
            let signatures = split_detached_signatures(&unarmor(input)?)?;
            tracing::debug!(count = signatures.len(), "verifying detached signatures");
            return Ok(assemble_report(
                &signatures,
                signed_text.as_bytes(),
                &self.keys,
                &self.options,
                at,
                None,
                &|_| true,
            ));
        }

        if is_cleartext_signed(input) {
            let cleartext = parse_cleartext(input)?;
            let signatures = split_detached_signatures(&cleartext.signature)?;
            if let Some(out) = plaintext {
                out.write_all(&cleartext.plaintext)?;
            }
            tracing::debug!(count = signatures.len(), "verifying cleartext signatures");
            return Ok(assemble_report(
                &signatures,
                &cleartext.signed_text,
                &self.keys,
                &self.options,
                at,
                None,
                &|hash| cleartext.declares_hash(hash),
            ));
        }

        let message = extract_signed_message(&unarmor(input)?, self.options.max_decompressed_len)?;
        if let Some(out) = plaintext {
            out.write_all(&message.literal.body)?;
        }
        tracing::debug!(count = message.signatures.len(), "verifying inline signatures");
        Ok(assemble_report(
            &message.signatures,
            &message.literal.body,
            &self.keys,
            &self.options,
            at,
            message.literal.file_name_lossy(),
            &|_| true,
        ))
    }
}

fn unarmor(input: &[u8]) -> Result<Cow<'_, [u8]>, VerifyError> {
    if is_armored(input) {
        Ok(Cow::Owned(dearmor(input)?.data))
    } else {
        Ok(Cow::Borrowed(input))
    }
}
