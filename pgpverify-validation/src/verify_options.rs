// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::{SystemTime, UNIX_EPOCH};

use pgpverify_abstractions::HashAlgorithm;

/// Default limit for `Data::from_reader`.
pub const DEFAULT_MAX_INPUT_LEN: usize = 64 * 1024 * 1024;

/// Default limit on the inflated size of one compressed packet.
pub const DEFAULT_MAX_DECOMPRESSED_LEN: usize = 256 * 1024 * 1024;

/// Knobs for one verification context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Reference time for expiry checks, seconds since the epoch.
    ///
    /// `None` uses the system clock at the start of each verify call.
    pub verification_time: Option<u64>,

    /// Maximum number of bytes `Data::from_reader` will buffer.
    pub max_input_len: usize,

    /// Maximum inflated size of a compressed data packet.
    pub max_decompressed_len: usize,

    /// Hash algorithms refused by local policy.
    ///
    /// Signatures using one of these are reported with `BAD_POLICY` and are not checked.
    pub rejected_hash_algorithms: Vec<HashAlgorithm>,
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verification_time(mut self, secs_since_epoch: u64) -> Self {
        self.verification_time = Some(secs_since_epoch);
        self
    }

    pub fn with_max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = len;
        self
    }

    pub fn with_max_decompressed_len(mut self, len: usize) -> Self {
        self.max_decompressed_len = len;
        self
    }

    pub fn with_rejected_hash_algorithm(mut self, alg: HashAlgorithm) -> Self {
        if !self.rejected_hash_algorithms.contains(&alg) {
            self.rejected_hash_algorithms.push(alg);
        }
        self
    }

    pub fn is_hash_rejected(&self, alg: HashAlgorithm) -> bool {
        self.rejected_hash_algorithms.contains(&alg)
    }

    /// The time expiry checks are made against.
    pub fn effective_time(&self) -> u64 {
        self.verification_time.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        })
    }
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            verification_time: None,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            max_decompressed_len: DEFAULT_MAX_DECOMPRESSED_LEN,
            rejected_hash_algorithms: Vec::new(),
        }
    }
}
