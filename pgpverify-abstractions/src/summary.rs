// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signature summary flags.

bitflags::bitflags! {
    /// Summary of a signature's status.
    ///
    /// Bits are independent; several may be set at once. The numeric values match the
    /// public C interface this crate's result shape is modeled on.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
    pub struct SigSummary: u32 {
        /// The signature is fully valid.
        const VALID = 0x0001;
        /// The signature is good.
        const GREEN = 0x0002;
        /// The signature is bad.
        const RED = 0x0004;
        /// The key has been revoked.
        const KEY_REVOKED = 0x0010;
        /// The key has expired.
        const KEY_EXPIRED = 0x0020;
        /// The signature has expired.
        const SIG_EXPIRED = 0x0040;
        /// Can't verify: key missing.
        const KEY_MISSING = 0x0080;
        /// CRL not available.
        const CRL_MISSING = 0x0100;
        /// Available CRL is too old.
        const CRL_TOO_OLD = 0x0200;
        /// A policy was not met.
        const BAD_POLICY = 0x0400;
        /// A system error occurred.
        const SYS_ERROR = 0x0800;
        /// TOFU conflict detected.
        const TOFU_CONFLICT = 0x1000;
    }
}

impl SigSummary {
    /// Flags that rule out `GREEN` and `VALID`.
    pub const NEGATIVE: SigSummary = SigSummary::RED
        .union(SigSummary::KEY_REVOKED)
        .union(SigSummary::KEY_EXPIRED)
        .union(SigSummary::SIG_EXPIRED)
        .union(SigSummary::KEY_MISSING)
        .union(SigSummary::CRL_MISSING)
        .union(SigSummary::CRL_TOO_OLD)
        .union(SigSummary::BAD_POLICY)
        .union(SigSummary::SYS_ERROR)
        .union(SigSummary::TOFU_CONFLICT);
}
