// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Key validity levels.

/// How much confidence the caller's trust model places in a key's ownership claim.
///
/// Ordered: `Unknown < Undefined < Never < Marginal < Full < Ultimate`, so
/// `validity >= Validity::Full` reads the way the summary rules are stated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Validity {
    #[default]
    Unknown = 0,
    Undefined = 1,
    Never = 2,
    Marginal = 3,
    Full = 4,
    Ultimate = 5,
}

impl Validity {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Unknown),
            1 => Some(Self::Undefined),
            2 => Some(Self::Never),
            3 => Some(Self::Marginal),
            4 => Some(Self::Full),
            5 => Some(Self::Ultimate),
            _ => None,
        }
    }

    /// `Full` or `Ultimate`.
    pub fn is_fully_trusted(self) -> bool {
        self >= Validity::Full
    }
}
