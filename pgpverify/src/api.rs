// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use semver::Version;

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Return the crate version if it is at least `required`.
///
/// `None` as the requirement always succeeds. An unparsable requirement fails.
pub fn check_version(required: Option<&str>) -> Option<&'static str> {
    let Some(required) = required else {
        return Some(VERSION);
    };
    let required = match Version::parse(required.trim()) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(required, error = %e, "unparsable version requirement");
            return None;
        }
    };
    let current = Version::parse(VERSION).ok()?;
    (current >= required).then_some(VERSION)
}
