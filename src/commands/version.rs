//! Command: print version information.
use std::io::Write;

use anyhow::Result;

/// Version string baked in at build time, falling back to the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DESKUTIL_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the deskutil version to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "deskutil {}", version())?;
    Ok(())
}
