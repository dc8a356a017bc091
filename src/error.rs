//! Unified error types for the shell core.
//!
//! This module uses anyhow for flexible error handling. Command handlers
//! return ShellResult<()>; an Err is reported on the shell's styled error
//! channel rather than aborting the input loop.
//!
//! ## Usage Examples
//!
//! Creating errors:
//! ```ignore
//! anyhow::bail!("room {} is full", name);
//! ```
//!
//! Adding context:
//! ```ignore
//! value.parse::<u32>().context("max players must be a number")?;
//! ```

/// Result type alias using anyhow::Error.
///
/// This provides flexible error handling with context and error chaining.
pub type ShellResult<T> = anyhow::Result<T>;
