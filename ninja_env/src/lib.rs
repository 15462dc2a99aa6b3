#![forbid(unsafe_code)]

//! Shared environment constants used across kiln crates (library, tests, and
//! helpers).

/// Environment variable override for the Ninja executable.
///
/// # Examples
///
/// ```
/// use ninja_env::NINJA_ENV;
/// assert_eq!(NINJA_ENV, "KILN_NINJA");
/// ```
pub const NINJA_ENV: &str = "KILN_NINJA";

/// Default Ninja executable when [`NINJA_ENV`] is unset.
pub const NINJA_PROGRAM: &str = "ninja";
