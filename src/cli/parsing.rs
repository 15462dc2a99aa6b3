//! Value parsers for clap arguments.

/// Parse a `--jobs` value, accepting `1..=MAX_JOBS`.
pub(super) fn parse_jobs(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("{s} is not a valid number"))?;
    if (1..=super::MAX_JOBS).contains(&value) {
        Ok(value)
    } else {
        Err(format!("jobs must be between 1 and {}", super::MAX_JOBS))
    }
}
