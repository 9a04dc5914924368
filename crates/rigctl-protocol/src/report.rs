//! Status report lines
//!
//! The daemon terminates command replies and extended replies with a line of
//! the form `RPRT <code>`. Zero (or positive) is success, negative codes map to
//! a [`RigError`].

use crate::error::{ParseError, ProtocolError, RigError};

/// Prefix that marks a status report line
pub const REPORT_PREFIX: &str = "RPRT";

/// Whether a reply line is a status report
///
/// Extended replies end on any line beginning with `RPRT`.
pub fn is_report(line: &str) -> bool {
    line.starts_with(REPORT_PREFIX)
}

/// Whether a single-value reply is a status report instead of a payload
pub fn is_report_reply(line: &str) -> bool {
    line.strip_prefix(REPORT_PREFIX)
        .is_some_and(|rest| rest.starts_with(' '))
}

/// Parse the status code out of an `RPRT <code>` line
pub fn parse_status(line: &str) -> Result<i64, ParseError> {
    let malformed = || ParseError::MalformedReport(line.to_string());
    let rest = line.strip_prefix(REPORT_PREFIX).ok_or_else(malformed)?;
    if !rest.starts_with(char::is_whitespace) {
        return Err(malformed());
    }
    rest.trim().parse::<i64>().map_err(|_| malformed())
}

/// Parse an `RPRT <code>` line into success or the mapped error
pub fn parse_report(line: &str) -> Result<(), ProtocolError> {
    let status = parse_status(line)?;
    match RigError::from_status(status) {
        Some(err) => {
            tracing::debug!("Daemon reported status {}: {}", status, err);
            Err(err.into())
        }
        None => Ok(()),
    }
}

/// Encode a status report line (without terminator)
pub fn encode_report(status: i64) -> String {
    format!("{} {}", REPORT_PREFIX, status)
}
