//! Reply classification for the three request shapes
//!
//! These are sans-IO: the connection feeds lines in as they arrive and asks
//! whether the reply is complete.

use crate::error::ProtocolError;
use crate::report::{is_report, is_report_reply, parse_report};

/// Decode the reply to a fire-and-forget command
///
/// `None` means the stream ended before a line arrived.
pub fn command_reply(line: Option<&str>) -> Result<(), ProtocolError> {
    match line {
        Some(line) => parse_report(line),
        None => Err(ProtocolError::MissingReport),
    }
}

/// Decode the reply to a single-value query
///
/// Returns the payload line verbatim, or the mapped error when the daemon
/// answered with a status report. An `RPRT 0` answer yields an empty payload.
pub fn value_reply(line: Option<&str>) -> Result<String, ProtocolError> {
    match line {
        Some(line) if is_report_reply(line) => parse_report(line).map(|()| String::new()),
        Some(line) => Ok(line.to_string()),
        None => Err(ProtocolError::MissingReport),
    }
}

/// Accumulates the lines of an extended reply
#[derive(Debug, Default)]
pub struct ExtendedReply {
    lines: Vec<String>,
    report: Option<String>,
}

impl ExtendedReply {
    /// Create an empty reply
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next reply line
    ///
    /// Returns `true` once the terminating report line has been seen; later
    /// lines are ignored.
    pub fn push_line(&mut self, line: String) -> bool {
        if self.report.is_some() {
            return true;
        }
        if is_report(&line) {
            self.report = Some(line);
            true
        } else {
            self.lines.push(line);
            false
        }
    }

    /// Whether the terminating report line has been seen
    pub fn is_complete(&self) -> bool {
        self.report.is_some()
    }

    /// Payload lines received so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Finish the reply, returning the payload lines and the decoded status
    ///
    /// A reply that never saw a report line yields
    /// [`ProtocolError::MissingReport`].
    pub fn finish(self) -> (Vec<String>, Result<(), ProtocolError>) {
        let status = match &self.report {
            Some(line) => parse_report(line),
            None => Err(ProtocolError::MissingReport),
        };
        (self.lines, status)
    }

    /// Frame a complete sequence of reply lines
    pub fn from_lines<I>(lines: I) -> (Vec<String>, Result<(), ProtocolError>)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut reply = ExtendedReply::new();
        for line in lines {
            if reply.push_line(line.into()) {
                break;
            }
        }
        reply.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, RigError};

    #[test]
    fn test_extended_success() {
        let (lines, status) = ExtendedReply::from_lines(["a: 1", "b: 2", "RPRT 0"]);
        assert_eq!(lines, vec!["a: 1", "b: 2"]);
        assert_eq!(status, Ok(()));
    }

    #[test]
    fn test_extended_error() {
        let (lines, status) = ExtendedReply::from_lines(["a: 1", "RPRT -4"]);
        assert_eq!(lines, vec!["a: 1"]);
        assert_eq!(status, Err(ProtocolError::Rig(RigError::NotImplemented)));
    }

    #[test]
    fn test_extended_missing_report() {
        let (lines, status) = ExtendedReply::from_lines(["a: 1", "b: 2"]);
        assert_eq!(lines.len(), 2);
        assert_eq!(status, Err(ProtocolError::MissingReport));
    }

    #[test]
    fn test_extended_stops_at_report() {
        let mut reply = ExtendedReply::new();
        assert!(!reply.push_line("a: 1".into()));
        assert!(reply.push_line("RPRT 0".into()));
        assert!(reply.is_complete());
        assert!(reply.push_line("trailing".into()));
        assert_eq!(reply.lines(), ["a: 1"]);
    }

    #[test]
    fn test_extended_malformed_report() {
        let (_, status) = ExtendedReply::from_lines(["RPRTX"]);
        assert_eq!(
            status,
            Err(ProtocolError::Parse(ParseError::MalformedReport(
                "RPRTX".into()
            )))
        );
    }

    #[test]
    fn test_value_reply() {
        assert_eq!(value_reply(Some("14074000")), Ok("14074000".into()));
        assert_eq!(
            value_reply(Some("RPRT -6")),
            Err(ProtocolError::Rig(RigError::Io))
        );
        assert_eq!(value_reply(Some("RPRT 0")), Ok(String::new()));
        assert_eq!(value_reply(None), Err(ProtocolError::MissingReport));
    }

    #[test]
    fn test_command_reply() {
        assert_eq!(command_reply(Some("RPRT 0")), Ok(()));
        assert_eq!(
            command_reply(Some("RPRT -9")),
            Err(ProtocolError::Rig(RigError::Rejected))
        );
        assert!(matches!(
            command_reply(Some("14074000")),
            Err(ProtocolError::Parse(ParseError::MalformedReport(_)))
        ));
        assert_eq!(command_reply(None), Err(ProtocolError::MissingReport));
    }
}
