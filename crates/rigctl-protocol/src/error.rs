//! Error types for rigctld protocol parsing and status reports

use thiserror::Error;

/// Errors that can occur while parsing protocol data
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Status line is not of the form `RPRT <int>`
    #[error("malformed report line: {0:?}")]
    MalformedReport(String),

    /// Payload does not decode as its value type: an unknown token, or a
    /// non-integer where a number was expected
    #[error("unsupported {kind} {value:?} reported")]
    Unsupported {
        /// Kind of value that was being decoded (e.g. "mode")
        kind: &'static str,
        /// The offending raw token
        value: String,
    },
}

/// Error conditions reported by the daemon through negative status codes
///
/// The discriminant order matches the daemon's error table: `RPRT -1` is
/// [`RigError::InvalidParameter`], `RPRT -17` is [`RigError::OutOfDomain`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigError {
    #[error("hamlib: invalid parameter")]
    InvalidParameter,
    #[error("hamlib: invalid configuration")]
    InvalidConfiguration,
    #[error("hamlib: memory shortage")]
    MemoryShortage,
    #[error("hamlib: function not implemented")]
    NotImplemented,
    #[error("hamlib: communication timed out")]
    Timeout,
    #[error("hamlib: I/O error")]
    Io,
    #[error("hamlib: internal error")]
    Internal,
    #[error("hamlib: protocol error")]
    Protocol,
    #[error("hamlib: command rejected by rig")]
    Rejected,
    #[error("hamlib: command performed but truncated")]
    Truncated,
    #[error("hamlib: function not available")]
    NotAvailable,
    #[error("hamlib: VFO not targetable")]
    VfoNotTargetable,
    #[error("hamlib: bus error")]
    BusError,
    #[error("hamlib: bus busy")]
    BusBusy,
    #[error("hamlib: invalid pointer")]
    InvalidPointer,
    #[error("hamlib: invalid VFO")]
    InvalidVfo,
    #[error("hamlib: argument out of domain")]
    OutOfDomain,
    /// Status code outside the known table (holds the absolute value)
    #[error("hamlib: unknown error {0}")]
    Unknown(i64),
}

/// Known error conditions, indexed by `|code| - 1`
const STATUS_TABLE: [RigError; 17] = [
    RigError::InvalidParameter,
    RigError::InvalidConfiguration,
    RigError::MemoryShortage,
    RigError::NotImplemented,
    RigError::Timeout,
    RigError::Io,
    RigError::Internal,
    RigError::Protocol,
    RigError::Rejected,
    RigError::Truncated,
    RigError::NotAvailable,
    RigError::VfoNotTargetable,
    RigError::BusError,
    RigError::BusBusy,
    RigError::InvalidPointer,
    RigError::InvalidVfo,
    RigError::OutOfDomain,
];

impl RigError {
    /// Map a daemon status code to an error
    ///
    /// Returns `None` for success (zero or positive codes).
    pub fn from_status(code: i64) -> Option<RigError> {
        if code >= 0 {
            return None;
        }
        let index = code.unsigned_abs();
        let err = usize::try_from(index)
            .ok()
            .and_then(|i| STATUS_TABLE.get(i - 1).copied())
            .unwrap_or(RigError::Unknown(i64::try_from(index).unwrap_or(i64::MAX)));
        Some(err)
    }

    /// The negative status code the daemon uses for this condition
    pub fn status(&self) -> i64 {
        match self {
            RigError::Unknown(code) => code.saturating_neg(),
            known => STATUS_TABLE
                .iter()
                .position(|e| e == known)
                .map(|i| -(i as i64) - 1)
                .unwrap_or(0),
        }
    }
}

/// Higher-level protocol errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error reported by the daemon
    #[error(transparent)]
    Rig(#[from] RigError),

    /// Stream ended before a status report arrived
    #[error("did not receive a report from hamlib")]
    MissingReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_codes() {
        assert_eq!(RigError::from_status(0), None);
        assert_eq!(RigError::from_status(3), None);
    }

    #[test]
    fn test_table_bounds() {
        assert_eq!(RigError::from_status(-1), Some(RigError::InvalidParameter));
        assert_eq!(RigError::from_status(-17), Some(RigError::OutOfDomain));
        assert_eq!(RigError::from_status(-18), Some(RigError::Unknown(18)));
        assert_eq!(RigError::from_status(-999), Some(RigError::Unknown(999)));
    }

    #[test]
    fn test_extreme_code() {
        assert!(matches!(
            RigError::from_status(i64::MIN),
            Some(RigError::Unknown(_))
        ));
    }

    #[test]
    fn test_unknown_status_saturates() {
        assert_eq!(RigError::Unknown(i64::MIN).status(), i64::MAX);
        assert_eq!(RigError::Unknown(99).status(), -99);
    }

    #[test]
    fn test_status_roundtrip() {
        for code in -20..0 {
            let err = RigError::from_status(code).unwrap();
            assert_eq!(err.status(), code);
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(RigError::Io.to_string(), "hamlib: I/O error");
        assert_eq!(RigError::Unknown(42).to_string(), "hamlib: unknown error 42");
        assert_eq!(
            ParseError::Unsupported {
                kind: "mode",
                value: "XYZ".into()
            }
            .to_string(),
            "unsupported mode \"XYZ\" reported"
        );
    }
}
