//! rigctld Protocol Library
//!
//! This crate provides parsing and encoding for the line-oriented text
//! protocol spoken by the rigctld radio control daemon. It performs no I/O;
//! the `rigctl-client` crate drives it over a stream.
//!
//! # Wire format
//!
//! - Requests: one line per request, e.g. `\get_freq\n`
//! - Status: `RPRT <code>` where `0` is success and negative codes are errors
//! - Values: a single payload line, e.g. `14074000`
//! - Extended replies: `key: value` lines terminated by a status line
//!
//! # Example
//!
//! ```rust
//! use rigctl_protocol::{ExtendedReply, LineCodec, RigCapabilities};
//!
//! let mut codec = LineCodec::new();
//! codec.push_bytes(b"Model name: IC-7300\nMfg name: Icom\nRPRT 0\n");
//!
//! let mut reply = ExtendedReply::new();
//! while let Some(line) = codec.next_line() {
//!     if reply.push_line(line) {
//!         break;
//!     }
//! }
//!
//! let (lines, status) = reply.finish();
//! assert!(status.is_ok());
//!
//! let caps = RigCapabilities::parse(&lines);
//! assert_eq!(caps.model_name, "IC-7300");
//! ```

pub mod caps;
pub mod codec;
pub mod command;
pub mod error;
pub mod reply;
pub mod report;
pub mod types;

pub use caps::RigCapabilities;
pub use codec::LineCodec;
pub use command::{ReplyShape, RigCommand};
pub use error::{ParseError, ProtocolError, RigError};
pub use reply::ExtendedReply;
pub use types::{Frequency, Mode, SplitMode, Vfo};

/// Trait for commands that can be encoded to bytes
pub trait EncodeCommand {
    /// Encode this command to its wire format
    fn encode(&self) -> Vec<u8>;
}
