//! Request tokens understood by the daemon
//!
//! Requests are single lines such as `\get_freq`. Each request has one of
//! three reply shapes, see [`ReplyShape`].

use crate::codec::encode_line;
use crate::EncodeCommand;

/// How the daemon answers a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyShape {
    /// A single `RPRT <code>` line
    Report,
    /// A single payload line, or an `RPRT <code>` line on failure
    Value,
    /// Any number of payload lines terminated by `RPRT <code>`
    Extended,
}

/// Requests issued by the client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RigCommand {
    /// `\get_freq` - current frequency in Hz
    GetFrequency,
    /// `\get_split_freq` - split transmit frequency in Hz
    GetSplitFrequency,
    /// `\get_rptr_shift` - repeater shift direction (`+`, `-`, `None`)
    GetRepeaterShift,
    /// `\get_rptr_offs` - repeater offset in Hz
    GetRepeaterOffset,
    /// `\get_ts` - tuning step in Hz
    GetTuningStep,
    /// `\get_mode` - operating mode token
    GetMode,
    /// `\get_vfo` - active VFO token
    GetVfo,
    /// `\get_split_vfo` - split mode token
    GetSplitVfo,
    /// `\get_rit` - RIT offset in Hz
    GetRit,
    /// `\get_xit` - XIT offset in Hz
    GetXit,
    /// `\get_ptt` - PTT state (`1` when transmitting)
    GetPtt,
    /// `\get_dcd` - squelch/carrier detect (`1` when open)
    GetDcd,
    /// `\get_ctcss_tone` - CTCSS transmit tone
    GetCtcssTone,
    /// `\get_ctcss_sql` - CTCSS squelch tone
    GetCtcssSql,
    /// `\get_dcs_code` - DCS code
    GetDcsCode,
    /// `\get_dcs_sql` - DCS squelch code
    GetDcsSql,
    /// `\dump_caps` - capability dump
    DumpCaps,
    /// Arbitrary fire-and-forget command line (e.g. `\set_freq 7074000`)
    Raw(String),
}

impl RigCommand {
    /// Every fixed request token
    pub const QUERIES: &'static [RigCommand] = &[
        RigCommand::GetFrequency,
        RigCommand::GetSplitFrequency,
        RigCommand::GetRepeaterShift,
        RigCommand::GetRepeaterOffset,
        RigCommand::GetTuningStep,
        RigCommand::GetMode,
        RigCommand::GetVfo,
        RigCommand::GetSplitVfo,
        RigCommand::GetRit,
        RigCommand::GetXit,
        RigCommand::GetPtt,
        RigCommand::GetDcd,
        RigCommand::GetCtcssTone,
        RigCommand::GetCtcssSql,
        RigCommand::GetDcsCode,
        RigCommand::GetDcsSql,
        RigCommand::DumpCaps,
    ];

    /// The request line (without terminator)
    pub fn token(&self) -> &str {
        match self {
            RigCommand::GetFrequency => "\\get_freq",
            RigCommand::GetSplitFrequency => "\\get_split_freq",
            RigCommand::GetRepeaterShift => "\\get_rptr_shift",
            RigCommand::GetRepeaterOffset => "\\get_rptr_offs",
            RigCommand::GetTuningStep => "\\get_ts",
            RigCommand::GetMode => "\\get_mode",
            RigCommand::GetVfo => "\\get_vfo",
            RigCommand::GetSplitVfo => "\\get_split_vfo",
            RigCommand::GetRit => "\\get_rit",
            RigCommand::GetXit => "\\get_xit",
            RigCommand::GetPtt => "\\get_ptt",
            RigCommand::GetDcd => "\\get_dcd",
            RigCommand::GetCtcssTone => "\\get_ctcss_tone",
            RigCommand::GetCtcssSql => "\\get_ctcss_sql",
            RigCommand::GetDcsCode => "\\get_dcs_code",
            RigCommand::GetDcsSql => "\\get_dcs_sql",
            RigCommand::DumpCaps => "\\dump_caps",
            RigCommand::Raw(line) => line,
        }
    }

    /// Number of lines in a successful reply to a single-value query
    ///
    /// `\get_mode` answers with mode and passband, `\get_split_vfo` with the
    /// split state and the transmit VFO. Only the first line is the value.
    pub fn reply_lines(&self) -> usize {
        match self {
            RigCommand::GetMode | RigCommand::GetSplitVfo => 2,
            _ => 1,
        }
    }

    /// The reply shape the daemon uses for this request
    pub fn shape(&self) -> ReplyShape {
        match self {
            RigCommand::DumpCaps => ReplyShape::Extended,
            RigCommand::Raw(_) => ReplyShape::Report,
            _ => ReplyShape::Value,
        }
    }

    /// Look up a fixed request by its token
    ///
    /// Only the command word is considered, so `\get_freq` and
    /// `\get_freq VFOA` both match. Unknown tokens yield `None`.
    pub fn from_token(line: &str) -> Option<RigCommand> {
        let word = line.split_whitespace().next()?;
        Self::QUERIES.iter().find(|c| c.token() == word).cloned()
    }
}

impl EncodeCommand for RigCommand {
    fn encode(&self) -> Vec<u8> {
        encode_line(self.token())
    }
}
