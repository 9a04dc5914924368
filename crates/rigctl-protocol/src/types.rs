//! Value types reported by the daemon
//!
//! [`Frequency`] is an exact count of Hz. [`Mode`] and [`Vfo`] are bitmask
//! newtypes mirroring the daemon's own flag values, so unknown raw values can
//! be carried and displayed as `unknown`. [`SplitMode`] is a closed set.
//!
//! The textual tables are the single source of truth: the reverse
//! (token → value) maps are built from them on first use.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::ParseError;

/// Unit thresholds, in Hz
const KHZ: i64 = 1_000;
const MHZ: i64 = 1_000_000;
const GHZ: i64 = 1_000_000_000;
const THZ: i64 = 1_000_000_000_000;
const PHZ: i64 = 1_000_000_000_000_000;

/// A frequency (or frequency offset) in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frequency(pub i64);

impl Frequency {
    pub const HZ: Frequency = Frequency(1);
    pub const KHZ: Frequency = Frequency(KHZ);
    pub const MHZ: Frequency = Frequency(MHZ);
    pub const GHZ: Frequency = Frequency(GHZ);
    pub const THZ: Frequency = Frequency(THZ);

    /// Create a frequency from a count of Hz
    pub const fn from_hz(hz: i64) -> Self {
        Frequency(hz)
    }

    /// The frequency in Hz
    pub const fn hz(&self) -> i64 {
        self.0
    }

    /// Parse a decimal Hz payload such as `14074000`
    pub fn parse_hz(s: &str) -> Result<Self, ParseError> {
        s.trim()
            .parse::<i64>()
            .map(Frequency)
            .map_err(|_| unsupported("frequency", s))
    }

    /// Decode a repeater shift token into a direction
    ///
    /// `+` is `1`, `-` is `-1`, anything else (including `None`) is `0`.
    pub fn from_shift(s: &str) -> Self {
        match s.trim() {
            "+" => Frequency(1),
            "-" => Frequency(-1),
            _ => Frequency(0),
        }
    }
}

impl From<i64> for Frequency {
    fn from(hz: i64) -> Self {
        Frequency(hz)
    }
}

impl Add for Frequency {
    type Output = Frequency;

    fn add(self, rhs: Frequency) -> Frequency {
        Frequency(self.0 + rhs.0)
    }
}

impl Sub for Frequency {
    type Output = Frequency;

    fn sub(self, rhs: Frequency) -> Frequency {
        Frequency(self.0 - rhs.0)
    }
}

impl Neg for Frequency {
    type Output = Frequency;

    fn neg(self) -> Frequency {
        Frequency(-self.0)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        let (unit, label) = match hz {
            _ if hz < KHZ => return write!(f, "{} Hz", hz),
            _ if hz < MHZ => (KHZ, "kHz"),
            _ if hz < GHZ => (MHZ, "MHz"),
            _ if hz < THZ => (GHZ, "GHz"),
            _ if hz < PHZ => (THZ, "THz"),
            _ => return f.write_str("overflow"),
        };
        let value = (hz as f64 / unit as f64).to_string();
        write!(f, "{} {}", trim_fraction(&value), label)
    }
}

/// Strip a single trailing zero from the fractional part of a decimal string
fn trim_fraction(value: &str) -> &str {
    if value.contains('.') {
        value.strip_suffix('0').unwrap_or(value)
    } else {
        value
    }
}

/// Operating mode, one bit per mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mode(pub u32);

impl Mode {
    pub const NONE: Mode = Mode(0);
    /// Amplitude Modulation
    pub const AM: Mode = Mode(1 << 1);
    /// Continuous Wave
    pub const CW: Mode = Mode(1 << 2);
    /// Upper Side Band
    pub const USB: Mode = Mode(1 << 3);
    /// Lower Side Band
    pub const LSB: Mode = Mode(1 << 4);
    /// Radio Teletype
    pub const RTTY: Mode = Mode(1 << 5);
    /// Narrow band FM
    pub const FM: Mode = Mode(1 << 6);
    /// Broadcast wide band FM
    pub const WFM: Mode = Mode(1 << 7);
    /// Continuous Wave Reverse
    pub const CWR: Mode = Mode(1 << 8);
    /// Radio Teletype Reverse
    pub const RTTYR: Mode = Mode(1 << 9);
    /// Amplitude Modulation Synchronous
    pub const AMS: Mode = Mode(1 << 10);
    /// Packet/Digital LSB
    pub const PKTLSB: Mode = Mode(1 << 11);
    /// Packet/Digital USB
    pub const PKTUSB: Mode = Mode(1 << 12);
    /// Packet/Digital FM
    pub const PKTFM: Mode = Mode(1 << 13);
    /// Exalted Carrier Single Side Band USB
    pub const ECSSUSB: Mode = Mode(1 << 14);
    /// Exalted Carrier Single Side Band LSB
    pub const ECSSLSB: Mode = Mode(1 << 15);
    /// Facsimile
    pub const FAX: Mode = Mode(1 << 16);
    /// Synchronous AM double side band
    pub const SAM: Mode = Mode(1 << 17);
    /// Synchronous AM lower side band
    pub const SAL: Mode = Mode(1 << 18);
    /// Synchronous AM upper side band
    pub const SAH: Mode = Mode(1 << 19);
    /// Double side band suppressed carrier
    pub const DSB: Mode = Mode(1 << 20);

    /// Every named mode with its canonical token
    pub const NAMES: &'static [(Mode, &'static str)] = &[
        (Mode::NONE, "none"),
        (Mode::AM, "AM"),
        (Mode::CW, "CW"),
        (Mode::USB, "USB"),
        (Mode::LSB, "LSB"),
        (Mode::RTTY, "RTTY"),
        (Mode::FM, "FM"),
        (Mode::WFM, "WFM"),
        (Mode::CWR, "CWR"),
        (Mode::RTTYR, "RTTYR"),
        (Mode::AMS, "AMS"),
        (Mode::PKTLSB, "PKTLSB"),
        (Mode::PKTUSB, "PKTUSB"),
        (Mode::PKTFM, "PKTFM"),
        (Mode::ECSSUSB, "ECSSUSB"),
        (Mode::ECSSLSB, "ECSSLSB"),
        (Mode::FAX, "FAX"),
        (Mode::SAM, "SAM"),
        (Mode::SAL, "SAL"),
        (Mode::SAH, "SAH"),
        (Mode::DSB, "DSB"),
    ];

    /// Canonical token for this mode, if it has one
    pub fn name(&self) -> Option<&'static str> {
        lookup_name(Self::NAMES, self)
    }

    /// Look up a mode by its canonical token
    pub fn from_name(name: &str) -> Option<Mode> {
        MODE_VALUES.get(name).copied()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("unknown"))
    }
}

impl FromStr for Mode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::from_name(s).ok_or_else(|| unsupported("mode", s))
    }
}

/// VFO / receiver selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vfo(pub u32);

impl Vfo {
    pub const NONE: Vfo = Vfo(0);
    pub const A: Vfo = Vfo(1 << 1);
    pub const B: Vfo = Vfo(1 << 2);
    pub const C: Vfo = Vfo(1 << 3);
    pub const SUB: Vfo = Vfo(1 << 25);
    pub const MAIN: Vfo = Vfo(1 << 26);
    /// Last selected VFO (has no display name)
    pub const LAST: Vfo = Vfo(1 << 27);
    pub const MEMORY: Vfo = Vfo(1 << 28);
    pub const CURRENT: Vfo = Vfo(1 << 29);

    /// Every named VFO with its display name
    ///
    /// The wire token is the display name with spaces removed (`VFOA`).
    pub const NAMES: &'static [(Vfo, &'static str)] = &[
        (Vfo::NONE, "none"),
        (Vfo::A, "VFO A"),
        (Vfo::B, "VFO B"),
        (Vfo::C, "VFO C"),
        (Vfo::SUB, "sub"),
        (Vfo::MAIN, "main"),
        (Vfo::MEMORY, "memory"),
        (Vfo::CURRENT, "current"),
    ];

    /// Display name for this VFO, if it has one
    pub fn name(&self) -> Option<&'static str> {
        lookup_name(Self::NAMES, self)
    }

    /// Wire token for this VFO (display name without spaces)
    pub fn token(&self) -> Option<String> {
        self.name().map(|n| n.replace(' ', ""))
    }

    /// Look up a VFO by its wire token
    pub fn from_name(name: &str) -> Option<Vfo> {
        VFO_VALUES.get(name).copied()
    }
}

impl fmt::Display for Vfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("unknown"))
    }
}

impl FromStr for Vfo {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vfo::from_name(s).ok_or_else(|| unsupported("VFO", s))
    }
}

/// Split operation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplitMode {
    #[default]
    None,
    Off,
    On,
    Tx,
}

impl SplitMode {
    pub const NAMES: &'static [(SplitMode, &'static str)] = &[
        (SplitMode::None, "none"),
        (SplitMode::Off, "off"),
        (SplitMode::On, "on"),
        (SplitMode::Tx, "tx"),
    ];

    /// Canonical token for this split mode
    pub fn name(&self) -> &'static str {
        lookup_name(Self::NAMES, self).unwrap_or("unknown")
    }

    /// Look up a split mode by its canonical token
    pub fn from_name(name: &str) -> Option<SplitMode> {
        SPLIT_MODE_VALUES.get(name).copied()
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SplitMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SplitMode::from_name(s).ok_or_else(|| unsupported("split mode", s))
    }
}

static MODE_VALUES: Lazy<HashMap<&'static str, Mode>> =
    Lazy::new(|| Mode::NAMES.iter().map(|&(m, n)| (n, m)).collect());

static VFO_VALUES: Lazy<HashMap<String, Vfo>> = Lazy::new(|| {
    Vfo::NAMES
        .iter()
        .map(|&(v, n)| (n.replace(' ', ""), v))
        .collect()
});

static SPLIT_MODE_VALUES: Lazy<HashMap<&'static str, SplitMode>> =
    Lazy::new(|| SplitMode::NAMES.iter().map(|&(m, n)| (n, m)).collect());

fn lookup_name<T: PartialEq>(table: &[(T, &'static str)], value: &T) -> Option<&'static str> {
    table.iter().find(|(v, _)| v == value).map(|&(_, n)| n)
}

pub(crate) fn unsupported(kind: &'static str, value: &str) -> ParseError {
    ParseError::Unsupported {
        kind,
        value: value.to_string(),
    }
}
