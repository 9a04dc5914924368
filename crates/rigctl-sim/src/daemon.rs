//! Virtual rigctld daemon
//!
//! Holds the state of a simulated rig and answers request lines the way the
//! real daemon does, so clients can be exercised without radio hardware.

use std::collections::HashMap;

use rigctl_protocol::report::encode_report;
use rigctl_protocol::{Frequency, Mode, RigCommand, RigError, SplitMode, Vfo};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Status code for requests the daemon does not understand
const UNKNOWN_COMMAND_STATUS: i64 = -11;

/// Configuration for creating a virtual daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VirtualRigConfig {
    /// Model name reported in the capability dump
    pub model_name: String,
    /// Manufacturer reported in the capability dump
    pub manufacturer: String,
    /// Backend version reported in the capability dump
    pub backend_version: String,
    /// Initial frequency in Hz
    pub frequency_hz: i64,
    /// Initial operating mode
    pub mode: Mode,
    /// Initial passband in Hz
    pub passband_hz: i64,
    /// Initial VFO
    pub vfo: Vfo,
    /// Capability flags as `(operation, supported)`, in dump order
    pub capabilities: Vec<(String, bool)>,
    /// Write each reply line separately, this many milliseconds apart
    ///
    /// Unset sends a whole reply in one write.
    pub reply_line_delay_ms: Option<u64>,
}

impl Default for VirtualRigConfig {
    fn default() -> Self {
        Self {
            model_name: "IC-7300".to_string(),
            manufacturer: "Icom".to_string(),
            backend_version: "20230328.0".to_string(),
            frequency_hz: 14_074_000, // 20m FT8
            mode: Mode::USB,
            passband_hz: 2400,
            vfo: Vfo::A,
            capabilities: [
                ("set Frequency", true),
                ("get Frequency", true),
                ("set Mode", true),
                ("get Mode", true),
                ("set VFO", true),
                ("get VFO", true),
                ("set PTT", true),
                ("get PTT", true),
                ("get DCD", true),
                ("set Split VFO", true),
                ("get Split VFO", true),
                ("get Power Status", false),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
            reply_line_delay_ms: None,
        }
    }
}

/// A simulated rig behind a rigctld daemon
#[derive(Debug, Clone)]
pub struct VirtualRigctld {
    config: VirtualRigConfig,
    frequency: Frequency,
    split_frequency: Frequency,
    repeater_shift: Frequency,
    repeater_offset: Frequency,
    tuning_step: Frequency,
    mode: Mode,
    passband_hz: i64,
    vfo: Vfo,
    split: SplitMode,
    tx_vfo: Vfo,
    rit: i32,
    xit: i32,
    ptt: bool,
    dcd: bool,
    ctcss_tone: String,
    ctcss_sql: String,
    dcs_code: String,
    dcs_sql: String,
    /// Status codes forced for specific request tokens
    faults: HashMap<String, i64>,
    /// Every request line received, in order (unbounded)
    requests: Vec<String>,
}

impl VirtualRigctld {
    /// Create a virtual daemon with default settings
    pub fn new() -> Self {
        Self::from_config(VirtualRigConfig::default())
    }

    /// Create a virtual daemon from configuration
    pub fn from_config(config: VirtualRigConfig) -> Self {
        Self {
            frequency: Frequency(config.frequency_hz),
            split_frequency: Frequency(config.frequency_hz),
            repeater_shift: Frequency(0),
            repeater_offset: Frequency(0),
            tuning_step: Frequency(1),
            mode: config.mode,
            passband_hz: config.passband_hz,
            vfo: config.vfo,
            split: SplitMode::Off,
            tx_vfo: Vfo::B,
            rit: 0,
            xit: 0,
            ptt: false,
            dcd: false,
            ctcss_tone: "0".to_string(),
            ctcss_sql: "0".to_string(),
            dcs_code: "0".to_string(),
            dcs_sql: "0".to_string(),
            faults: HashMap::new(),
            requests: Vec::new(),
            config,
        }
    }

    /// Configuration this daemon was created from
    pub fn config(&self) -> &VirtualRigConfig {
        &self.config
    }

    /// Current frequency
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Set the current frequency
    pub fn set_frequency(&mut self, freq: Frequency) {
        self.frequency = freq;
    }

    /// Set the split transmit frequency
    pub fn set_split_frequency(&mut self, freq: Frequency) {
        self.split_frequency = freq;
    }

    /// Set the repeater shift direction (sign of `shift`) and offset
    pub fn set_repeater(&mut self, shift: Frequency, offset: Frequency) {
        self.repeater_shift = shift;
        self.repeater_offset = offset;
    }

    /// Set the tuning step
    pub fn set_tuning_step(&mut self, step: Frequency) {
        self.tuning_step = step;
    }

    /// Current operating mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Set the operating mode
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Current VFO
    pub fn vfo(&self) -> Vfo {
        self.vfo
    }

    /// Set the current VFO
    pub fn set_vfo(&mut self, vfo: Vfo) {
        self.vfo = vfo;
    }

    /// Set split mode and the transmit VFO
    pub fn set_split(&mut self, split: SplitMode, tx_vfo: Vfo) {
        self.split = split;
        self.tx_vfo = tx_vfo;
    }

    /// Set RIT and XIT offsets in Hz
    pub fn set_offsets(&mut self, rit: i32, xit: i32) {
        self.rit = rit;
        self.xit = xit;
    }

    /// PTT state
    pub fn ptt(&self) -> bool {
        self.ptt
    }

    /// Set PTT state
    pub fn set_ptt(&mut self, ptt: bool) {
        self.ptt = ptt;
    }

    /// Set squelch/carrier detect state
    pub fn set_dcd(&mut self, open: bool) {
        self.dcd = open;
    }

    /// Set CTCSS transmit and squelch tones as the daemon reports them
    pub fn set_ctcss(&mut self, tone: &str, sql: &str) {
        self.ctcss_tone = tone.to_string();
        self.ctcss_sql = sql.to_string();
    }

    /// Set DCS code and squelch code as the daemon reports them
    pub fn set_dcs(&mut self, code: &str, sql: &str) {
        self.dcs_code = code.to_string();
        self.dcs_sql = sql.to_string();
    }

    /// Answer `token` with `RPRT <status>` instead of its normal reply
    pub fn fail_with(&mut self, token: &str, status: i64) {
        self.faults.insert(token.to_string(), status);
    }

    /// Answer `token` with the daemon error `err`
    pub fn fail_with_error(&mut self, token: &str, err: RigError) {
        self.fail_with(token, err.status());
    }

    /// Remove a forced status for `token`
    pub fn clear_fault(&mut self, token: &str) {
        self.faults.remove(token);
    }

    /// Request lines received so far
    ///
    /// The log is never trimmed; long-running sessions should call
    /// [`VirtualRigctld::clear_requests`] periodically.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    /// Forget the recorded request lines
    pub fn clear_requests(&mut self) {
        self.requests.clear();
    }

    /// Lines of the capability dump, including the trailing report
    pub fn dump_caps(&self) -> Vec<String> {
        let mut lines = vec![
            "Caps dump for model: 3073".to_string(),
            format!("Model name:\t{}", self.config.model_name),
            format!("Mfg name:\t{}", self.config.manufacturer),
            format!("Backend version:\t{}", self.config.backend_version),
            "Backend copyright:\tLGPL".to_string(),
            "Backend status:\tStable".to_string(),
            "Rig type:\tTransceiver".to_string(),
        ];
        lines.extend(
            self.config
                .capabilities
                .iter()
                .map(|(op, can)| format!("Can {}:\t{}", op, if *can { "Y" } else { "N" })),
        );
        lines.push(encode_report(0));
        lines
    }

    /// Handle one request line and return the reply lines
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        let line = line.trim();
        self.requests.push(line.to_string());
        debug!("Virtual rigctld handling {:?}", line);

        let word = line.split_whitespace().next().unwrap_or_default();
        if let Some(status) = self.faults.get(word) {
            return vec![encode_report(*status)];
        }

        match RigCommand::from_token(line) {
            Some(cmd) => self.handle_query(&cmd),
            None => vec![encode_report(self.handle_set(line))],
        }
    }

    fn handle_query(&self, cmd: &RigCommand) -> Vec<String> {
        let value = match cmd {
            RigCommand::GetFrequency => self.frequency.hz().to_string(),
            RigCommand::GetSplitFrequency => self.split_frequency.hz().to_string(),
            RigCommand::GetRepeaterShift => match self.repeater_shift.hz().signum() {
                1 => "+".to_string(),
                -1 => "-".to_string(),
                _ => "None".to_string(),
            },
            RigCommand::GetRepeaterOffset => self.repeater_offset.hz().to_string(),
            RigCommand::GetTuningStep => self.tuning_step.hz().to_string(),
            RigCommand::GetMode => {
                return vec![self.mode.to_string(), self.passband_hz.to_string()];
            }
            RigCommand::GetVfo => vfo_token(self.vfo),
            RigCommand::GetSplitVfo => {
                return vec![self.split.to_string(), vfo_token(self.tx_vfo)];
            }
            RigCommand::GetRit => self.rit.to_string(),
            RigCommand::GetXit => self.xit.to_string(),
            RigCommand::GetPtt => flag(self.ptt),
            RigCommand::GetDcd => flag(self.dcd),
            RigCommand::GetCtcssTone => self.ctcss_tone.clone(),
            RigCommand::GetCtcssSql => self.ctcss_sql.clone(),
            RigCommand::GetDcsCode => self.dcs_code.clone(),
            RigCommand::GetDcsSql => self.dcs_sql.clone(),
            RigCommand::DumpCaps => return self.dump_caps(),
            RigCommand::Raw(_) => return vec![encode_report(UNKNOWN_COMMAND_STATUS)],
        };
        vec![value]
    }

    /// Apply a set command, returning its status code
    fn handle_set(&mut self, line: &str) -> i64 {
        let mut parts = line.split_whitespace();
        let word = parts.next().unwrap_or_default();
        let arg = parts.next();

        let invalid = RigError::InvalidParameter.status();
        match (word, arg) {
            ("\\set_freq", Some(arg)) => match arg.parse::<f64>() {
                Ok(hz) => {
                    self.frequency = Frequency(hz as i64);
                    0
                }
                Err(_) => invalid,
            },
            ("\\set_mode", Some(arg)) => match arg.parse::<Mode>() {
                Ok(mode) => {
                    self.mode = mode;
                    if let Some(pb) = parts.next().and_then(|p| p.parse::<i64>().ok()) {
                        self.passband_hz = pb;
                    }
                    0
                }
                Err(_) => invalid,
            },
            ("\\set_vfo", Some(arg)) => match arg.parse::<Vfo>() {
                Ok(vfo) => {
                    self.vfo = vfo;
                    0
                }
                Err(_) => invalid,
            },
            ("\\set_ptt", Some(arg)) => match arg {
                "0" => {
                    self.ptt = false;
                    0
                }
                "1" => {
                    self.ptt = true;
                    0
                }
                _ => invalid,
            },
            ("\\set_freq" | "\\set_mode" | "\\set_vfo" | "\\set_ptt", None) => invalid,
            _ => {
                warn!("Virtual rigctld received unknown command {:?}", line);
                UNKNOWN_COMMAND_STATUS
            }
        }
    }
}

impl Default for VirtualRigctld {
    fn default() -> Self {
        Self::new()
    }
}

fn vfo_token(vfo: Vfo) -> String {
    vfo.token().unwrap_or_else(|| "unknown".to_string())
}

fn flag(on: bool) -> String {
    let value = if on { "1" } else { "0" };
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let mut rig = VirtualRigctld::new();
        assert_eq!(rig.handle_line("\\get_freq"), vec!["14074000"]);
        assert_eq!(rig.handle_line("\\get_mode"), vec!["USB", "2400"]);
        assert_eq!(rig.handle_line("\\get_vfo"), vec!["VFOA"]);
        assert_eq!(rig.handle_line("\\get_split_vfo"), vec!["off", "VFOB"]);
        assert_eq!(rig.handle_line("\\get_ptt"), vec!["0"]);
        assert_eq!(rig.handle_line("\\get_rptr_shift"), vec!["None"]);
    }

    #[test]
    fn test_dump_caps_ends_with_report() {
        let rig = VirtualRigctld::new();
        let lines = rig.dump_caps();
        assert_eq!(lines.last().map(String::as_str), Some("RPRT 0"));
        assert!(lines.contains(&"Model name:\tIC-7300".to_string()));
        assert!(lines.contains(&"Can get Power Status:\tN".to_string()));
    }

    #[test]
    fn test_set_commands() {
        let mut rig = VirtualRigctld::new();
        assert_eq!(rig.handle_line("\\set_freq 7074000"), vec!["RPRT 0"]);
        assert_eq!(rig.frequency(), Frequency(7_074_000));

        assert_eq!(rig.handle_line("\\set_mode CW 500"), vec!["RPRT 0"]);
        assert_eq!(rig.handle_line("\\get_mode"), vec!["CW", "500"]);

        assert_eq!(rig.handle_line("\\set_vfo VFOB"), vec!["RPRT 0"]);
        assert_eq!(rig.vfo(), Vfo::B);

        assert_eq!(rig.handle_line("\\set_ptt 1"), vec!["RPRT 0"]);
        assert!(rig.ptt());
    }

    #[test]
    fn test_invalid_set_arguments() {
        let mut rig = VirtualRigctld::new();
        assert_eq!(rig.handle_line("\\set_mode XYZ"), vec!["RPRT -1"]);
        assert_eq!(rig.handle_line("\\set_ptt"), vec!["RPRT -1"]);
        assert_eq!(rig.mode(), Mode::USB);
    }

    #[test]
    fn test_unknown_command() {
        let mut rig = VirtualRigctld::new();
        assert_eq!(rig.handle_line("\\frobnicate"), vec!["RPRT -11"]);
    }

    #[test]
    fn test_fault_injection() {
        let mut rig = VirtualRigctld::new();
        rig.fail_with_error("\\get_freq", RigError::Io);
        assert_eq!(rig.handle_line("\\get_freq"), vec!["RPRT -6"]);

        rig.clear_fault("\\get_freq");
        assert_eq!(rig.handle_line("\\get_freq"), vec!["14074000"]);
    }

    #[test]
    fn test_requests_recorded() {
        let mut rig = VirtualRigctld::new();
        rig.handle_line("\\get_freq\r");
        rig.handle_line("\\get_vfo");
        assert_eq!(rig.requests(), ["\\get_freq", "\\get_vfo"]);

        rig.clear_requests();
        assert!(rig.requests().is_empty());
        rig.handle_line("\\get_ptt");
        assert_eq!(rig.requests(), ["\\get_ptt"]);
    }

    #[test]
    fn test_from_config() {
        let config = VirtualRigConfig {
            model_name: "FT-991".to_string(),
            manufacturer: "Yaesu".to_string(),
            frequency_hz: 145_500_000,
            mode: Mode::FM,
            ..Default::default()
        };

        let mut rig = VirtualRigctld::from_config(config);
        assert_eq!(rig.handle_line("\\get_freq"), vec!["145500000"]);
        assert_eq!(rig.handle_line("\\get_mode")[0], "FM");
        assert!(rig.dump_caps().contains(&"Mfg name:\tYaesu".to_string()));
    }

    #[test]
    fn test_config_json() {
        let config: VirtualRigConfig =
            serde_json::from_str(r#"{"model_name": "TS-890", "frequency_hz": 7074000}"#).unwrap();
        assert_eq!(config.model_name, "TS-890");
        assert_eq!(config.frequency_hz, 7_074_000);
        assert_eq!(config.manufacturer, "Icom");
    }
}
