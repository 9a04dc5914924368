//! Typed client facade
//!
//! [`RigCtld`] connects to a daemon, loads the rig's capability dump once,
//! and exposes one method per queryable parameter. Every method is a single
//! round trip; nothing is cached or retried.
//!
//! ```rust,no_run
//! use rigctl_client::RigCtld;
//!
//! # async fn example() -> rigctl_client::Result<()> {
//! let mut rig = RigCtld::connect("localhost:4532").await?;
//! println!("rig......: {}", rig);
//! println!("frequency: {}", rig.frequency().await?);
//! println!("mode.....: {}", rig.mode().await?);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rigctl_protocol::{
    Frequency, Mode, ParseError, RigCapabilities, RigCommand, SplitMode, Vfo,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::connection::RigConnection;
use crate::error::{ClientError, Result};

/// Client for a radio controlled through rigctld
///
/// Generic over the stream type; [`RigCtld::connect`] yields a TCP client,
/// [`RigCtld::from_stream`] accepts any connected stream.
pub struct RigCtld<T = TcpStream> {
    conn: RigConnection<T>,
    caps: RigCapabilities,
}

impl RigCtld<TcpStream> {
    /// Connect to a daemon at `host:port` with default settings
    pub async fn connect(addr: &str) -> Result<Self> {
        Self::with_config(&ClientConfig::new(addr)).await
    }

    /// Connect using explicit settings
    pub async fn with_config(config: &ClientConfig) -> Result<Self> {
        let stream = open_tcp(config).await?;
        Self::from_stream(stream).await
    }
}

impl<T> RigCtld<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Build a client over an already-connected stream
    ///
    /// Issues the capability dump; if it fails the stream is dropped and no
    /// client is returned.
    pub async fn from_stream(io: T) -> Result<Self> {
        let mut conn = RigConnection::new(io);

        let (lines, status) = conn.extended(&RigCommand::DumpCaps).await?;
        if let Err(e) = status {
            warn!("Capability dump failed: {}", e);
            return Err(e.into());
        }

        let caps = RigCapabilities::parse(&lines);
        info!(
            "Loaded capabilities for {} {} ({} flags)",
            caps.manufacturer,
            caps.model_name,
            caps.can.len()
        );

        Ok(Self { conn, caps })
    }

    /// Rig model name from the capability dump
    pub fn model(&self) -> &str {
        &self.caps.model_name
    }

    /// Rig manufacturer from the capability dump
    pub fn manufacturer(&self) -> &str {
        &self.caps.manufacturer
    }

    /// Daemon backend version from the capability dump
    pub fn backend_version(&self) -> &str {
        &self.caps.backend_version
    }

    /// Capability flags keyed by operation name
    pub fn capabilities(&self) -> &BTreeMap<String, bool> {
        &self.caps.can
    }

    /// The full capability descriptor
    pub fn descriptor(&self) -> &RigCapabilities {
        &self.caps
    }

    /// Current memory channel
    ///
    /// Channel queries are not supported by this client and always report 0.
    pub async fn channel(&mut self) -> Result<i32> {
        Ok(0)
    }

    /// Current frequency
    pub async fn frequency(&mut self) -> Result<Frequency> {
        self.query_frequency(RigCommand::GetFrequency).await
    }

    /// Split transmit frequency
    pub async fn split_frequency(&mut self) -> Result<Frequency> {
        self.query_frequency(RigCommand::GetSplitFrequency).await
    }

    /// Repeater shift direction: `1` for `+`, `-1` for `-`, `0` otherwise
    pub async fn repeater_shift(&mut self) -> Result<Frequency> {
        let payload = self.conn.query(&RigCommand::GetRepeaterShift).await?;
        Ok(Frequency::from_shift(&payload))
    }

    /// Repeater offset
    pub async fn repeater_offset(&mut self) -> Result<Frequency> {
        self.query_frequency(RigCommand::GetRepeaterOffset).await
    }

    /// Tuning step
    pub async fn tuning_step(&mut self) -> Result<Frequency> {
        self.query_frequency(RigCommand::GetTuningStep).await
    }

    /// Operating mode
    pub async fn mode(&mut self) -> Result<Mode> {
        self.query_token(RigCommand::GetMode).await
    }

    /// Active VFO
    pub async fn vfo(&mut self) -> Result<Vfo> {
        self.query_token(RigCommand::GetVfo).await
    }

    /// Split mode
    pub async fn split_mode(&mut self) -> Result<SplitMode> {
        self.query_token(RigCommand::GetSplitVfo).await
    }

    /// Receiver incremental tuning offset in Hz
    pub async fn rit(&mut self) -> Result<i32> {
        self.query_int(RigCommand::GetRit, "RIT").await
    }

    /// Transmitter incremental tuning offset in Hz
    pub async fn xit(&mut self) -> Result<i32> {
        self.query_int(RigCommand::GetXit, "XIT").await
    }

    /// Whether the rig is transmitting
    pub async fn ptt(&mut self) -> Result<bool> {
        self.query_flag(RigCommand::GetPtt).await
    }

    /// Whether the squelch is open (carrier detected)
    pub async fn squelch(&mut self) -> Result<bool> {
        self.query_flag(RigCommand::GetDcd).await
    }

    /// CTCSS transmit tone
    pub async fn ctcss_tone(&mut self) -> Result<String> {
        self.conn.query(&RigCommand::GetCtcssTone).await
    }

    /// CTCSS squelch tone
    pub async fn squelch_ctcss(&mut self) -> Result<String> {
        self.conn.query(&RigCommand::GetCtcssSql).await
    }

    /// DCS code
    pub async fn dcs_code(&mut self) -> Result<String> {
        self.conn.query(&RigCommand::GetDcsCode).await
    }

    /// DCS squelch code
    pub async fn squelch_dcs(&mut self) -> Result<String> {
        self.conn.query(&RigCommand::GetDcsSql).await
    }

    /// Send a raw fire-and-forget command line and check its status report
    pub async fn send_command(&mut self, line: &str) -> Result<()> {
        self.conn.command(&RigCommand::Raw(line.to_string())).await
    }

    /// Close the connection
    pub async fn close(mut self) -> Result<()> {
        debug!("Closing connection to {} {}", self.manufacturer(), self.model());
        self.conn.shutdown().await?;
        Ok(())
    }

    async fn query_frequency(&mut self, cmd: RigCommand) -> Result<Frequency> {
        let payload = self.conn.query(&cmd).await?;
        Ok(Frequency::parse_hz(&payload)?)
    }

    async fn query_int(&mut self, cmd: RigCommand, kind: &'static str) -> Result<i32> {
        let payload = self.conn.query(&cmd).await?;
        payload.trim().parse::<i32>().map_err(|_| {
            ClientError::from(ParseError::Unsupported {
                kind,
                value: payload,
            })
        })
    }

    async fn query_flag(&mut self, cmd: RigCommand) -> Result<bool> {
        let payload = self.conn.query(&cmd).await?;
        Ok(payload == "1")
    }

    async fn query_token<V>(&mut self, cmd: RigCommand) -> Result<V>
    where
        V: FromStr<Err = ParseError>,
    {
        let payload = self.conn.query(&cmd).await?;
        Ok(payload.parse::<V>()?)
    }
}

impl<T> fmt::Display for RigCtld<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.caps.manufacturer, self.caps.model_name)
    }
}

/// Open a TCP stream according to `config`
async fn open_tcp(config: &ClientConfig) -> Result<TcpStream> {
    let addr = config.address.as_str();
    debug!("Connecting to rigctld at {}", addr);

    let connect = TcpStream::connect(addr);
    let result = match config.connect_timeout() {
        Some(timeout) => tokio::time::timeout(timeout, connect).await.map_err(|_| {
            ClientError::ConnectTimeout {
                addr: addr.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }
        })?,
        None => connect.await,
    };
    let stream = result.map_err(|source| ClientError::Connect {
        addr: addr.to_string(),
        source,
    })?;

    if config.nodelay {
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY on {}: {}", addr, e);
        }
    }

    info!("Connected to rigctld at {}", addr);
    Ok(stream)
}
