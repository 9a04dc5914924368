//! rigctld Client
//!
//! This crate talks to a rigctld daemon over TCP (or any async byte stream)
//! and exposes the rig's state through typed accessors.
//!
//! # Architecture
//!
//! - [`connection`]: owns the stream and implements the three request shapes
//!   (status-only command, single-value query, extended query)
//! - [`client`]: [`RigCtld`], which loads the capability dump on connect and
//!   decodes each query into its value type
//! - [`config`]: connection settings
//!
//! A client serves one request at a time. To share one between tasks, wrap
//! it in a `tokio::sync::Mutex`.
//!
//! # Example
//!
//! ```rust,no_run
//! use rigctl_client::{ClientConfig, RigCtld};
//!
//! # async fn example() -> rigctl_client::Result<()> {
//! let config = ClientConfig {
//!     connect_timeout_ms: Some(2000),
//!     ..ClientConfig::new("localhost:4532")
//! };
//! let mut rig = RigCtld::with_config(&config).await?;
//!
//! let freq = rig.frequency().await?;
//! let vfo = rig.vfo().await?;
//! println!("{} on {}", freq, vfo);
//!
//! for (name, supported) in rig.capabilities() {
//!     println!("can {}: {}", name, supported);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod error;

pub use client::RigCtld;
pub use config::ClientConfig;
pub use connection::{ExtendedOutcome, RigConnection};
pub use error::{ClientError, Result};

// Re-export the value types callers receive
pub use rigctl_protocol::{Frequency, Mode, RigCapabilities, RigError, SplitMode, Vfo};
