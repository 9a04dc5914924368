//! rigctld Simulation Library
//!
//! This crate provides a virtual rigctld daemon for testing clients without
//! a radio or a running hamlib installation. It includes:
//!
//! - **VirtualRigctld**: rig state plus the daemon's request handling
//! - **run_virtual_rigctld**: an actor task serving a stream, controllable
//!   through a channel
//!
//! # Example
//!
//! ```rust
//! use rigctl_protocol::{Frequency, RigError};
//! use rigctl_sim::VirtualRigctld;
//!
//! let mut rig = VirtualRigctld::new();
//! rig.set_frequency(Frequency(7_074_000));
//! assert_eq!(rig.handle_line("\\get_freq"), vec!["7074000"]);
//!
//! // Make the next frequency query fail the way a timed-out rig would
//! rig.fail_with_error("\\get_freq", RigError::Timeout);
//! assert_eq!(rig.handle_line("\\get_freq"), vec!["RPRT -5"]);
//! ```

pub mod daemon;
pub mod task;

pub use daemon::{VirtualRigConfig, VirtualRigctld};
pub use task::{run_virtual_rigctld, serve_one, VirtualRigctldCommand};
