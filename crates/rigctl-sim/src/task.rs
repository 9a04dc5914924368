//! Virtual rigctld actor task
//!
//! Owns a [`VirtualRigctld`] and serves one client connection over an async
//! stream. The task uses a select! loop to:
//! - Read request lines from the stream and write the daemon's replies
//! - Apply state changes and fault injection from a control channel

use std::io;
use std::time::Duration;

use rigctl_protocol::codec::encode_line;
use rigctl_protocol::{Frequency, LineCodec, Mode, Vfo};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::VirtualRigctld;

/// Commands that can be sent to a running virtual daemon
#[derive(Debug, Clone)]
pub enum VirtualRigctldCommand {
    /// Tune the rig (as if the operator turned the dial)
    SetFrequency(Frequency),
    /// Change the operating mode
    SetMode(Mode),
    /// Select a VFO
    SetVfo(Vfo),
    /// Key or unkey the transmitter
    SetPtt(bool),
    /// Answer a request token with `RPRT <status>`
    FailWith { token: String, status: i64 },
    /// Stop answering a token with a forced status
    ClearFault(String),
    /// Shut down the task
    Shutdown,
}

/// Run the virtual daemon task until the stream closes or shutdown is requested
///
/// Returns the daemon so callers can inspect its final state.
pub async fn run_virtual_rigctld<S>(
    mut stream: S,
    mut rig: VirtualRigctld,
    mut cmd_rx: mpsc::Receiver<VirtualRigctldCommand>,
) -> io::Result<VirtualRigctld>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut codec = LineCodec::new();
    let mut buf = [0u8; 1024];
    let mut control_open = true;

    info!(
        "Starting virtual rigctld for {} {}",
        rig.config().manufacturer,
        rig.config().model_name
    );

    loop {
        tokio::select! {
            // Control commands apply before any request that follows them
            biased;

            cmd = cmd_rx.recv(), if control_open => {
                match cmd {
                    Some(VirtualRigctldCommand::SetFrequency(freq)) => rig.set_frequency(freq),
                    Some(VirtualRigctldCommand::SetMode(mode)) => rig.set_mode(mode),
                    Some(VirtualRigctldCommand::SetVfo(vfo)) => rig.set_vfo(vfo),
                    Some(VirtualRigctldCommand::SetPtt(ptt)) => rig.set_ptt(ptt),
                    Some(VirtualRigctldCommand::FailWith { token, status }) => {
                        rig.fail_with(&token, status);
                    }
                    Some(VirtualRigctldCommand::ClearFault(token)) => rig.clear_fault(&token),
                    Some(VirtualRigctldCommand::Shutdown) => {
                        info!("Shutdown requested for virtual rigctld");
                        break;
                    }
                    None => {
                        // Keep serving the stream without a controller
                        debug!("Control channel closed for virtual rigctld");
                        control_open = false;
                    }
                }
            }

            result = stream.read(&mut buf) => {
                match result {
                    Ok(0) => {
                        debug!("Virtual rigctld stream closed");
                        break;
                    }
                    Ok(n) => {
                        codec.push_bytes(&buf[..n]);
                        let mut replies = Vec::new();
                        while let Some(line) = codec.next_line() {
                            if line.trim().is_empty() {
                                continue;
                            }
                            replies.extend(rig.handle_line(&line));
                        }
                        let delay = rig.config().reply_line_delay_ms.map(Duration::from_millis);
                        write_replies(&mut stream, &replies, delay).await?;
                    }
                    Err(e) => {
                        warn!("Virtual rigctld stream error: {}", e);
                        return Err(e);
                    }
                }
            }
        }
    }

    info!("Virtual rigctld task ended after {} requests", rig.requests().len());
    Ok(rig)
}

/// Write reply lines, batched into one write unless `delay` spaces them out
async fn write_replies<S>(
    stream: &mut S,
    replies: &[String],
    delay: Option<Duration>,
) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    if replies.is_empty() {
        return Ok(());
    }

    match delay {
        None => {
            let out: Vec<u8> = replies.iter().flat_map(|r| encode_line(r)).collect();
            stream.write_all(&out).await?;
            stream.flush().await
        }
        Some(delay) => {
            for (i, reply) in replies.iter().enumerate() {
                if i > 0 {
                    tokio::time::sleep(delay).await;
                }
                stream.write_all(&encode_line(reply)).await?;
                stream.flush().await?;
            }
            Ok(())
        }
    }
}

/// Accept a single connection on `listener` and serve it
pub async fn serve_one(
    listener: TcpListener,
    rig: VirtualRigctld,
    cmd_rx: mpsc::Receiver<VirtualRigctldCommand>,
) -> io::Result<VirtualRigctld> {
    let (stream, peer) = listener.accept().await?;
    info!("Virtual rigctld accepted connection from {}", peer);
    run_virtual_rigctld(stream, rig, cmd_rx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VirtualRigConfig;
    use tokio::io::{duplex, AsyncBufReadExt, BufReader};

    #[tokio::test]
    async fn test_serves_requests() {
        let (client, server) = duplex(4096);
        let (_tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(run_virtual_rigctld(server, VirtualRigctld::new(), rx));

        let (read, mut write) = tokio::io::split(client);
        let mut lines = BufReader::new(read).lines();

        write.write_all(b"\\get_freq\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("14074000"));

        write.write_all(b"\\set_ptt 1\n\\get_ptt\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("RPRT 0"));
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("1"));

        drop(write);
        drop(lines);
        let rig = task.await.unwrap().unwrap();
        assert!(rig.ptt());
        assert_eq!(rig.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_reply_lines_written_separately() {
        let config = VirtualRigConfig {
            reply_line_delay_ms: Some(20),
            ..Default::default()
        };
        let (mut client, server) = duplex(4096);
        let (_tx, rx) = mpsc::channel(4);
        tokio::spawn(run_virtual_rigctld(server, VirtualRigctld::from_config(config), rx));

        client.write_all(b"\\get_mode\n").await.unwrap();
        let mut buf = [0u8; 64];
        let n = client.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"USB\n");
        let n = client.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"2400\n");
    }

    #[tokio::test]
    async fn test_control_channel() {
        let (client, server) = duplex(4096);
        let (tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(run_virtual_rigctld(server, VirtualRigctld::new(), rx));

        tx.send(VirtualRigctldCommand::SetFrequency(Frequency(7_074_000)))
            .await
            .unwrap();
        tx.send(VirtualRigctldCommand::FailWith {
            token: "\\get_vfo".into(),
            status: -4,
        })
        .await
        .unwrap();

        let (read, mut write) = tokio::io::split(client);
        let mut lines = BufReader::new(read).lines();

        write.write_all(b"\\get_vfo\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("RPRT -4"));
        write.write_all(b"\\get_freq\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("7074000"));

        tx.send(VirtualRigctldCommand::Shutdown).await.unwrap();
        let rig = task.await.unwrap().unwrap();
        assert_eq!(rig.frequency(), Frequency(7_074_000));
    }
}
