//! Request/response exchange over a byte stream
//!
//! [`RigConnection`] owns the stream and implements the three request shapes
//! of the protocol. It is generic over the I/O type so the same code path
//! serves TCP connections and in-memory `DuplexStream`s in tests.
//!
//! Replies carry no request identifier, so exactly one request may be in
//! flight. Every request method takes `&mut self`, which makes interleaving
//! two requests on one connection impossible.

use std::io;

use rigctl_protocol::reply::{command_reply, value_reply};
use rigctl_protocol::report::is_report_reply;
use rigctl_protocol::{EncodeCommand, ExtendedReply, LineCodec, ProtocolError, RigCommand};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace, warn};

use crate::error::Result;

/// Outcome of an extended query: payload lines and the decoded status
pub type ExtendedOutcome = (Vec<String>, std::result::Result<(), ProtocolError>);

/// Line-oriented connection to a daemon
pub struct RigConnection<T> {
    io: T,
    codec: LineCodec,
    buffer: Vec<u8>,
}

impl<T> RigConnection<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already-connected stream
    pub fn new(io: T) -> Self {
        Self {
            io,
            codec: LineCodec::new(),
            buffer: vec![0u8; 1024],
        }
    }

    /// Send a fire-and-forget command and decode its status report
    pub async fn command(&mut self, cmd: &RigCommand) -> Result<()> {
        self.send(cmd).await?;
        let line = self.read_line().await?;
        command_reply(line.as_deref())?;
        Ok(())
    }

    /// Send a single-value query and return the payload line
    ///
    /// A status report in place of the payload is decoded and returned as
    /// the mapped error. Replies that carry more than one line (see
    /// [`RigCommand::reply_lines`]) are read to the end so the next request
    /// starts on a clean stream.
    pub async fn query(&mut self, cmd: &RigCommand) -> Result<String> {
        self.send(cmd).await?;
        let line = self.read_line().await?;
        let payload = value_reply(line.as_deref())?;

        if !is_report_reply(line.as_deref().unwrap_or_default()) {
            for _ in 1..cmd.reply_lines() {
                match self.read_line().await? {
                    Some(extra) => trace!("Dropping trailing reply line {:?}", extra),
                    None => break,
                }
            }
        }
        Ok(payload)
    }

    /// Send an extended query and collect lines up to the status report
    ///
    /// The outer `Result` carries transport errors only; the daemon status is
    /// returned alongside the lines that preceded it.
    pub async fn extended(&mut self, cmd: &RigCommand) -> io::Result<ExtendedOutcome> {
        self.send(cmd).await?;

        let mut reply = ExtendedReply::new();
        while let Some(line) = self.read_line().await? {
            if reply.push_line(line) {
                break;
            }
        }
        Ok(reply.finish())
    }

    /// Write a request line
    async fn send(&mut self, cmd: &RigCommand) -> io::Result<()> {
        if self.codec.has_pending() {
            warn!("Unread reply data before sending {}", cmd.token());
        }

        debug!("Sending {}", cmd.token());
        self.io.write_all(&cmd.encode()).await?;
        self.io.flush().await
    }

    /// Read the next reply line
    ///
    /// Returns `None` once the stream has ended; an unterminated final line
    /// is still returned.
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(line) = self.codec.next_line() {
                trace!("Received {:?}", line);
                return Ok(Some(line));
            }

            let n = self.io.read(&mut self.buffer).await?;
            if n == 0 {
                debug!("Stream closed by daemon");
                return Ok(self.codec.take_partial());
            }
            trace!("Read {} bytes: {:?}", n, String::from_utf8_lossy(&self.buffer[..n]));
            self.codec.push_bytes(&self.buffer[..n]);
        }
    }

    /// Shut down the write half of the stream
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.io.shutdown().await
    }

    /// Get a reference to the underlying stream
    pub fn get_ref(&self) -> &T {
        &self.io
    }

    /// Consume the connection, returning the underlying stream
    pub fn into_inner(self) -> T {
        self.io
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use rigctl_protocol::RigError;
    use tokio::io::{duplex, AsyncBufReadExt, BufReader, DuplexStream};

    /// Spawn a scripted daemon that answers each request line with the next
    /// entry of `replies`, closing the stream after the last one
    fn scripted(replies: Vec<&'static str>) -> RigConnection<DuplexStream> {
        let (client, server) = duplex(4096);
        tokio::spawn(async move {
            let (read, mut write) = tokio::io::split(server);
            let mut lines = BufReader::new(read).lines();
            for reply in replies {
                if lines.next_line().await.ok().flatten().is_none() {
                    return;
                }
                let _ = write.write_all(reply.as_bytes()).await;
            }
        });
        RigConnection::new(client)
    }

    #[tokio::test]
    async fn test_query_payload() {
        let mut conn = scripted(vec!["14074000\n"]);
        let payload = conn.query(&RigCommand::GetFrequency).await.unwrap();
        assert_eq!(payload, "14074000");
    }

    #[tokio::test]
    async fn test_query_report_is_error() {
        let mut conn = scripted(vec!["RPRT -6\n"]);
        let err = conn.query(&RigCommand::GetFrequency).await.unwrap_err();
        assert_eq!(err.rig_error(), Some(RigError::Io));
    }

    #[tokio::test]
    async fn test_query_stream_closed() {
        let mut conn = scripted(vec![""]);
        let err = conn.query(&RigCommand::GetVfo).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::MissingReport)
        ));
    }

    #[tokio::test]
    async fn test_command_report() {
        let mut conn = scripted(vec!["RPRT 0\n", "RPRT -11\n"]);
        let set = RigCommand::Raw("\\set_freq 7074000".into());
        conn.command(&set).await.unwrap();

        let err = conn.command(&set).await.unwrap_err();
        assert_eq!(err.rig_error(), Some(RigError::NotAvailable));
    }

    #[tokio::test]
    async fn test_extended_reply() {
        let mut conn = scripted(vec!["a: 1\nb: 2\nRPRT 0\n"]);
        let (lines, status) = conn.extended(&RigCommand::DumpCaps).await.unwrap();
        assert_eq!(lines, vec!["a: 1", "b: 2"]);
        assert_eq!(status, Ok(()));
    }

    #[tokio::test]
    async fn test_extended_error_status() {
        let mut conn = scripted(vec!["a: 1\nRPRT -4\n"]);
        let (lines, status) = conn.extended(&RigCommand::DumpCaps).await.unwrap();
        assert_eq!(lines, vec!["a: 1"]);
        assert_eq!(status, Err(ProtocolError::Rig(RigError::NotImplemented)));
    }

    #[tokio::test]
    async fn test_extended_missing_report() {
        let mut conn = scripted(vec!["a: 1\nb: 2\n"]);
        let (lines, status) = conn.extended(&RigCommand::DumpCaps).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(status, Err(ProtocolError::MissingReport));
    }

    #[tokio::test]
    async fn test_unterminated_final_line() {
        let mut conn = scripted(vec!["USB"]);
        let payload = conn.query(&RigCommand::GetMode).await.unwrap();
        assert_eq!(payload, "USB");
    }

    #[tokio::test]
    async fn test_passband_line_consumed() {
        // get_mode answers with mode and passband; the passband must not be
        // taken as the answer to the next request
        let mut conn = scripted(vec!["USB\n2400\n", "14074000\n"]);
        assert_eq!(conn.query(&RigCommand::GetMode).await.unwrap(), "USB");
        assert_eq!(
            conn.query(&RigCommand::GetFrequency).await.unwrap(),
            "14074000"
        );
    }

    #[tokio::test]
    async fn test_trailing_line_in_later_write() {
        let (client, server) = duplex(4096);
        tokio::spawn(async move {
            let (read, mut write) = tokio::io::split(server);
            let mut lines = BufReader::new(read).lines();

            lines.next_line().await.unwrap();
            write.write_all(b"USB\n").await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            write.write_all(b"2400\n").await.unwrap();

            lines.next_line().await.unwrap();
            write.write_all(b"14074000\n").await.unwrap();
            lines.next_line().await.unwrap();
        });

        let mut conn = RigConnection::new(client);
        assert_eq!(conn.query(&RigCommand::GetMode).await.unwrap(), "USB");
        assert_eq!(
            conn.query(&RigCommand::GetFrequency).await.unwrap(),
            "14074000"
        );
    }

    #[tokio::test]
    async fn test_error_report_has_no_trailing_line() {
        let mut conn = scripted(vec!["RPRT -11\n", "VFOA\n"]);
        let err = conn.query(&RigCommand::GetSplitVfo).await.unwrap_err();
        assert_eq!(err.rig_error(), Some(RigError::NotAvailable));
        assert_eq!(conn.query(&RigCommand::GetVfo).await.unwrap(), "VFOA");
    }

    #[tokio::test]
    async fn test_request_bytes() {
        let (client, mut server) = duplex(256);
        let mut conn = RigConnection::new(client);
        tokio::spawn(async move {
            let _ = conn.query(&RigCommand::GetSplitVfo).await;
        });

        let mut buf = [0u8; 64];
        let n = server.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"\\get_split_vfo\n");
    }
}
