use std::io::{Read, Write};

use radctl_frame::{ChannelReader, ChannelWriter};
#[cfg(unix)]
use radctl_transport::ControlStream;
use tracing::{debug, warn};

use crate::command::{run_command, CommandOutcome, CommandOutput};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::handshake::handshake_client;

/// A connected control socket that has not completed the handshake yet.
///
/// The only thing it can do is [`handshake`](Self::handshake), which yields a
/// [`ControlSession`] ready for commands.
pub struct PendingSession<R, W> {
    reader: ChannelReader<R>,
    writer: ChannelWriter<W>,
    config: SessionConfig,
}

impl<R: Read, W: Write> PendingSession<R, W> {
    /// Wrap the two halves of a connected stream with default configuration.
    pub fn new(reader: R, writer: W) -> Self {
        Self::from_parts(
            ChannelReader::new(reader),
            ChannelWriter::new(writer),
            SessionConfig::default(),
        )
    }

    /// Wrap already-framed halves.
    pub fn from_parts(
        reader: ChannelReader<R>,
        writer: ChannelWriter<W>,
        config: SessionConfig,
    ) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Run the magic-number handshake.
    ///
    /// On any failure the session is consumed and the transport closed, so a
    /// half-negotiated connection can never be reused.
    pub fn handshake(mut self) -> Result<ControlSession<R, W>> {
        if let Err(err) = handshake_client(&mut self.reader, &mut self.writer, self.config.magic) {
            warn!(error = %err, "handshake failed; closing control socket");
            return Err(err);
        }

        Ok(ControlSession {
            reader: self.reader,
            writer: self.writer,
            config: self.config,
        })
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

#[cfg(unix)]
impl PendingSession<ControlStream, ControlStream> {
    /// Split a connected control stream into reader and writer halves and
    /// apply the configured deadlines.
    pub fn from_stream(stream: ControlStream, config: SessionConfig) -> Result<Self> {
        let reader_stream = stream.try_clone()?;
        let frame_config = config.frame_config();
        let reader = ChannelReader::with_config_stream(reader_stream, frame_config.clone())?;
        let writer = ChannelWriter::with_config_stream(stream, frame_config)?;
        Ok(Self::from_parts(reader, writer, config))
    }
}

/// A handshaken control session.
///
/// Commands run strictly one at a time: each call sends the command and
/// reads until the daemon's terminal frame. Wrap the session in a mutex to
/// share it between threads.
pub struct ControlSession<R, W> {
    reader: ChannelReader<R>,
    writer: ChannelWriter<W>,
    config: SessionConfig,
}

impl<R: Read, W: Write> ControlSession<R, W> {
    /// Run one command, forwarding its output to `output`.
    ///
    /// A transport failure aborts the command and is returned as an error;
    /// the session is not closed, but the stream may no longer be usable.
    pub fn run_command<O: CommandOutput + ?Sized>(
        &mut self,
        command: &str,
        output: &mut O,
    ) -> Result<CommandOutcome> {
        run_command(
            &mut self.reader,
            &mut self.writer,
            command,
            self.config.status_byte_order,
            output,
        )
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Release the framed halves of the stream.
    pub fn into_parts(self) -> (ChannelReader<R>, ChannelWriter<W>) {
        (self.reader, self.writer)
    }

    /// Close the session, dropping the transport.
    pub fn close(self) {
        debug!("closing control session");
    }
}

#[cfg(unix)]
impl ControlSession<ControlStream, ControlStream> {
    /// `(uid, gid, pid)` of the daemon, where the platform reports it.
    pub fn peer_credentials(&self) -> Option<(u32, u32, u32)> {
        self.writer.get_ref().peer_credentials()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::net::UnixStream;
    use std::thread;

    use radctl_frame::{Channel, FrameError};

    use super::*;
    use crate::command::CollectedOutput;
    use crate::config::{StatusByteOrder, MAGIC};
    use crate::error::SessionError;
    use crate::handshake::{handshake_payload, HANDSHAKE_CAPACITY};

    type Daemon = (ChannelReader<UnixStream>, ChannelWriter<UnixStream>);

    fn pair() -> (PendingSession<ControlStream, ControlStream>, Daemon) {
        let (left, right) = UnixStream::pair().unwrap();
        let session =
            PendingSession::from_stream(ControlStream::from(left), SessionConfig::default())
                .unwrap();
        let daemon = (
            ChannelReader::new(right.try_clone().unwrap()),
            ChannelWriter::new(right),
        );
        (session, daemon)
    }

    fn accept_handshake(daemon: &mut Daemon) {
        let hello = daemon.0.receive(HANDSHAKE_CAPACITY).unwrap();
        assert_eq!(hello.channel, Channel::InitAck);
        daemon.1.send(Channel::InitAck, &hello.payload).unwrap();
    }

    #[test]
    fn handshake_then_commands_over_socket() {
        let (pending, mut daemon) = pair();

        let server = thread::spawn(move || {
            accept_handshake(&mut daemon);
            for expected in ["show version", "stats client"] {
                let cmd = daemon.0.receive(1024).unwrap();
                assert_eq!(cmd.channel, Channel::Stdin);
                assert_eq!(cmd.payload.as_ref(), expected.as_bytes());
                daemon.1.send(Channel::Stdout, b"line 1\n").unwrap();
                daemon.1.send(Channel::Stdout, b"line 2\n").unwrap();
                daemon
                    .1
                    .send(Channel::CmdStatus, &0u32.to_ne_bytes())
                    .unwrap();
            }
        });

        let mut session = pending.handshake().unwrap();
        for command in ["show version", "stats client"] {
            let mut output = CollectedOutput::default();
            let outcome = session.run_command(command, &mut output).unwrap();
            assert_eq!(outcome, CommandOutcome::Status(0));
            assert_eq!(output.stdout, vec!["line 1", "line 2"]);
        }

        server.join().unwrap();
        session.close();
    }

    #[test]
    fn mismatched_echo_closes_transport() {
        let (pending, mut daemon) = pair();

        let server = thread::spawn(move || {
            let hello = daemon.0.receive(HANDSHAKE_CAPACITY).unwrap();
            let mut reply = hello.payload.to_vec();
            reply[0] ^= 0xFF;
            daemon.1.send(Channel::InitAck, &reply).unwrap();
            // Client must hang up rather than keep the socket open.
            daemon.0.receive(1024).unwrap_err()
        });

        let result = pending.handshake();
        assert!(matches!(
            result,
            Err(SessionError::IncompatibleVersion { .. })
        ));
        assert!(matches!(
            server.join().unwrap(),
            FrameError::ConnectionClosed
        ));
    }

    #[test]
    fn daemon_hangup_during_handshake() {
        let (pending, daemon) = pair();
        drop(daemon);

        let result = pending.handshake();
        assert!(matches!(
            result,
            Err(SessionError::EmptyHandshake) | Err(SessionError::Frame(FrameError::Io(_)))
        ));
    }

    #[test]
    fn stderr_outcome_keeps_session_usable() {
        let (pending, mut daemon) = pair();

        let server = thread::spawn(move || {
            accept_handshake(&mut daemon);
            daemon.0.receive(1024).unwrap();
            daemon.1.send(Channel::Stderr, b"Unknown command\n").unwrap();
            daemon.0.receive(1024).unwrap();
            daemon.1.send(Channel::CmdStatus, &1u32.to_ne_bytes()).unwrap();
        });

        let mut session = pending.handshake().unwrap();
        let mut output = CollectedOutput::default();

        let first = session.run_command("nonsense", &mut output).unwrap();
        assert_eq!(
            first,
            CommandOutcome::Failed {
                message: "Unknown command".to_string()
            }
        );

        let second = session.run_command("help", &mut output).unwrap();
        assert_eq!(second, CommandOutcome::Status(1));

        server.join().unwrap();
    }

    #[test]
    fn custom_magic_and_status_order() {
        let (left, right) = UnixStream::pair().unwrap();
        let config = SessionConfig {
            magic: 0x0102_0304,
            status_byte_order: StatusByteOrder::Big,
            ..SessionConfig::default()
        };
        let pending = PendingSession::from_stream(ControlStream::from(left), config).unwrap();

        let server = thread::spawn(move || {
            let mut reader = ChannelReader::new(right.try_clone().unwrap());
            let mut writer = ChannelWriter::new(right);
            let hello = reader.receive(HANDSHAKE_CAPACITY).unwrap();
            assert_eq!(hello.payload, handshake_payload(0x0102_0304));
            writer.send(Channel::InitAck, &hello.payload).unwrap();
            reader.receive(1024).unwrap();
            writer.send(Channel::CmdStatus, &[0, 0, 0, 7]).unwrap();
        });

        let mut session = pending.handshake().unwrap();
        let outcome = session
            .run_command("x", &mut CollectedOutput::default())
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Status(7));
        assert_ne!(session.config().magic, MAGIC);

        server.join().unwrap();
    }

    #[test]
    fn read_deadline_bounds_silent_daemon() {
        let (left, right) = UnixStream::pair().unwrap();
        let config =
            SessionConfig::default().with_timeout(std::time::Duration::from_millis(50));
        let pending = PendingSession::from_stream(ControlStream::from(left), config).unwrap();

        let server = thread::spawn(move || {
            let mut reader = ChannelReader::new(right.try_clone().unwrap());
            let mut writer = ChannelWriter::new(right);
            let hello = reader.receive(HANDSHAKE_CAPACITY).unwrap();
            writer.send(Channel::InitAck, &hello.payload).unwrap();
            reader.receive(1024).unwrap();
            // Never answer; keep the socket open until the client gives up.
            let _ = reader.receive(1024);
        });

        let mut session = pending.handshake().unwrap();
        let err = session
            .run_command("hang", &mut CollectedOutput::default())
            .unwrap_err();
        assert!(err.is_timeout());

        drop(session);
        server.join().unwrap();
    }

    #[test]
    fn generic_halves_work_without_control_stream() {
        let (left, right) = UnixStream::pair().unwrap();
        let pending = PendingSession::new(left.try_clone().unwrap(), left);

        let server = thread::spawn(move || {
            let mut reader = ChannelReader::new(right.try_clone().unwrap());
            let mut writer = ChannelWriter::new(right);
            let hello = reader.receive(HANDSHAKE_CAPACITY).unwrap();
            writer.send(Channel::InitAck, &hello.payload).unwrap();
        });

        let session = pending.handshake().unwrap();
        let (reader, writer) = session.into_parts();
        assert!(reader.config().read_timeout.is_none());
        assert!(writer.config().write_timeout.is_none());

        server.join().unwrap();
    }
}
