//! Line-by-line config deployment over a serial console.
//!
//! The port is opened through `serialport` at an explicit baud rate, with a
//! read timeout bounding how long [`LineSender::read_back`] waits for the
//! device.

use std::{
    fmt,
    io::{self, Read, Write},
    thread,
    time::Duration,
};

use serialport::SerialPort;
use tracing::{debug, instrument};

use netgen_core::{
    application::ApplicationError,
    error::{NetgenError, NetgenResult},
};

/// Console default for most switches.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// How long one read waits for the device.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Upper bound on the final read-back, in bytes.
pub const READ_BACK_LIMIT: usize = 1024;

/// Lines worth sending: not blank and not a `!` comment.
pub fn deployable_lines(config: &str) -> impl Iterator<Item = &str> {
    config.lines().map(str::trim_end).filter(|line| {
        let trimmed = line.trim_start();
        !trimmed.is_empty() && !trimmed.starts_with('!')
    })
}

/// Open `port` (e.g. `/dev/ttyUSB0`, `COM3`) at `baud_rate`.
pub fn open_port(port: &str, baud_rate: u32) -> NetgenResult<Box<dyn SerialPort>> {
    serialport::new(port, baud_rate)
        .timeout(READ_TIMEOUT)
        .open()
        .map_err(|e| port_error(port, "open", &e))
}

/// Sends configuration lines with a pause after each one.
pub struct LineSender<P> {
    port: P,
    label: String,
    delay: Duration,
}

impl<P: Write> LineSender<P> {
    /// `label` names the port in error messages.
    pub fn new(port: P, label: impl Into<String>, delay: Duration) -> Self {
        Self {
            port,
            label: label.into(),
            delay,
        }
    }

    /// Send a bare newline to bring up a prompt.
    pub fn wake(&mut self) -> NetgenResult<()> {
        self.write_line("")
    }

    /// Send every deployable line of `config`, calling `on_line` before each
    /// one. Returns the number of lines sent.
    #[instrument(skip_all, fields(port = %self.label))]
    pub fn send_config(&mut self, config: &str, mut on_line: impl FnMut(&str)) -> NetgenResult<usize> {
        let mut sent = 0;
        for line in deployable_lines(config) {
            on_line(line);
            self.write_line(line)?;
            sent += 1;
        }
        debug!(sent, "Configuration sent");
        Ok(sent)
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    fn write_line(&mut self, line: &str) -> NetgenResult<()> {
        self.port
            .write_all(line.as_bytes())
            .and_then(|()| self.port.write_all(b"\n"))
            .and_then(|()| self.port.flush())
            .map_err(|e| port_error(&self.label, "write to", &e))?;
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(())
    }
}

impl<P: Read + Write> LineSender<P> {
    /// Collect whatever the device printed, up to [`READ_BACK_LIMIT`] bytes.
    ///
    /// Stops at the first read that times out or returns nothing. Invalid
    /// UTF-8 is replaced.
    pub fn read_back(&mut self) -> NetgenResult<String> {
        let mut buf = vec![0; READ_BACK_LIMIT];
        let mut filled = 0;
        while filled < buf.len() {
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                    break;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(port_error(&self.label, "read from", &e)),
            }
        }
        buf.truncate(filled);
        debug!(bytes = filled, "Read back device output");
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn port_error(port: &str, operation: &str, e: &dyn fmt::Display) -> NetgenError {
    ApplicationError::SerialPortFailed {
        port: port.to_owned(),
        reason: format!("failed to {operation} port: {e}"),
    }
    .into()
}
