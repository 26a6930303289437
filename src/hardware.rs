/*
 * @file hardware.rs
 * @brief UART link to the servo, LED and sensor microcontroller
 * @author Kevin Thomas
 * @date 2025
 *
 * MIT License
 *
 * Copyright (c) 2025 Kevin Thomas
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Serial link to the microcontroller that drives the servo and LED and
//! reports environment sensor lines.

use std::io::{Read, Write};
use std::time::Duration;

use chrono::Local;
use serialport::SerialPort;

use crate::commands::{Command, MAX_SERVO_ANGLE};
use crate::error::{ActuatorError, LinkError, SensorError};
use crate::sensors::SensorReading;

/// Read timeout so a silent board never stalls the conversation loop.
const SERIAL_TIMEOUT: Duration = Duration::from_secs(1);

/// Time for the board to reset after the port opens (DTR toggle).
const BOARD_RESET_DELAY: Duration = Duration::from_secs(2);

/// Pause after each command so the servo can start moving.
const COMMAND_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Upper bound on buffered, not yet terminated sensor text.
const MAX_PENDING_BYTES: usize = 4096;

/// Something that can carry out a hardware [`Command`].
pub trait Actuator {
    /// Executes the command.
    ///
    /// # Errors
    /// Returns [`ActuatorError`] for invalid angles or device failures.
    fn apply(&mut self, command: Command) -> Result<(), ActuatorError>;
}

/// Something that can be polled for environment readings.
pub trait SensorSource {
    /// Returns the newest complete reading, if one has arrived.
    ///
    /// # Errors
    /// * `SensorError::NoData` - nothing new is buffered.
    /// * `SensorError::Malformed` - the newest line could not be parsed.
    /// * `SensorError::Device` - the link failed.
    fn poll(&mut self) -> Result<SensorReading, SensorError>;
}

impl<T: Actuator + ?Sized> Actuator for Box<T> {
    fn apply(&mut self, command: Command) -> Result<(), ActuatorError> {
        (**self).apply(command)
    }
}

impl<T: SensorSource + ?Sized> SensorSource for Box<T> {
    fn poll(&mut self) -> Result<SensorReading, SensorError> {
        (**self).poll()
    }
}

/// Checks that a command is safe to send to the board.
///
/// # Errors
/// Returns `ActuatorError::OutOfRange` for servo angles above 180 degrees.
pub fn validate(command: Command) -> Result<Command, ActuatorError> {
    match command {
        Command::ServoPosition(angle) if angle > MAX_SERVO_ANGLE => {
            Err(ActuatorError::OutOfRange(angle))
        }
        _ => Ok(command),
    }
}

/// Encodes a command as the text line the firmware expects.
///
/// # Returns
/// * `Some(line)` - `"{angle}\n"` for the servo, `"ON\n"`/`"OFF\n"` for the LED.
/// * `None` - `Command::None` has no wire form.
pub fn wire_line(command: Command) -> Option<String> {
    match command {
        Command::None => None,
        Command::ServoPosition(angle) => Some(format!("{}\n", angle)),
        Command::LedState(true) => Some("ON\n".to_string()),
        Command::LedState(false) => Some("OFF\n".to_string()),
    }
}

/// Serial connection to the microcontroller, opened on first use.
///
/// # Details
/// One port carries both directions: command lines out, sensor CSV lines in.
/// Opening is deferred so the assistant can start even while the board is
/// unplugged; every call retries the open until it succeeds.
pub struct SerialController {
    path: String,
    baud: u32,
    port: Option<Box<dyn SerialPort>>,
    pending: String,
}

impl SerialController {
    /// Creates a controller for `path` at `baud` without opening it yet.
    pub fn new(path: impl Into<String>, baud: u32) -> Self {
        Self {
            path: path.into(),
            baud,
            port: None,
            pending: String::new(),
        }
    }

    fn ensure_port(&mut self) -> Result<&mut Box<dyn SerialPort>, LinkError> {
        if self.port.is_none() {
            let mut port = serialport::new(&self.path, self.baud)
                .timeout(SERIAL_TIMEOUT)
                .open()
                .map_err(|source| LinkError::Open {
                    path: self.path.clone(),
                    source,
                })?;
            let _ = port.write_data_terminal_ready(true);
            std::thread::sleep(BOARD_RESET_DELAY);
            tracing::info!(path = %self.path, baud = self.baud, "serial link open");
            self.port = Some(port);
        }
        self.port.as_mut().ok_or(LinkError::Disconnected)
    }

    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        let result = self.ensure_port().and_then(|port| {
            port.write_all(line.as_bytes())?;
            port.flush()?;
            Ok(())
        });
        if result.is_err() {
            // Force a reopen next time; the board may have been replugged.
            self.port = None;
        }
        result
    }

    fn read_available(&mut self) -> Result<(), LinkError> {
        let port = self.ensure_port()?;
        let waiting = port.bytes_to_read().map_err(LinkError::Query)?;
        if waiting == 0 {
            return Ok(());
        }
        let mut buf = vec![0_u8; waiting as usize];
        let read = port.read(&mut buf)?;
        self.pending.push_str(&String::from_utf8_lossy(&buf[..read]));
        if self.pending.len() > MAX_PENDING_BYTES {
            tracing::warn!(bytes = self.pending.len(), "discarding unterminated sensor data");
            self.pending.clear();
        }
        Ok(())
    }
}

impl Actuator for SerialController {
    fn apply(&mut self, command: Command) -> Result<(), ActuatorError> {
        let Some(line) = wire_line(validate(command)?) else {
            return Ok(());
        };
        tracing::debug!(command = %command, "sending to microcontroller");
        self.write_line(&line)?;
        std::thread::sleep(COMMAND_SETTLE_DELAY);
        tracing::info!(command = %command, "command sent");
        Ok(())
    }
}

impl SensorSource for SerialController {
    fn poll(&mut self) -> Result<SensorReading, SensorError> {
        if let Err(err) = self.read_available() {
            self.port = None;
            return Err(err.into());
        }
        let line = take_latest_line(&mut self.pending).ok_or(SensorError::NoData)?;
        SensorReading::parse_line(&line, Local::now())
    }
}

/// Stand-in used when hardware is disabled or unavailable.
///
/// Commands are refused and polling never yields data.
#[derive(Debug, Default)]
pub struct Offline;

impl Actuator for Offline {
    fn apply(&mut self, command: Command) -> Result<(), ActuatorError> {
        if validate(command)?.is_none() {
            return Ok(());
        }
        Err(LinkError::Disconnected.into())
    }
}

impl SensorSource for Offline {
    fn poll(&mut self) -> Result<SensorReading, SensorError> {
        Err(SensorError::NoData)
    }
}

/// Removes every complete line from `pending` and returns the newest
/// non-blank one, keeping any unterminated tail for the next poll.
fn take_latest_line(pending: &mut String) -> Option<String> {
    let end = pending.rfind('\n')?;
    let complete: String = pending.drain(..=end).collect();
    complete
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(str::to_string)
}
