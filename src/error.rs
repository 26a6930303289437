/*
 * @file error.rs
 * @brief Typed error kinds for the JARVIS core
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

//! Error types shared by the conversation core and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while writing the persisted chat memory.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The history could not be encoded as JSON.
    #[error("failed to serialize chat memory: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backing file could not be written or swapped into place.
    #[error("failed to write chat memory to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the serial link to the microcontroller.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The serial device could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// The driver could not report how many bytes are waiting.
    #[error("failed to query input buffer: {0}")]
    Query(#[source] serialport::Error),

    /// A read or write on the open port failed.
    #[error("serial i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Hardware is disabled for this session.
    #[error("hardware not connected")]
    Disconnected,
}

/// Outcomes of polling the sensor line that are not a reading.
#[derive(Debug, Error)]
pub enum SensorError {
    /// Nothing is buffered on the link yet.
    #[error("no sensor data ready")]
    NoData,

    /// A line arrived but did not match `temp,humidity,gas,aqi,quality`.
    #[error("malformed sensor line: {0:?}")]
    Malformed(String),

    /// The serial device itself failed.
    #[error("sensor device error: {0}")]
    Device(#[from] LinkError),
}

/// Failures reported by the servo/LED actuator.
#[derive(Debug, Error)]
pub enum ActuatorError {
    /// Servo angles must stay within 0..=180 degrees.
    #[error("angle {0} is outside 0..=180 degrees")]
    OutOfRange(u8),

    /// The serial device could not be opened or written.
    #[error("actuator device error: {0}")]
    Device(#[from] LinkError),
}

/// Failures from the hosted chat model.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Required credentials are missing.
    #[error("LLM configuration error: {0}")]
    Config(String),

    /// The request never produced a response.
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("LLM service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response did not contain a reply.
    #[error("LLM response contained no reply")]
    EmptyReply,
}

/// Failures from the speech-to-text service.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// Required credentials are missing.
    #[error("transcription configuration error: {0}")]
    Config(String),

    /// The audio file could not be read.
    #[error("failed to read audio: {0}")]
    Io(#[from] std::io::Error),

    /// The request never produced a response.
    #[error("transcription request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("transcription service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Failures from text-to-speech synthesis or playback.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Nothing to say.
    #[error("cannot speak empty text")]
    EmptyText,

    /// Required credentials are missing.
    #[error("speech configuration error: {0}")]
    Config(String),

    /// The synthesis request failed.
    #[error("speech request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("speech service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The player or speech command could not run.
    #[error("playback failed: {0}")]
    Playback(String),

    /// The temporary audio file could not be written.
    #[error("speech io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a conversation turn.
#[derive(Debug, Error)]
pub enum TurnError {
    /// The chat model failed; the turn was rolled back.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The reply was produced but the history could not be saved.
    #[error("reply produced but chat memory was not saved: {source}")]
    Persist {
        reply: String,
        #[source]
        source: MemoryError,
    },
}
