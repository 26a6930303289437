/*
 * @file lib.rs
 * @brief JARVIS library root
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

//! JARVIS - a voice assistant that talks to a microcontroller.
//!
//! This library provides:
//! - Groq's Whisper Large v3 Turbo for speech transcription
//! - Groq (or a local Ollama) chat model for conversation
//! - ElevenLabs or a local command for text-to-speech
//! - a serial link that moves a servo, toggles an LED, and reads
//!   environment sensors
//!
//! The conversation core ([`turn`], [`memory`], [`commands`], [`classifier`])
//! does no audio or device I/O and can be driven from tests with any
//! [`llm::ChatModel`].
//!
//! # Example
//! ```no_run
//! use anyhow::Result;
//! use jarvis::assistant::{self, InputMode, RunOptions};
//! use jarvis::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     dotenv::dotenv().ok();
//!     let options = RunOptions { input: InputMode::Text, hardware: false };
//!     assistant::run_voice_assistant(AppConfig::load("config.json"), options).await
//! }
//! ```

pub mod assistant;
pub mod audio;
pub mod classifier;
pub mod commands;
pub mod config;
pub mod error;
pub mod hardware;
pub mod llm;
pub mod memory;
pub mod sensors;
pub mod speech;
pub mod transcribe;
pub mod turn;
