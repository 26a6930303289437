/*
 * @file turn.rs
 * @brief Conversation turn orchestration
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

//! One utterance in, one reply out: context merging, the chat call, and
//! persistence of the session history.

use crate::classifier::classify;
use crate::error::TurnError;
use crate::llm::ChatModel;
use crate::memory::{Message, SessionMemory};
use crate::sensors::SensorReading;

/// Hardware facts gathered by the caller before the turn runs.
#[derive(Clone, Debug, Default)]
pub struct TurnContext {
    /// Latest sensor snapshot, if one was available.
    pub sensor: Option<SensorReading>,
    /// Angle the servo was moved to during this turn, if it moved.
    pub servo_moved_to: Option<u8>,
}

/// Drives conversation turns against a chat model, owning the history.
///
/// # Details
/// Turns run strictly one after another. Each turn appends optional context
/// messages, the user message, and the assistant reply, then rewrites the
/// memory file. A failed chat call rolls the in-memory history back to where
/// the turn started and leaves the file untouched.
pub struct Conversation<M> {
    memory: SessionMemory,
    model: M,
}

impl<M: ChatModel> Conversation<M> {
    /// Creates an orchestrator over an already loaded memory.
    pub fn new(memory: SessionMemory, model: M) -> Self {
        Self { memory, model }
    }

    /// Runs one complete turn for `text`.
    ///
    /// # Details
    /// 1. Classifies `text`.
    /// 2. Adds a sensor summary system message when the utterance asks about
    ///    the environment and a reading is available.
    /// 3. Adds a servo confirmation system message when the servo moved.
    /// 4. Adds the user message.
    /// 5. Sends the whole history to the chat model.
    /// 6. Adds the assistant reply.
    /// 7. Persists the history.
    ///
    /// # Arguments
    /// * `text` - The recognized utterance.
    /// * `context` - Sensor and servo facts for this turn.
    ///
    /// # Returns
    /// * `Ok(String)` - The reply, ready for speech synthesis.
    ///
    /// # Errors
    /// * `TurnError::Llm` - the model failed; history is rolled back.
    /// * `TurnError::Persist` - carries the reply; it is kept in memory but
    ///   the file still holds the previous turn.
    pub async fn run_turn(&mut self, text: &str, context: &TurnContext) -> Result<String, TurnError> {
        let query = classify(text);
        let checkpoint = self.memory.len();

        if query.needs_environment {
            if let Some(reading) = &context.sensor {
                self.memory.append(Message::system(reading.context_summary()));
            }
        }
        if let Some(angle) = context.servo_moved_to {
            self.memory.append(Message::system(servo_confirmation(angle)));
        }
        self.memory.append(Message::user(text));

        let reply = match self.model.complete(self.memory.messages()).await {
            Ok(reply) => reply,
            Err(err) => {
                let added = self.memory.len() - checkpoint;
                self.memory.rollback_to(checkpoint);
                tracing::warn!(error = %err, discarded = added, "chat call failed, turn rolled back");
                return Err(err.into());
            }
        };

        self.memory.append(Message::assistant(reply.clone()));
        if let Err(source) = self.memory.persist() {
            return Err(TurnError::Persist { reply, source });
        }
        tracing::debug!(messages = self.memory.len(), "turn complete");
        Ok(reply)
    }

    /// Read access to the session history.
    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    /// Read access to the chat model.
    pub fn model(&self) -> &M {
        &self.model
    }
}

/// System message recording a completed servo move.
fn servo_confirmation(angle: u8) -> String {
    format!("Servo has been moved to {} degrees.", angle)
}
