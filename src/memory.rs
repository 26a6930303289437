/*
 * @file memory.rs
 * @brief Persistent session memory for JARVIS conversations
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

//! Session memory: the ordered, role-tagged chat history and its JSON file.

use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::MemoryError;

/// Persona prompt that opens every fresh session history.
const SEED_PERSONA: &str = "You are JARVIS, an advanced AI assistant with a personality inspired by \
Tony Stark's JARVIS. You're witty, intelligent and helpful, with a slight touch of dry humor, and \
you chat naturally on any topic like a knowledgeable friend.\n\n\
You have access to environmental data through sensors and can control a servo motor with natural \
commands:\n\
- \"turn left\" or \"left\" moves to 180 degrees\n\
- \"turn right\" or \"right\" moves to 0 degrees\n\
- \"center\", \"middle\", \"straight\" or \"forward\" moves to 90 degrees\n\
- specific angles can be set with commands like \"turn to 45 degrees\"\n\
- when the user asks you to turn, just confirm briefly\n\n\
When sensor readings or servo confirmations appear as system messages, use them naturally, for \
example \"The room's quite comfortable at 25 degrees\" or \"Rotating to the left position for \
you\".\n\n\
Keep responses concise and natural, under 10-15 words, acknowledging commands and actions taken.\n\n\
If the user asks you to move the servo and no servo confirmation system message is present, end \
your reply with `CMD:POS:<angle>`, where `<angle>` is a whole number from 0 to 180. Otherwise end it \
with `CMD:NO_COMMAND`. Nothing after the command is spoken.";

/// Speaker role attached to every message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by chat APIs and the memory file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged entry of the session history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Creates a message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered chat history backed by a JSON file.
///
/// # Details
/// The first message is always the system persona. Messages are only ever
/// appended in memory; the whole sequence is rewritten to disk by
/// [`SessionMemory::persist`].
#[derive(Debug)]
pub struct SessionMemory {
    path: PathBuf,
    messages: Vec<Message>,
}

impl SessionMemory {
    /// Loads the history stored at `path`, falling back to a fresh seed.
    ///
    /// # Details
    /// A missing, unreadable, or invalid file (not a JSON array of messages,
    /// empty, or not opening with a system message) is replaced by the single
    /// seed message, which is written back immediately. Any failure is logged
    /// and never returned.
    ///
    /// # Arguments
    /// * `path` - Location of the memory file.
    ///
    /// # Returns
    /// * `SessionMemory` - The restored or freshly seeded history.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match read_history(&path) {
            Ok(messages) => {
                tracing::info!(
                    path = %path.display(),
                    messages = messages.len(),
                    "restored chat memory"
                );
                Self { path, messages }
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %format!("{err:#}"),
                    "could not load chat memory, starting fresh"
                );
                let memory = Self {
                    path,
                    messages: vec![Self::seed_message()],
                };
                if let Err(err) = memory.persist() {
                    tracing::error!(error = %err, "failed to write seed chat memory");
                }
                memory
            }
        }
    }

    /// Returns the fixed persona message that opens every new history.
    pub fn seed_message() -> Message {
        Message::system(SEED_PERSONA)
    }

    /// Appends a message in memory without touching the file.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Rewrites the backing file with the full current history.
    ///
    /// # Details
    /// The JSON is written to a sibling temporary file, flushed, and renamed
    /// over the target so readers never observe a half-written history.
    ///
    /// # Errors
    /// Returns [`MemoryError`] if serialization or any filesystem step fails.
    pub fn persist(&self) -> std::result::Result<(), MemoryError> {
        let json = serde_json::to_string_pretty(&self.messages)?;
        let tmp_path = temp_path(&self.path);
        if let Err(source) = write_and_swap(&tmp_path, &self.path, json.as_bytes()) {
            fs::remove_file(&tmp_path).ok();
            return Err(MemoryError::Write {
                path: self.path.clone(),
                source,
            });
        }

        tracing::debug!(
            path = %self.path.display(),
            messages = self.messages.len(),
            "chat memory persisted"
        );
        Ok(())
    }

    /// Drops every message after the first `len`, never removing the seed.
    ///
    /// Used to undo the appends of a turn that failed before completing.
    pub fn rollback_to(&mut self, len: usize) {
        self.messages.truncate(len.max(1));
    }

    /// The full ordered history.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages, including the seed.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always `false` for a loaded memory; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Reads and validates the history file.
fn read_history(path: &Path) -> Result<Vec<Message>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let messages: Vec<Message> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    match messages.first() {
        None => anyhow::bail!("{} holds an empty history", path.display()),
        Some(first) if first.role != Role::System => {
            anyhow::bail!("{} does not start with a system message", path.display())
        }
        Some(_) => Ok(messages),
    }
}

/// Writes `bytes` to `tmp_path`, syncs it, and renames it over `target`.
fn write_and_swap(tmp_path: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp_path, target)
}

/// Sibling path used for the write-then-rename swap.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn memory_path(dir: &TempDir) -> PathBuf {
        dir.path().join("chat_memory.json")
    }

    #[test]
    fn missing_file_seeds_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = memory_path(&dir);

        let memory = SessionMemory::load(&path);

        assert_eq!(memory.messages(), &[SessionMemory::seed_message()]);
        let on_disk: Vec<Message> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, memory.messages());
    }

    #[test]
    fn corrupt_file_is_replaced_by_seed() {
        let dir = TempDir::new().unwrap();
        let path = memory_path(&dir);
        fs::write(&path, "{ not json").unwrap();

        let memory = SessionMemory::load(&path);

        assert_eq!(memory.len(), 1);
        assert_eq!(memory.messages()[0].role, Role::System);
        let reloaded = SessionMemory::load(&path);
        assert_eq!(reloaded.messages(), memory.messages());
    }

    #[test]
    fn empty_array_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = memory_path(&dir);
        fs::write(&path, "[]").unwrap();

        let memory = SessionMemory::load(&path);
        assert_eq!(memory.messages(), &[SessionMemory::seed_message()]);
    }

    #[test]
    fn history_without_leading_system_message_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = memory_path(&dir);
        fs::write(&path, r#"[{"role":"user","content":"hi"}]"#).unwrap();

        let memory = SessionMemory::load(&path);
        assert_eq!(memory.messages(), &[SessionMemory::seed_message()]);
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = memory_path(&dir);
        let mut memory = SessionMemory::load(&path);
        memory.append(Message::system("Servo has been moved to 90 degrees."));
        memory.append(Message::user("center"));
        memory.append(Message::assistant("Centered, sir."));
        memory.persist().unwrap();

        let reloaded = SessionMemory::load(&path);

        assert_eq!(reloaded.messages(), memory.messages());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn append_does_not_touch_disk() {
        let dir = TempDir::new().unwrap();
        let path = memory_path(&dir);
        let mut memory = SessionMemory::load(&path);
        memory.append(Message::user("hello"));

        assert_eq!(SessionMemory::load(&path).len(), 1);
    }

    #[test]
    fn persist_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let memory = SessionMemory {
            path: dir.path().join("missing").join("chat_memory.json"),
            messages: vec![SessionMemory::seed_message()],
        };
        assert!(matches!(memory.persist(), Err(MemoryError::Write { .. })));
    }

    #[test]
    fn failed_swap_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = memory_path(&dir);
        fs::create_dir(&path).unwrap();
        let memory = SessionMemory {
            path: path.clone(),
            messages: vec![SessionMemory::seed_message()],
        };

        assert!(matches!(memory.persist(), Err(MemoryError::Write { .. })));
        assert!(!temp_path(&path).exists());
        assert!(path.is_dir());
    }

    #[test]
    fn rollback_keeps_seed() {
        let dir = TempDir::new().unwrap();
        let mut memory = SessionMemory::load(memory_path(&dir));
        memory.append(Message::user("one"));
        memory.append(Message::user("two"));

        memory.rollback_to(2);
        assert_eq!(memory.len(), 2);
        memory.rollback_to(0);
        assert_eq!(memory.messages(), &[SessionMemory::seed_message()]);
    }

    #[test]
    fn seed_persona_teaches_reply_directives() {
        let seed = SessionMemory::seed_message();
        assert!(seed.content.contains("CMD:POS:<angle>"));
        assert!(seed.content.contains("CMD:NO_COMMAND"));
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&Message::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
