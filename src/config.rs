/*
 * @file config.rs
 * @brief Runtime configuration for JARVIS
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

//! Configuration loaded from `config.json` and the environment.

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Path to the JSON configuration file that holds runtime defaults.
pub const CONFIG_PATH: &str = "config.json";

/// Which chat service answers the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    #[default]
    Groq,
    Ollama,
}

/// Which text-to-speech path speaks the reply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsBackend {
    /// ElevenLabs synthesis played through `player_command`.
    #[default]
    ElevenLabs,
    /// A local speech command such as `espeak` or `say`.
    Command,
}

/// Strongly typed representation of `config.json`.
///
/// # Details
/// Every field has a default, so a partial or missing file is fine. API keys
/// are never read from the file, only from the environment.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub memory_file: String,
    pub serial_port: String,
    pub serial_baud: u32,
    pub llm_backend: LlmBackend,
    pub llm_model: String,
    pub whisper_model: String,
    pub tts_backend: TtsBackend,
    pub voice_id: String,
    pub tts_model: String,
    pub tts_output_format: String,
    pub player_command: Vec<String>,
    pub speak_command: Vec<String>,
    pub record_seconds: u64,
    pub silence_rms_threshold: f32,
    #[serde(skip)]
    pub groq_api_key: Option<String>,
    #[serde(skip)]
    pub elevenlabs_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            memory_file: "chat_memory.json".to_string(),
            serial_port: "/dev/ttyUSB0".to_string(),
            serial_baud: 9600,
            llm_backend: LlmBackend::Groq,
            llm_model: "llama-3.3-70b-versatile".to_string(),
            whisper_model: "whisper-large-v3-turbo".to_string(),
            tts_backend: TtsBackend::ElevenLabs,
            voice_id: "pNInz6obpgDQGcFmaJgB".to_string(),
            tts_model: "eleven_turbo_v2_5".to_string(),
            tts_output_format: "mp3_22050_32".to_string(),
            player_command: vec!["mpg123".to_string(), "-q".to_string()],
            speak_command: vec!["espeak".to_string()],
            record_seconds: 5,
            silence_rms_threshold: 150.0,
            groq_api_key: None,
            elevenlabs_api_key: None,
        }
    }
}

impl AppConfig {
    /// Loads `path`, then applies environment overrides.
    ///
    /// # Details
    /// A missing or unparsable file is logged and replaced by defaults; it
    /// never stops the assistant from starting.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let mut config = Self::from_file(path.as_ref());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn from_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(cfg) => cfg,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "config parse error, using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "no config file, using defaults");
                Self::default()
            }
        }
    }

    /// Overrides fields from environment variables resolved by `lookup`.
    ///
    /// Unparsable numeric or backend values are ignored with a warning.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        self.groq_api_key = non_empty("GROQ_API_KEY");
        self.elevenlabs_api_key = non_empty("ELEVENLABS_API_KEY");
        if let Some(port) = non_empty("JARVIS_SERIAL_PORT") {
            self.serial_port = port;
        }
        if let Some(baud) = non_empty("JARVIS_SERIAL_BAUD") {
            match baud.parse() {
                Ok(baud) => self.serial_baud = baud,
                Err(_) => tracing::warn!(value = %baud, "ignoring invalid JARVIS_SERIAL_BAUD"),
            }
        }
        if let Some(file) = non_empty("JARVIS_MEMORY_FILE") {
            self.memory_file = file;
        }
        if let Some(model) = non_empty("JARVIS_LLM_MODEL") {
            self.llm_model = model;
        }
        if let Some(backend) = non_empty("JARVIS_LLM_BACKEND") {
            match backend.to_lowercase().as_str() {
                "groq" => self.llm_backend = LlmBackend::Groq,
                "ollama" => self.llm_backend = LlmBackend::Ollama,
                other => tracing::warn!(value = %other, "ignoring unknown JARVIS_LLM_BACKEND"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"serial_port":"/dev/ttyACM0"}"#).unwrap();
        assert_eq!(cfg.serial_port, "/dev/ttyACM0");
        assert_eq!(cfg.serial_baud, 9600);
        assert_eq!(cfg.memory_file, "chat_memory.json");
    }

    #[test]
    fn backends_parse_lowercase() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"llm_backend":"ollama","tts_backend":"command"}"#).unwrap();
        assert_eq!(cfg.llm_backend, LlmBackend::Ollama);
        assert_eq!(cfg.tts_backend, TtsBackend::Command);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = AppConfig::from_file(Path::new("/definitely/not/here/config.json"));
        assert_eq!(cfg.llm_model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("JARVIS_SERIAL_BAUD", "115200"),
            ("JARVIS_LLM_BACKEND", "Ollama"),
            ("JARVIS_MEMORY_FILE", "/tmp/mem.json"),
        ]));
        assert_eq!(cfg.groq_api_key.as_deref(), Some("gsk_test"));
        assert_eq!(cfg.serial_baud, 115_200);
        assert_eq!(cfg.llm_backend, LlmBackend::Ollama);
        assert_eq!(cfg.memory_file, "/tmp/mem.json");
        assert_eq!(cfg.elevenlabs_api_key, None);
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[("JARVIS_SERIAL_BAUD", "fast"), ("JARVIS_LLM_BACKEND", "gpt")]));
        assert_eq!(cfg.serial_baud, 9600);
        assert_eq!(cfg.llm_backend, LlmBackend::Groq);
    }
}
