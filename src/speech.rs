//! Text-to-speech functionality module.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;

use crate::config::{AppConfig, TtsBackend};
use crate::error::SpeechError;

/// ElevenLabs synthesis endpoint; the voice id is appended.
const ELEVENLABS_TTS_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";

/// File the synthesized MP3 is written to before playback.
const SPEECH_FILE: &str = "jarvis_speech.mp3";

/// Voice tuning sent with every ElevenLabs request.
#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Hosted ElevenLabs voice plus the local player that plays its audio.
pub struct ElevenLabsVoice {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    model_id: String,
    output_format: String,
    player: Vec<String>,
}

/// Speaks replies out loud.
pub enum Speaker {
    /// Synthesize with ElevenLabs and play through an external player.
    ElevenLabs(ElevenLabsVoice),
    /// Hand the text to a local speech command (`espeak`, `say`, ...).
    Command(Vec<String>),
}

impl Speaker {
    /// Builds the speaker selected in `config`.
    ///
    /// # Errors
    /// Returns `SpeechError::Config` when ElevenLabs is selected without an
    /// API key or a command line is empty.
    pub fn from_config(config: &AppConfig) -> Result<Self, SpeechError> {
        match config.tts_backend {
            TtsBackend::ElevenLabs => {
                let api_key = config.elevenlabs_api_key.clone().ok_or_else(|| {
                    SpeechError::Config("ELEVENLABS_API_KEY is not set".to_string())
                })?;
                require_program(&config.player_command)?;
                Ok(Speaker::ElevenLabs(ElevenLabsVoice {
                    client: reqwest::Client::new(),
                    api_key,
                    voice_id: config.voice_id.clone(),
                    model_id: config.tts_model.clone(),
                    output_format: config.tts_output_format.clone(),
                    player: config.player_command.clone(),
                }))
            }
            TtsBackend::Command => {
                require_program(&config.speak_command)?;
                Ok(Speaker::Command(config.speak_command.clone()))
            }
        }
    }

    /// Speaks `text` and returns once playback has finished.
    ///
    /// # Errors
    /// Returns an error for empty text, failed synthesis, or a player that
    /// cannot run or exits unsuccessfully.
    pub async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        match self {
            Speaker::ElevenLabs(voice) => {
                let path = voice.synthesize(text).await?;
                let mut args = voice.player.clone();
                args.push(path.to_string_lossy().into_owned());
                let result = run_program(&args).await;
                std::fs::remove_file(&path).ok();
                result
            }
            Speaker::Command(command) => {
                let mut args = command.clone();
                args.push(text.to_string());
                run_program(&args).await
            }
        }
    }
}

impl ElevenLabsVoice {
    /// Fetches MP3 audio for `text` and stores it in the temp directory.
    async fn synthesize(&self, text: &str) -> Result<PathBuf, SpeechError> {
        let request = SynthesisRequest {
            text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings {
                stability: 0.0,
                similarity_boost: 1.0,
                style: 0.0,
                use_speaker_boost: true,
            },
        };
        tracing::debug!(chars = text.len(), voice = %self.voice_id, "requesting speech synthesis");
        let response = self
            .client
            .post(format!("{}/{}", ELEVENLABS_TTS_URL, self.voice_id))
            .query(&[("output_format", self.output_format.as_str())])
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let audio = response.bytes().await?;
        let path = std::env::temp_dir().join(SPEECH_FILE);
        write_audio(&path, &audio)?;
        Ok(path)
    }
}

fn write_audio(path: &Path, audio: &[u8]) -> Result<(), SpeechError> {
    std::fs::write(path, audio)?;
    Ok(())
}

fn require_program(command: &[String]) -> Result<(), SpeechError> {
    if command.first().map_or(true, |program| program.trim().is_empty()) {
        return Err(SpeechError::Config("speech command is empty".to_string()));
    }
    Ok(())
}

/// Runs `args[0]` with the remaining arguments and waits for it to exit.
async fn run_program(args: &[String]) -> Result<(), SpeechError> {
    if cfg!(test) {
        if *FORCE_ERROR.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(SpeechError::Playback("Forced failure for testing".to_string()));
        }
        return Ok(());
    }

    let (program, rest) = args
        .split_first()
        .ok_or_else(|| SpeechError::Config("speech command is empty".to_string()))?;
    let status = tokio::process::Command::new(program)
        .args(rest)
        .status()
        .await
        .map_err(|err| SpeechError::Playback(format!("failed to run {}: {}", program, err)))?;
    if !status.success() {
        return Err(SpeechError::Playback(format!("{} exited with {}", program, status)));
    }
    Ok(())
}

#[cfg_attr(not(test), allow(dead_code))]
static FORCE_ERROR: Mutex<bool> = Mutex::new(false);
