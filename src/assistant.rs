/*
 * @file assistant.rs
 * @brief Implementation of the JARVIS voice-assistant runtime
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

//! Voice assistant runtime: listen, extract commands, converse, speak.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::audio::{contains_speech, record_audio, save_wav};
use crate::classifier::{classify, QueryContext};
use crate::commands::{
    extract_led_command, extract_servo_command, normalize_utterance, split_reply_directive,
    Command,
};
use crate::config::{AppConfig, LlmBackend};
use crate::error::{SensorError, TurnError};
use crate::hardware::{Actuator, Offline, SensorSource, SerialController};
use crate::llm::{ChatModel, GroqChat, OllamaChat};
use crate::memory::SessionMemory;
use crate::sensors::SensorReading;
use crate::speech::Speaker;
use crate::transcribe::{Transcriber, Transcript};
use crate::turn::{Conversation, TurnContext};

/// Temporary file used for passing audio samples to Whisper.
///
/// The file lives only for the duration of a single loop iteration
/// and is removed automatically by [`TempAudioGuard`].
const TEMP_AUDIO_FILE: &str = "jarvis_utterance.wav";

/// Delay inserted before each recording so the listener has time to prepare.
const PRE_RECORD_DELAY: Duration = Duration::from_millis(200);

/// Back-off after the microphone fails to open.
const MIC_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Utterances that end the session when spoken on their own.
const QUIT_PHRASES: &[&str] = &["exit", "quit", "stop"];

/// Line spoken when recognition produced nothing usable.
const NOT_HEARD_REPLY: &str = "I didn't quite catch that. Could you please repeat?";

/// How the assistant receives utterances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Record from the microphone and transcribe.
    Voice,
    /// Read one utterance per line from stdin.
    Text,
}

/// Launch options decided on the command line.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub input: InputMode,
    pub hardware: bool,
}

/// Anything that can both actuate commands and report sensor readings.
pub trait Hardware: Actuator + SensorSource {}

impl<T: Actuator + SensorSource> Hardware for T {}

/// Runs the assistant loop until a quit phrase, end of input, or Ctrl-C.
///
/// # Errors
/// Returns an error only if the chat model or speech output cannot be set
/// up before the loop starts. Failures inside the loop are logged and the
/// loop carries on.
pub async fn run_voice_assistant(config: AppConfig, options: RunOptions) -> Result<()> {
    let mut runtime = JarvisRuntime::new(&config, &options)?;
    println!("JARVIS: At your service. How may I assist you today?");
    tokio::select! {
        result = runtime.run_loop() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }
    println!("JARVIS: Shutting down. Goodbye!");
    Ok(())
}

/// Builds the chat model selected in `config`.
///
/// # Errors
/// Fails when Groq is selected and no API key is configured.
pub fn build_chat_model(config: &AppConfig) -> Result<Box<dyn ChatModel>> {
    let model: Box<dyn ChatModel> = match config.llm_backend {
        LlmBackend::Groq => Box::new(GroqChat::new(
            config.groq_api_key.clone().unwrap_or_default(),
            config.llm_model.clone(),
        )?),
        LlmBackend::Ollama => Box::new(OllamaChat::new(config.llm_model.clone())),
    };
    Ok(model)
}

/// Where utterances come from.
enum Input {
    Voice {
        transcriber: Transcriber,
        record_for: Duration,
        silence_threshold: f32,
    },
    Text(Lines<BufReader<Stdin>>),
}

impl Input {
    fn is_voice(&self) -> bool {
        matches!(self, Input::Voice { .. })
    }
}

/// Line shown and spoken when the chat model could not answer.
const LLM_UNAVAILABLE_REPLY: &str = "I'm having trouble reaching my language model right now.";

/// Runtime container that owns the responder and the session's I/O.
///
/// # Details
/// Holds the responder (and through it the conversation and the
/// microcontroller link), the speech output, and the input source for the
/// whole session.
struct JarvisRuntime {
    responder: Responder<Box<dyn ChatModel>, Box<dyn Hardware>>,
    speaker: Option<Speaker>,
    input: Input,
}

impl JarvisRuntime {
    /// Creates a runtime from configuration.
    ///
    /// # Errors
    /// Propagates chat model, transcriber, or (voice mode) speaker setup
    /// failures.
    fn new(config: &AppConfig, options: &RunOptions) -> Result<Self> {
        let memory = SessionMemory::load(&config.memory_file);
        let conversation = Conversation::new(memory, build_chat_model(config)?);

        let hardware: Box<dyn Hardware> = if options.hardware {
            Box::new(SerialController::new(&config.serial_port, config.serial_baud))
        } else {
            tracing::info!("hardware disabled, commands will be skipped");
            Box::new(Offline)
        };

        let speaker = match (Speaker::from_config(config), options.input) {
            (Ok(speaker), _) => Some(speaker),
            (Err(err), InputMode::Text) => {
                tracing::warn!(error = %err, "speech output unavailable, replies will only be printed");
                None
            }
            (Err(err), InputMode::Voice) => {
                return Err(err).context("Failed to set up speech output");
            }
        };

        let input = match options.input {
            InputMode::Voice => Input::Voice {
                transcriber: Transcriber::new(
                    config.groq_api_key.clone().unwrap_or_default(),
                    config.whisper_model.clone(),
                )
                .context("Failed to set up speech recognition")?,
                record_for: Duration::from_secs(config.record_seconds),
                silence_threshold: config.silence_rms_threshold,
            },
            InputMode::Text => Input::Text(BufReader::new(tokio::io::stdin()).lines()),
        };

        Ok(Self {
            responder: Responder::new(conversation, hardware),
            speaker,
            input,
        })
    }

    /// Continuously runs the assistant until a quit phrase is detected.
    async fn run_loop(&mut self) -> Result<()> {
        while self.process_iteration().await? {}
        Ok(())
    }

    /// Executes one listen-respond iteration.
    ///
    /// # Returns
    /// * `Ok(true)` to keep looping, `Ok(false)` to exit gracefully.
    async fn process_iteration(&mut self) -> Result<bool> {
        let Some(heard) = self.next_utterance().await? else {
            return Ok(false);
        };
        let text = match heard {
            Transcript::Text(text) => text,
            Transcript::NoMatch => {
                println!("JARVIS: {}", NOT_HEARD_REPLY);
                return Ok(true);
            }
        };
        if self.input.is_voice() {
            println!("You: {}", text);
        }
        if should_quit(&text) {
            return Ok(false);
        }
        let spoken = self.responder.respond(&text).await;
        println!("JARVIS: {}", spoken);
        self.speak_response(&spoken).await;
        Ok(true)
    }

    /// Waits for the next utterance.
    ///
    /// # Returns
    /// * `Ok(Some(transcript))` - something was heard (possibly nothing usable).
    /// * `Ok(None)` - text input reached end of file.
    async fn next_utterance(&mut self) -> Result<Option<Transcript>> {
        match &mut self.input {
            Input::Text(lines) => {
                print!("You: ");
                std::io::stdout().flush().ok();
                let line = lines.next_line().await.context("Failed to read stdin")?;
                Ok(line.map(|line| {
                    let line = line.trim();
                    if line.is_empty() {
                        Transcript::NoMatch
                    } else {
                        Transcript::Text(line.to_string())
                    }
                }))
            }
            Input::Voice {
                transcriber,
                record_for,
                silence_threshold,
            } => loop {
                if let Some(heard) = listen(transcriber, *record_for, *silence_threshold).await {
                    return Ok(Some(heard));
                }
            },
        }
    }

    /// Speaks the response, logging failures.
    async fn speak_response(&self, response: &str) {
        let Some(speaker) = &self.speaker else {
            return;
        };
        if response.trim().is_empty() {
            return;
        }
        if let Err(err) = speaker.speak(response).await {
            tracing::error!(error = %err, "TTS error");
        }
    }
}

/// Turns one recognized utterance into hardware actions and a reply.
///
/// # Details
/// Owns the conversation and the hardware link, plus the last good sensor
/// reading so a poll with nothing new still gives the model context.
struct Responder<M, H> {
    conversation: Conversation<M>,
    hardware: H,
    last_reading: Option<SensorReading>,
}

impl<M: ChatModel, H: Hardware> Responder<M, H> {
    fn new(conversation: Conversation<M>, hardware: H) -> Self {
        Self {
            conversation,
            hardware,
            last_reading: None,
        }
    }

    /// Runs command extraction and the conversation turn for `text`.
    ///
    /// # Details
    /// The utterance is classified exactly as the conversation turn will
    /// classify it, so the sensor poll and the sensor context message always
    /// agree. Commands are extracted from the normalized text.
    ///
    /// # Returns
    /// * `String` - The reply to speak, with any `CMD:` directive removed.
    async fn respond(&mut self, text: &str) -> String {
        let query = classify(text);
        let normalized = normalize_utterance(text);

        let context = TurnContext {
            sensor: self.sensor_context(&query),
            servo_moved_to: self.act_on_utterance(&normalized, &query),
        };

        let reply = match self.conversation.run_turn(text, &context).await {
            Ok(reply) => reply,
            Err(TurnError::Persist { reply, source }) => {
                tracing::error!(error = %source, "chat memory not saved");
                reply
            }
            Err(err) => {
                tracing::error!(error = %err, "conversation turn failed");
                return LLM_UNAVAILABLE_REPLY.to_string();
            }
        };

        let (spoken, directive) = split_reply_directive(&reply);
        if let Command::ServoPosition(angle) = directive {
            if context.servo_moved_to != Some(angle) {
                self.apply_command(directive);
            }
        }
        spoken
    }

    /// Polls sensors when the utterance is about the environment.
    ///
    /// Falls back to the last good reading when nothing new has arrived.
    fn sensor_context(&mut self, query: &QueryContext) -> Option<SensorReading> {
        if !query.needs_environment {
            return None;
        }
        match self.hardware.poll() {
            Ok(reading) => {
                tracing::debug!(temperature = reading.temperature, aqi = reading.aqi, "sensor reading");
                self.last_reading = Some(reading);
            }
            Err(SensorError::NoData) => tracing::debug!("no new sensor data"),
            Err(err) => tracing::warn!(error = %err, "sensor read skipped"),
        }
        self.last_reading.clone()
    }

    /// Extracts and executes a hardware command from the utterance.
    ///
    /// # Returns
    /// * `Some(angle)` - the servo was moved to `angle`.
    /// * `None` - no servo move happened.
    fn act_on_utterance(&mut self, normalized: &str, query: &QueryContext) -> Option<u8> {
        let mut command = Command::None;
        if query.needs_servo {
            command = extract_servo_command(normalized);
        }
        if command.is_none() {
            command = extract_led_command(normalized);
        }
        match command {
            Command::ServoPosition(angle) if self.apply_command(command) => Some(angle),
            Command::LedState(_) => {
                self.apply_command(command);
                None
            }
            _ => None,
        }
    }

    /// Sends a command to the actuator, logging failures.
    ///
    /// # Returns
    /// * `bool` - `true` when the actuator accepted the command.
    fn apply_command(&mut self, command: Command) -> bool {
        match self.hardware.apply(command) {
            Ok(()) => {
                tracing::info!(command = %command, "hardware command executed");
                true
            }
            Err(err) => {
                tracing::warn!(command = %command, error = %err, "hardware command failed");
                false
            }
        }
    }
}

/// Records one utterance and transcribes it.
///
/// # Returns
/// * `Some(transcript)` - audio with speech reached the recognizer.
/// * `None` - silence or a microphone problem; the caller listens again.
async fn listen(
    transcriber: &Transcriber,
    record_for: Duration,
    silence_threshold: f32,
) -> Option<Transcript> {
    announce_listening().await;
    let samples = match tokio::task::spawn_blocking(move || record_audio(record_for)).await {
        Ok(Ok(samples)) => samples,
        Ok(Err(err)) => {
            tracing::warn!(error = %format!("{err:#}"), "microphone error");
            tokio::time::sleep(MIC_RETRY_DELAY).await;
            return None;
        }
        Err(err) => {
            tracing::warn!(error = %err, "recording task failed");
            return None;
        }
    };
    if !contains_speech(&samples, silence_threshold) {
        tracing::trace!("silence, listening again");
        return None;
    }

    let guard = TempAudioGuard::new(std::env::temp_dir().join(TEMP_AUDIO_FILE));
    if let Err(err) = save_wav(guard.path(), &samples) {
        tracing::warn!(error = %format!("{err:#}"), "failed to save recording");
        return None;
    }
    match transcriber.transcribe_file(guard.path()).await {
        Ok(transcript) => Some(transcript),
        Err(err) => {
            tracing::warn!(error = %err, "speech recognition failed");
            Some(Transcript::NoMatch)
        }
    }
}

/// RAII guard that removes the temporary WAV file at scope exit.
///
/// # Details
/// Ensures the recording is deleted even on early returns.
struct TempAudioGuard {
    path: PathBuf,
}

impl TempAudioGuard {
    /// Creates a guard for `path`; cleanup happens in `Drop`.
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudioGuard {
    /// Ensures the temp file is always removed, even on early returns.
    fn drop(&mut self) {
        std::fs::remove_file(&self.path).ok();
    }
}

/// Injects a short delay so the user has time to prepare before recording begins.
async fn announce_listening() {
    tracing::debug!("listening");
    tokio::time::sleep(PRE_RECORD_DELAY).await;
}

/// Determines whether the user has asked to end the session.
///
/// # Details
/// The whole utterance, lower-cased and stripped of punctuation, must be one
/// of the quit phrases; "stop the servo" is a request, not a goodbye.
///
/// # Arguments
/// * `user_text` - The recognized user utterance.
///
/// # Returns
/// * `bool` - `true` when the utterance is a quit phrase.
fn should_quit(user_text: &str) -> bool {
    let normalized = normalize_utterance(user_text);
    QUIT_PHRASES.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::fs::File;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Local;
    use tempfile::TempDir;

    use crate::error::{ActuatorError, LinkError, LlmError};
    use crate::memory::{Message, Role};

    /// Chat model that replays queued replies and records what it was sent.
    #[derive(Default)]
    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedModel {
        fn replying(replies: &[&str]) -> Self {
            let model = Self::default();
            model
                .replies
                .lock()
                .unwrap()
                .extend(replies.iter().map(|r| Ok(r.to_string())));
            model
        }

        fn last_history(&self) -> Vec<Message> {
            self.seen.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, history: &[Message]) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push(history.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyReply))
        }
    }

    /// Bench hardware that records commands and serves queued sensor polls.
    #[derive(Default)]
    struct BenchHardware {
        applied: Vec<Command>,
        readings: VecDeque<Result<SensorReading, SensorError>>,
        polls: usize,
        unplugged: bool,
    }

    impl Actuator for BenchHardware {
        fn apply(&mut self, command: Command) -> Result<(), ActuatorError> {
            if self.unplugged {
                return Err(LinkError::Disconnected.into());
            }
            self.applied.push(command);
            Ok(())
        }
    }

    impl SensorSource for BenchHardware {
        fn poll(&mut self) -> Result<SensorReading, SensorError> {
            self.polls += 1;
            self.readings.pop_front().unwrap_or(Err(SensorError::NoData))
        }
    }

    fn reading() -> SensorReading {
        SensorReading::parse_line("24.5,40,310,42,Good", Local::now()).unwrap()
    }

    fn responder(
        dir: &TempDir,
        model: ScriptedModel,
        hardware: BenchHardware,
    ) -> Responder<ScriptedModel, BenchHardware> {
        let memory = SessionMemory::load(dir.path().join("chat_memory.json"));
        Responder::new(Conversation::new(memory, model), hardware)
    }

    fn is_sensor_summary(message: &Message) -> bool {
        message.role == Role::System && message.content.starts_with("Current sensor readings")
    }

    #[tokio::test]
    async fn led_command_reaches_actuator() {
        let dir = TempDir::new().unwrap();
        let mut responder = responder(&dir, ScriptedModel::replying(&["LED on."]), BenchHardware::default());

        let spoken = responder.respond("Turn on LED please").await;

        assert_eq!(spoken, "LED on.");
        assert_eq!(responder.hardware.applied, vec![Command::LedState(true)]);
        assert_eq!(responder.conversation.memory().len(), 3);
    }

    #[tokio::test]
    async fn servo_move_is_confirmed_to_the_model() {
        let dir = TempDir::new().unwrap();
        let mut responder =
            responder(&dir, ScriptedModel::replying(&["Left it is."]), BenchHardware::default());

        responder.respond("turn the servo left").await;

        assert_eq!(responder.hardware.applied, vec![Command::ServoPosition(180)]);
        let sent = responder.conversation.model().last_history();
        assert_eq!(sent[1], Message::system("Servo has been moved to 180 degrees."));
    }

    #[tokio::test]
    async fn failed_servo_move_is_not_confirmed() {
        let dir = TempDir::new().unwrap();
        let hardware = BenchHardware {
            unplugged: true,
            ..BenchHardware::default()
        };
        let mut responder = responder(&dir, ScriptedModel::replying(&["Hmm."]), hardware);

        responder.respond("turn the servo left").await;

        let sent = responder.conversation.model().last_history();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1], Message::user("turn the servo left"));
    }

    #[tokio::test]
    async fn spoken_compound_angle_moves_the_servo() {
        let dir = TempDir::new().unwrap();
        let mut responder =
            responder(&dir, ScriptedModel::replying(&["Done."]), BenchHardware::default());

        responder.respond("Move to forty five.").await;

        assert_eq!(responder.hardware.applied, vec![Command::ServoPosition(45)]);
    }

    #[tokio::test]
    async fn reply_directive_is_skipped_when_servo_already_there() {
        let dir = TempDir::new().unwrap();
        let mut responder = responder(
            &dir,
            ScriptedModel::replying(&["Turning left. CMD:POS:180"]),
            BenchHardware::default(),
        );

        let spoken = responder.respond("turn left").await;

        assert_eq!(spoken, "Turning left.");
        assert_eq!(responder.hardware.applied, vec![Command::ServoPosition(180)]);
    }

    #[tokio::test]
    async fn reply_directive_moves_servo_when_utterance_did_not() {
        let dir = TempDir::new().unwrap();
        let mut responder = responder(
            &dir,
            ScriptedModel::replying(&["Facing the door. CMD:POS:45"]),
            BenchHardware::default(),
        );

        let spoken = responder.respond("point at the door").await;

        assert_eq!(spoken, "Facing the door.");
        assert_eq!(responder.hardware.applied, vec![Command::ServoPosition(45)]);
    }

    #[tokio::test]
    async fn no_command_directive_is_stripped() {
        let dir = TempDir::new().unwrap();
        let mut responder = responder(
            &dir,
            ScriptedModel::replying(&["Quite well, thank you. CMD:NO_COMMAND"]),
            BenchHardware::default(),
        );

        let spoken = responder.respond("how are you").await;

        assert_eq!(spoken, "Quite well, thank you.");
        assert!(responder.hardware.applied.is_empty());
    }

    #[tokio::test]
    async fn last_reading_is_reused_when_no_new_data() {
        let dir = TempDir::new().unwrap();
        let hardware = BenchHardware {
            readings: VecDeque::from([Ok(reading())]),
            ..BenchHardware::default()
        };
        let mut responder =
            responder(&dir, ScriptedModel::replying(&["24.5 degrees.", "40 percent."]), hardware);

        responder.respond("What's the TEMPERATURE?").await;
        responder.respond("and the humidity").await;

        assert_eq!(responder.hardware.polls, 2);
        let sent = responder.conversation.model().last_history();
        let summary = &sent[sent.len() - 2];
        assert!(is_sensor_summary(summary));
        assert!(summary.content.contains("24.5°C"));
    }

    #[tokio::test]
    async fn sensors_are_not_polled_for_small_talk() {
        let dir = TempDir::new().unwrap();
        let hardware = BenchHardware {
            readings: VecDeque::from([Ok(reading())]),
            ..BenchHardware::default()
        };
        let mut responder = responder(&dir, ScriptedModel::replying(&["Ha."]), hardware);

        responder.respond("tell me a joke").await;

        assert_eq!(responder.hardware.polls, 0);
        assert!(!responder
            .conversation
            .memory()
            .messages()
            .iter()
            .any(is_sensor_summary));
    }

    #[tokio::test]
    async fn sensor_and_servo_context_arrive_together() {
        let dir = TempDir::new().unwrap();
        let hardware = BenchHardware {
            readings: VecDeque::from([Ok(reading())]),
            ..BenchHardware::default()
        };
        let mut responder = responder(&dir, ScriptedModel::replying(&["Done, and it's warm."]), hardware);
        let text = "turn the servo left and tell me the room temperature";

        responder.respond(text).await;

        let messages = responder.conversation.memory().messages();
        assert_eq!(messages.len(), 5);
        assert!(is_sensor_summary(&messages[1]));
        assert_eq!(messages[2], Message::system("Servo has been moved to 180 degrees."));
        assert_eq!(messages[3], Message::user(text));
        assert_eq!(messages[4], Message::assistant("Done, and it's warm."));
    }

    #[tokio::test]
    async fn model_failure_yields_apology_and_rolls_back() {
        let dir = TempDir::new().unwrap();
        let mut responder = responder(&dir, ScriptedModel::default(), BenchHardware::default());

        let spoken = responder.respond("turn the servo left").await;

        assert_eq!(spoken, LLM_UNAVAILABLE_REPLY);
        assert_eq!(responder.conversation.memory().len(), 1);
        assert_eq!(responder.hardware.applied, vec![Command::ServoPosition(180)]);
    }

    #[test]
    fn quit_detection_needs_whole_utterance() {
        assert!(should_quit("Quit"));
        assert!(should_quit(" exit. "));
        assert!(should_quit("STOP!"));
        assert!(!should_quit("stop the servo"));
        assert!(!should_quit("keep going"));
    }

    #[test]
    fn guard_drops_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(TEMP_AUDIO_FILE);
        File::create(&path).expect("create temp file");
        {
            let _guard = TempAudioGuard::new(path.clone());
        }
        assert!(!path.exists());
    }

    #[test]
    fn ollama_backend_needs_no_key() {
        let config = AppConfig {
            llm_backend: LlmBackend::Ollama,
            ..AppConfig::default()
        };
        assert!(build_chat_model(&config).is_ok());
    }

    #[test]
    fn groq_backend_needs_key() {
        assert!(build_chat_model(&AppConfig::default()).is_err());
    }
}
