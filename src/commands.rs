/*
 * @file commands.rs
 * @brief Hardware command extraction from recognized speech
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

//! Keyword tables and matching logic that turn utterances into servo and
//! LED commands.

use std::fmt;

/// Largest servo angle the actuator accepts, in degrees.
pub const MAX_SERVO_ANGLE: u8 = 180;

/// Direction words and the servo angle each one selects.
///
/// Checked before any numeric angle; the first token found in this table wins.
const DIRECTIONAL_ANGLES: &[(&str, u8)] = &[
    ("left", 180),
    ("right", 0),
    ("center", 90),
    ("middle", 90),
    ("straight", 90),
    ("forward", 90),
];

/// Tokens that announce an explicit angle may follow.
const ACTION_KEYWORDS: &[&str] = &["servo", "move", "turn", "rotate"];

/// How many tokens after an action keyword are searched for an angle.
const ANGLE_LOOKAHEAD: usize = 2;

/// Literal LED phrases and the state each one requests.
const LED_PHRASES: &[(&str, bool)] = &[("turn on led", true), ("turn off led", false)];

/// Speech recognizer slips that hide a servo request.
const MISHEARD_PHRASES: &[(&str, &str)] = &[
    ("move the server", "move the servo"),
    ("move to ", "move servo to "),
];

/// Number words below ten.
const UNIT_WORDS: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
];

/// Number words from ten to nineteen.
const TEEN_WORDS: &[(&str, u32)] = &[
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

/// Multiples of ten that may be followed by a unit word ("forty five").
const TENS_WORDS: &[(&str, u32)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

/// Prefix the chat model uses to attach a command to its reply.
const DIRECTIVE_PREFIX: &str = "CMD:";

/// Directive that carries a servo angle.
const POSITION_DIRECTIVE: &str = "CMD:POS:";

/// A structured hardware instruction derived from one utterance.
///
/// # Details
/// Commands are transient: they are produced per utterance, handed to the
/// actuator, and never stored in the session history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// The utterance does not ask for any hardware action.
    None,
    /// Move the servo to the given angle (always within 0..=180).
    ServoPosition(u8),
    /// Switch the LED on (`true`) or off (`false`).
    LedState(bool),
}

impl Command {
    /// Returns `true` when no hardware action is requested.
    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::None => write!(f, "no command"),
            Command::ServoPosition(angle) => write!(f, "servo to {} degrees", angle),
            Command::LedState(true) => write!(f, "LED on"),
            Command::LedState(false) => write!(f, "LED off"),
        }
    }
}

/// Extracts a servo angle from an utterance.
///
/// # Details
/// Scans whitespace tokens left to right for a direction word first. Only when
/// none is present does it look for an action keyword (matched inside the
/// token, so "turning" counts) and then search that token plus the next two
/// for a plain integer in 0..=180. Non-numeric and out-of-range tokens are
/// skipped, never clamped.
///
/// # Arguments
/// * `text` - The recognized utterance.
///
/// # Returns
/// * `Command::ServoPosition(angle)` - A direction word or valid angle was found.
/// * `Command::None` - Nothing servo-related could be extracted.
pub fn extract_servo_command(text: &str) -> Command {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    if let Some(angle) = tokens.iter().find_map(|token| directional_angle(token)) {
        return Command::ServoPosition(angle);
    }

    for (index, token) in tokens.iter().enumerate() {
        if !ACTION_KEYWORDS.iter().any(|keyword| token.contains(keyword)) {
            continue;
        }
        let end = (index + ANGLE_LOOKAHEAD + 1).min(tokens.len());
        if let Some(angle) = tokens[index..end].iter().find_map(|token| parse_angle(token)) {
            return Command::ServoPosition(angle);
        }
    }

    Command::None
}

/// Extracts an LED state from an utterance.
///
/// # Details
/// Only the literal phrases "turn on led" and "turn off led" are recognized,
/// anywhere in the utterance and regardless of case.
///
/// # Arguments
/// * `text` - The recognized utterance.
///
/// # Returns
/// * `Command::LedState(on)` - One of the LED phrases was found.
/// * `Command::None` - No LED phrase present.
pub fn extract_led_command(text: &str) -> Command {
    let lowered = text.to_lowercase();
    LED_PHRASES
        .iter()
        .find(|(phrase, _)| lowered.contains(phrase))
        .map_or(Command::None, |&(_, on)| Command::LedState(on))
}

/// Looks up a single token in the direction table.
fn directional_angle(token: &str) -> Option<u8> {
    DIRECTIONAL_ANGLES
        .iter()
        .find(|(word, _)| *word == token)
        .map(|&(_, angle)| angle)
}

/// Parses a token made only of ASCII digits into a servo angle.
///
/// Signed, fractional, or out-of-range values yield `None`.
fn parse_angle(token: &str) -> Option<u8> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = token.parse().ok()?;
    u8::try_from(value)
        .ok()
        .filter(|angle| *angle <= MAX_SERVO_ANGLE)
}

/// Normalizes a raw transcript before command extraction.
///
/// # Details
/// Lower-cases the text, drops punctuation the recognizer adds, repairs a few
/// common mishearings ("move the server"), and rewrites spoken numbers as
/// digits so "turn to forty five" can still reach the angle parser. A run of
/// number words becomes one value: "forty five" is 45 and "one hundred
/// eighty" is 180.
///
/// # Arguments
/// * `text` - The transcript as returned by speech recognition.
///
/// # Returns
/// * `String` - Lower-cased, single-spaced text with numbers as digits.
pub fn normalize_utterance(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || c == '-' || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect();
    let mut collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.push(' ');
    for (wrong, right) in MISHEARD_PHRASES {
        collapsed = collapsed.replace(wrong, right);
    }

    let tokens: Vec<&str> = collapsed.split_whitespace().collect();
    let mut output = Vec::with_capacity(tokens.len());
    let mut index = 0;
    while index < tokens.len() {
        match spoken_number(&tokens[index..]) {
            Some((value, used)) => {
                output.push(value.to_string());
                index += used;
            }
            None => {
                output.push(tokens[index].to_string());
                index += 1;
            }
        }
    }
    output.join(" ")
}

fn lookup(table: &[(&str, u32)], token: Option<&&str>) -> Option<u32> {
    let token = token?;
    table
        .iter()
        .find(|(word, _)| word == token)
        .map(|(_, value)| *value)
}

/// Reads the spoken number at the start of `tokens`.
///
/// Accepts "hundred" or "<unit> hundred" optionally followed by a value below
/// one hundred, the short form "one <tens>" ("one eighty" is 180), and values
/// below one hundred written as a tens word plus an optional unit word.
///
/// # Returns
/// * `Some((value, used))` - the number and how many tokens it spans.
/// * `None` - `tokens` does not start with a number word.
fn spoken_number(tokens: &[&str]) -> Option<(u32, usize)> {
    let first = tokens.first();
    let hundreds = if first == Some(&"hundred") {
        Some((100, 1))
    } else if tokens.get(1) == Some(&"hundred") {
        lookup(UNIT_WORDS, first)
            .filter(|unit| *unit > 0)
            .map(|unit| (unit * 100, 2))
    } else if first == Some(&"one") && lookup(TENS_WORDS, tokens.get(1)).is_some() {
        Some((100, 1))
    } else {
        None
    };

    match hundreds {
        Some((value, used)) => {
            let rest = below_hundred(&tokens[used..]).unwrap_or((0, 0));
            Some((value + rest.0, used + rest.1))
        }
        None => below_hundred(tokens),
    }
}

/// Reads a value in 0..=99 from the start of `tokens`.
fn below_hundred(tokens: &[&str]) -> Option<(u32, usize)> {
    if let Some(tens) = lookup(TENS_WORDS, tokens.first()) {
        return Some(match lookup(UNIT_WORDS, tokens.get(1)).filter(|unit| *unit > 0) {
            Some(unit) => (tens + unit, 2),
            None => (tens, 1),
        });
    }
    lookup(TEEN_WORDS, tokens.first())
        .or_else(|| lookup(UNIT_WORDS, tokens.first()))
        .map(|value| (value, 1))
}

/// Splits a chat reply into its spoken part and an optional trailing directive.
///
/// # Details
/// Replies may end with `CMD:POS:<angle>` or `CMD:NO_COMMAND`. Everything
/// before the first `CMD:` is what should be spoken. A position directive is
/// honoured only when the angle is a whole number in 0..=180.
///
/// # Arguments
/// * `reply` - The raw reply text from the chat model.
///
/// # Returns
/// * `(String, Command)` - Trimmed spoken text and the parsed directive.
pub fn split_reply_directive(reply: &str) -> (String, Command) {
    let Some(start) = reply.find(DIRECTIVE_PREFIX) else {
        return (reply.trim().to_string(), Command::None);
    };
    let spoken = reply[..start].trim().to_string();
    let command = reply[start..]
        .strip_prefix(POSITION_DIRECTIVE)
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(parse_angle)
        .map_or(Command::None, Command::ServoPosition);
    (spoken, command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_angle_after_action_keyword() {
        assert_eq!(
            extract_servo_command("turn to 45 degrees"),
            Command::ServoPosition(45)
        );
        assert_eq!(
            extract_servo_command("please rotate servo 120"),
            Command::ServoPosition(120)
        );
    }

    #[test]
    fn direction_words_map_to_fixed_angles() {
        assert_eq!(extract_servo_command("left"), Command::ServoPosition(180));
        assert_eq!(extract_servo_command("go right"), Command::ServoPosition(0));
        assert_eq!(extract_servo_command("center it"), Command::ServoPosition(90));
        assert_eq!(extract_servo_command("face forward"), Command::ServoPosition(90));
    }

    #[test]
    fn direction_word_beats_trailing_digits() {
        assert_eq!(
            extract_servo_command("turn 30 then left"),
            Command::ServoPosition(180)
        );
        assert_eq!(
            extract_servo_command("move left 45"),
            Command::ServoPosition(180)
        );
    }

    #[test]
    fn first_direction_token_wins() {
        assert_eq!(
            extract_servo_command("right not left"),
            Command::ServoPosition(0)
        );
    }

    #[test]
    fn unrelated_text_yields_none() {
        assert_eq!(extract_servo_command("banana"), Command::None);
        assert_eq!(extract_servo_command("what is 45 plus 3"), Command::None);
    }

    #[test]
    fn angle_bounds_are_inclusive() {
        assert_eq!(extract_servo_command("turn 0"), Command::ServoPosition(0));
        assert_eq!(extract_servo_command("turn 180"), Command::ServoPosition(180));
        assert_eq!(extract_servo_command("turn 181"), Command::None);
        assert_eq!(extract_servo_command("turn -1"), Command::None);
    }

    #[test]
    fn lookahead_is_limited_to_two_tokens() {
        assert_eq!(extract_servo_command("turn it to 60"), Command::None);
        assert_eq!(extract_servo_command("turn it 60"), Command::ServoPosition(60));
    }

    #[test]
    fn out_of_range_angle_is_skipped_not_clamped() {
        assert_eq!(
            extract_servo_command("rotate 500 90"),
            Command::ServoPosition(90)
        );
    }

    #[test]
    fn action_keyword_matches_inside_token() {
        assert_eq!(
            extract_servo_command("keep turning 15"),
            Command::ServoPosition(15)
        );
    }

    #[test]
    fn led_phrases_are_literal() {
        assert_eq!(extract_led_command("Please TURN ON LED now"), Command::LedState(true));
        assert_eq!(extract_led_command("turn off led"), Command::LedState(false));
        assert_eq!(extract_led_command("switch the led on"), Command::None);
    }

    #[test]
    fn normalize_rewrites_numbers_and_mishearings() {
        assert_eq!(normalize_utterance("Move the server to ninety."), "move the servo to 90");
        assert_eq!(normalize_utterance("move to one hundred"), "move servo to 100");
        assert_eq!(normalize_utterance("Turn, hundred eighty!"), "turn 180");
        assert_eq!(normalize_utterance("one fifty"), "150");
        assert_eq!(normalize_utterance("What's the temperature?"), "what's the temperature");
    }

    #[test]
    fn normalized_text_feeds_extraction() {
        let text = normalize_utterance("Rotate to forty");
        assert_eq!(extract_servo_command(&text), Command::ServoPosition(40));
    }

    #[test]
    fn compound_numbers_become_one_value() {
        assert_eq!(normalize_utterance("move to forty five"), "move servo to 45");
        assert_eq!(normalize_utterance("turn to one hundred eighty"), "turn to 180");
        assert_eq!(normalize_utterance("rotate to one hundred and five"), "rotate to 100 and 5");
        assert_eq!(normalize_utterance("servo one twenty five"), "servo 125");
        assert_eq!(normalize_utterance("turn to fifteen"), "turn to 15");
        assert_eq!(normalize_utterance("two hundred"), "200");
    }

    #[test]
    fn spoken_compound_angles_reach_the_servo() {
        let angle = |text: &str| extract_servo_command(&normalize_utterance(text));
        assert_eq!(angle("move to forty five"), Command::ServoPosition(45));
        assert_eq!(angle("turn to one hundred eighty"), Command::ServoPosition(180));
        assert_eq!(angle("rotate to ninety"), Command::ServoPosition(90));
        assert_eq!(angle("turn to one hundred eighty one"), Command::None);
    }

    #[test]
    fn reply_directive_is_split_off() {
        let (spoken, command) = split_reply_directive("Rotating left, sir. CMD:POS:180");
        assert_eq!(spoken, "Rotating left, sir.");
        assert_eq!(command, Command::ServoPosition(180));
    }

    #[test]
    fn reply_without_directive_is_unchanged() {
        let (spoken, command) = split_reply_directive("  Good evening.  ");
        assert_eq!(spoken, "Good evening.");
        assert!(command.is_none());
    }

    #[test]
    fn invalid_directives_yield_no_command() {
        assert_eq!(split_reply_directive("Sure. CMD:NO_COMMAND").1, Command::None);
        assert_eq!(split_reply_directive("Sure. CMD:POS:270").1, Command::None);
        assert_eq!(split_reply_directive("Sure. CMD:POS:abc").1, Command::None);
    }

    #[test]
    fn command_display_is_readable() {
        assert_eq!(Command::ServoPosition(90).to_string(), "servo to 90 degrees");
        assert_eq!(Command::LedState(false).to_string(), "LED off");
    }
}
