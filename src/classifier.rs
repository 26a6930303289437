//! Query classification: does an utterance need sensor or servo context?

/// Keywords that mark a question about the room environment.
const ENVIRONMENT_KEYWORDS: &[&str] = &[
    "temperature",
    "humidity",
    "air quality",
    "aqi",
    "gas",
    "environment",
    "room",
];

/// Keywords that mark a request involving the servo.
const SERVO_KEYWORDS: &[&str] = &[
    "servo", "move", "turn", "left", "right", "rotate", "position", "angle", "center", "middle",
    "straight", "forward",
];

/// Which kinds of hardware context an utterance calls for.
///
/// Both flags are independent; an utterance may need neither, one, or both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryContext {
    /// A fresh sensor reading should be offered to the model.
    pub needs_environment: bool,
    /// The utterance may carry a servo command.
    pub needs_servo: bool,
}

/// Classifies an utterance by case-insensitive substring search over the
/// environment and servo keyword sets.
pub fn classify(text: &str) -> QueryContext {
    let lowered = text.to_lowercase();
    QueryContext {
        needs_environment: contains_any(&lowered, ENVIRONMENT_KEYWORDS),
        needs_servo: contains_any(&lowered, SERVO_KEYWORDS),
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
