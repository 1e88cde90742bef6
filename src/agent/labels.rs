//! Closed label vocabularies for structured replies.
//!
//! Both sets are fixed and ordered; the order matters because the
//! plain-text fallback scan is first-match-wins. Anything outside a set
//! coerces to that set's default at the parse boundary, so an
//! out-of-vocabulary label is unrepresentable past extraction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Emotion detected in the user's message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Anxious,
    Fearful,
    Excited,
    Hopeful,
    #[default]
    Neutral,
}

impl Emotion {
    /// All emotions, in declared scan order.
    pub const ALL: [Emotion; 8] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Anxious,
        Emotion::Fearful,
        Emotion::Excited,
        Emotion::Hopeful,
        Emotion::Neutral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Anxious => "anxious",
            Emotion::Fearful => "fearful",
            Emotion::Excited => "excited",
            Emotion::Hopeful => "hopeful",
            Emotion::Neutral => "neutral",
        }
    }

    /// Exact-match parse. Out-of-vocabulary input coerces to `Neutral`.
    pub fn coerce(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == label)
            .unwrap_or_default()
    }

    /// First emotion occurring as a substring anywhere in `text`
    /// (case-insensitive). `Neutral` if none match.
    pub fn scan(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| lower.contains(e.as_str()))
            .unwrap_or_default()
    }

    /// Comma-separated vocabulary, embedded verbatim in the model prompt.
    pub fn vocabulary() -> String {
        Self::ALL
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facial expression the companion presents alongside a reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Smiling,
    #[default]
    Listening,
    Concerned,
    Thinking,
    Wink,
    Curious,
    Empathetic,
    Thoughtful,
    Reassuring,
    Neutral,
}

impl Expression {
    /// All expressions, in declared scan order.
    pub const ALL: [Expression; 10] = [
        Expression::Smiling,
        Expression::Listening,
        Expression::Concerned,
        Expression::Thinking,
        Expression::Wink,
        Expression::Curious,
        Expression::Empathetic,
        Expression::Thoughtful,
        Expression::Reassuring,
        Expression::Neutral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Expression::Smiling => "smiling",
            Expression::Listening => "listening",
            Expression::Concerned => "concerned",
            Expression::Thinking => "thinking",
            Expression::Wink => "wink",
            Expression::Curious => "curious",
            Expression::Empathetic => "empathetic",
            Expression::Thoughtful => "thoughtful",
            Expression::Reassuring => "reassuring",
            Expression::Neutral => "neutral",
        }
    }

    /// Exact-match parse. Out-of-vocabulary input coerces to `Listening`.
    pub fn coerce(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == label)
            .unwrap_or_default()
    }

    /// First expression occurring as a substring anywhere in `text`
    /// (case-insensitive). `Listening` if none match.
    pub fn scan(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| lower.contains(e.as_str()))
            .unwrap_or_default()
    }

    /// Comma-separated vocabulary, embedded verbatim in the model prompt.
    pub fn vocabulary() -> String {
        Self::ALL
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
