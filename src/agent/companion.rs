//! Conversation companion: transcript state and reply interpretation.
//!
//! The companion owns a bounded transcript, sends it with a fixed
//! instruction block through the [`LlmClient`] boundary, and repairs
//! whatever comes back into a [`Reply`]. `respond` is total: transport
//! failures, malformed completions, and out-of-vocabulary labels are all
//! absorbed into fallback replies, never surfaced to the caller.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::labels::{Emotion, Expression};
use super::llm::LlmClient;
use super::message::{Role, Turn};

/// Most recent turns kept as model context; older turns are evicted first.
const MAX_TRANSCRIPT_TURNS: usize = 10;

const QUIET_PROMPT: &str = "I notice you're quiet. Would you like to share what's on your mind?";

const RECOVERY_PROMPT: &str = "I'm having a moment. Let's take a breath and try again in a bit.";

/// The validated result of one `respond` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// Response text, always non-empty.
    #[serde(rename = "response")]
    pub text: String,

    /// Emotion detected in the user's message.
    #[serde(rename = "emotion_detected")]
    pub emotion: Emotion,

    /// Expression the companion presents alongside the reply.
    #[serde(rename = "therapist_expression")]
    pub expression: Expression,
}

impl Reply {
    /// Canned reply for empty or whitespace-only input.
    fn quiet_prompt() -> Self {
        Self {
            text: QUIET_PROMPT.to_string(),
            emotion: Emotion::Neutral,
            expression: Expression::Listening,
        }
    }

    /// Canned reply covering any transport or provider failure.
    fn recovery() -> Self {
        Self {
            text: RECOVERY_PROMPT.to_string(),
            emotion: Emotion::Neutral,
            expression: Expression::Concerned,
        }
    }
}

/// Raw shape of the JSON object the model is instructed to return.
/// Missing keys default rather than error.
#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(default)]
    response: String,
    #[serde(default)]
    emotion_detected: String,
    #[serde(default)]
    therapist_expression: String,
}

/// Templated fallback referencing the detected emotion.
fn feeling_prompt(emotion: Emotion) -> String {
    format!(
        "I sense you might be feeling {emotion}. I'm here to listen. \
         Would you like to share more about what's on your mind?"
    )
}

/// Turn a raw model completion into a candidate reply.
///
/// The model is instructed to return pure JSON but may wrap it in a code
/// fence or surround it with stray prose, so this is maximally tolerant:
/// strip fences, clamp to the outermost braces, strict-parse, and on any
/// failure fall back to scanning the text for labels. Never fails.
fn extract_reply(raw: &str) -> Reply {
    let trimmed = raw.trim();

    let mut clean = trimmed;
    if let Some(inner) = clean
        .strip_prefix("```json")
        .or_else(|| clean.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
    {
        clean = inner.trim();
    }

    let mut body = clean;
    if !body.starts_with('{') {
        if let Some(start) = body.find('{') {
            body = &body[start..];
        }
    }
    if !body.ends_with('}') {
        if let Some(end) = body.rfind('}') {
            body = &body[..=end];
        }
    }

    match serde_json::from_str::<RawReply>(body) {
        Ok(parsed) => Reply {
            text: parsed.response,
            emotion: Emotion::coerce(&parsed.emotion_detected),
            expression: Expression::coerce(&parsed.therapist_expression),
        },
        Err(err) => {
            debug!("completion is not valid JSON ({err}), scanning for labels");
            Reply {
                text: trimmed.to_string(),
                emotion: Emotion::scan(raw),
                expression: Expression::scan(raw),
            }
        }
    }
}

/// A therapist companion holding one bounded conversation.
///
/// `respond` takes `&mut self`, so one caller at a time per instance is
/// enforced by the borrow checker. Wrap in a mutex to share.
pub struct Companion<C: LlmClient> {
    name: String,
    client: C,
    transcript: Vec<Turn>,
    debug: bool,
}

impl<C: LlmClient> Companion<C> {
    /// Create a companion with a display name and an LLM client.
    pub fn new(name: impl Into<String>, client: C, debug: bool) -> Self {
        Self {
            name: name.into(),
            client,
            transcript: Vec::new(),
            debug,
        }
    }

    /// Display name shown in the console.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current transcript, oldest turn first.
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Toggle raw-output diagnostics.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Process user input and return a structured reply.
    ///
    /// This never fails. Empty input short-circuits to a canned prompt
    /// without touching the transcript; a failed model request returns a
    /// canned recovery reply, leaving only the user turn appended.
    pub async fn respond(&mut self, user_text: &str) -> Reply {
        if user_text.trim().is_empty() {
            return Reply::quiet_prompt();
        }

        self.transcript.push(Turn::user(user_text));

        let instruction = self.instruction();
        let raw = match self.client.generate(&instruction, &self.transcript).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("model request failed: {err}");
                return Reply::recovery();
            }
        };

        if self.debug {
            info!(raw = %raw, "raw model completion");
        } else {
            debug!(raw = %raw, "raw model completion");
        }

        let mut reply = extract_reply(&raw);

        if reply.text.trim().is_empty() {
            reply.text = feeling_prompt(reply.emotion);
        }

        // Guard against the model echoing its own previous line. The gate
        // only opens when an earlier exchange left the transcript
        // unbalanced: in strictly alternating use the length is odd at
        // this point.
        let len = self.transcript.len();
        if len >= 2 && len % 2 == 0 {
            let prev = &self.transcript[len - 2];
            if prev.role == Role::Companion && prev.text == reply.text {
                reply.text = feeling_prompt(reply.emotion);
            }
        }

        self.transcript.push(Turn::companion(reply.text.clone()));

        if self.transcript.len() > MAX_TRANSCRIPT_TURNS {
            let excess = self.transcript.len() - MAX_TRANSCRIPT_TURNS;
            self.transcript.drain(..excess);
        }

        debug!(
            reply = %serde_json::to_string(&reply).unwrap_or_default(),
            "structured reply"
        );

        reply
    }

    /// Fixed instruction block sent with every request. Embeds both closed
    /// vocabularies verbatim so the model sees the exact allowed values.
    fn instruction(&self) -> String {
        format!(
            r#"You are {name}, a compassionate AI therapist companion designed to help users feel better.

Analyze the user's message and respond in this EXACT JSON format:
{{
"response": "Your thoughtful and supportive response here",
"emotion_detected": "one of: {emotions}",
"therapist_expression": "one of: {expressions}"
}}

Guidelines for your responses:
- Never repeat the exact same response twice in a row
- Start the conversation with smiling (good to see you vibe)
- Keep responses concise, supportive and conversational (2-5 sentences)
- Choose the emotion that best represents what you detect in the user's message
- Choose an appropriate therapist expression that would help the user feel understood
- Focus on validating feelings, gentle encouragement, and supportive questions
- Avoid clinical language or diagnosis
- Be warm and personal while maintaining appropriate boundaries
- Be concerned on byes and goodbyes
- Wink if the user is flirty or suggestive

IMPORTANT: Return ONLY a valid JSON object with the exact fields shown above."#,
            name = self.name,
            emotions = Emotion::vocabulary(),
            expressions = Expression::vocabulary(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::llm::FakeLlmClient;

    fn companion(completions: Vec<&str>) -> Companion<FakeLlmClient> {
        Companion::new("Ayane", FakeLlmClient::new(completions), false)
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let mut c = companion(vec![
            r#"{"response":"hi","emotion_detected":"happy","therapist_expression":"smiling"}"#,
        ]);

        for input in ["", "   ", " \t\n "] {
            let reply = c.respond(input).await;
            assert_eq!(reply.text, QUIET_PROMPT);
            assert_eq!(reply.emotion, Emotion::Neutral);
            assert_eq!(reply.expression, Expression::Listening);
            assert!(c.transcript().is_empty());
        }

        // The single queued completion was not consumed by the empty
        // inputs, so a real message still gets it.
        let reply = c.respond("hello").await;
        assert_eq!(reply.text, "hi");
    }

    #[tokio::test]
    async fn test_structured_json_reply() {
        let mut c = companion(vec![
            r#"{"response":"Good to see you!","emotion_detected":"excited","therapist_expression":"smiling"}"#,
        ]);

        let reply = c.respond("hey there").await;

        assert_eq!(reply.text, "Good to see you!");
        assert_eq!(reply.emotion, Emotion::Excited);
        assert_eq!(reply.expression, Expression::Smiling);
        assert_eq!(
            c.transcript(),
            &[Turn::user("hey there"), Turn::companion("Good to see you!")]
        );
    }

    #[tokio::test]
    async fn test_out_of_vocabulary_labels_coerced() {
        let mut c = companion(vec![
            r#"{"response":"ok","emotion_detected":"jubilant","therapist_expression":"frowning"}"#,
        ]);

        let reply = c.respond("hi").await;

        assert_eq!(reply.emotion, Emotion::Neutral);
        assert_eq!(reply.expression, Expression::Listening);
    }

    #[tokio::test]
    async fn test_transport_failure_absorbed() {
        // Empty queue: the fake client errors on the first request.
        let mut c = companion(vec![]);

        let reply = c.respond("hello?").await;

        assert_eq!(reply.text, RECOVERY_PROMPT);
        assert_eq!(reply.emotion, Emotion::Neutral);
        assert_eq!(reply.expression, Expression::Concerned);
        // The user turn stays; no companion turn is appended.
        assert_eq!(c.transcript(), &[Turn::user("hello?")]);
    }

    #[tokio::test]
    async fn test_transcript_bounded_to_ten_turns() {
        let completions: Vec<String> = (0..20)
            .map(|i| {
                format!(
                    r#"{{"response":"reply-{i}","emotion_detected":"happy","therapist_expression":"smiling"}}"#
                )
            })
            .collect();
        let mut c = companion(completions.iter().map(|s| s.as_str()).collect());

        for i in 0..20 {
            c.respond(&format!("message-{i}")).await;
        }

        let expected: Vec<Turn> = (15..20)
            .flat_map(|i| {
                [
                    Turn::user(format!("message-{i}")),
                    Turn::companion(format!("reply-{i}")),
                ]
            })
            .collect();
        assert_eq!(c.transcript(), expected.as_slice());
    }

    // In strictly alternating use the transcript length is odd at the
    // repetition check, so a duplicated reply passes through untouched.
    #[tokio::test]
    async fn test_repeated_reply_kept_at_odd_parity() {
        let same =
            r#"{"response":"same line","emotion_detected":"sad","therapist_expression":"listening"}"#;
        let mut c = companion(vec![same, same]);

        let first = c.respond("hi").await;
        let second = c.respond("hi again").await;

        assert_eq!(first.text, "same line");
        assert_eq!(second.text, "same line");
        assert_eq!(c.transcript().len(), 4);
    }

    // The guard fires only when the transcript is even-length after the
    // user append, which requires an unpaired turn from before.
    #[tokio::test]
    async fn test_repeated_reply_rewritten_at_even_parity() {
        let mut c = companion(vec![
            r#"{"response":"same line","emotion_detected":"sad","therapist_expression":"listening"}"#,
        ]);
        c.transcript.push(Turn::companion("same line"));

        let reply = c.respond("hi").await;

        assert_ne!(reply.text, "same line");
        assert_eq!(reply.text, feeling_prompt(Emotion::Sad));
        assert_eq!(c.transcript().last().map(|t| t.text.as_str()), Some(reply.text.as_str()));
    }

    #[tokio::test]
    async fn test_empty_response_text_replaced() {
        let mut c = companion(vec![
            r#"{"response":"","emotion_detected":"hopeful","therapist_expression":"reassuring"}"#,
        ]);

        let reply = c.respond("hi").await;

        assert_eq!(reply.text, feeling_prompt(Emotion::Hopeful));
        assert_eq!(reply.emotion, Emotion::Hopeful);
    }

    #[test]
    fn test_instruction_embeds_vocabularies() {
        let c = companion(vec![]);
        let instruction = c.instruction();

        assert!(instruction.contains("Ayane"));
        assert!(instruction.contains(&Emotion::vocabulary()));
        assert!(instruction.contains(&Expression::vocabulary()));
        assert!(instruction.contains("Return ONLY a valid JSON object"));
    }

    #[test]
    fn test_extract_fenced_json() {
        let reply = extract_reply(
            "```json\n{\"response\":\"hi\",\"emotion_detected\":\"happy\",\"therapist_expression\":\"smiling\"}\n```",
        );

        assert_eq!(reply.text, "hi");
        assert_eq!(reply.emotion, Emotion::Happy);
        assert_eq!(reply.expression, Expression::Smiling);
    }

    #[test]
    fn test_extract_bare_fence() {
        let reply = extract_reply("```\n{\"response\":\"hi\"}\n```");
        assert_eq!(reply.text, "hi");
    }

    #[test]
    fn test_extract_stray_text_around_object() {
        let reply = extract_reply(
            "Sure! Here you go: {\"response\":\"hi\",\"emotion_detected\":\"sad\",\"therapist_expression\":\"empathetic\"} Hope that helps.",
        );

        assert_eq!(reply.text, "hi");
        assert_eq!(reply.emotion, Emotion::Sad);
        assert_eq!(reply.expression, Expression::Empathetic);
    }

    #[test]
    fn test_extract_missing_keys_default() {
        let reply = extract_reply(r#"{"response":"just text"}"#);

        assert_eq!(reply.text, "just text");
        assert_eq!(reply.emotion, Emotion::Neutral);
        assert_eq!(reply.expression, Expression::Listening);
    }

    #[test]
    fn test_extract_prose_fallback() {
        let raw = "I think you seem angry today, so I'll stay curious.";
        let reply = extract_reply(raw);

        assert_eq!(reply.text, raw);
        assert_eq!(reply.emotion, Emotion::Angry);
        assert_eq!(reply.expression, Expression::Curious);
    }

    #[test]
    fn test_extract_no_braces_falls_back() {
        let reply = extract_reply("  nothing structured here  ");

        assert_eq!(reply.text, "nothing structured here");
        assert_eq!(reply.emotion, Emotion::Neutral);
        assert_eq!(reply.expression, Expression::Listening);
    }

    #[test]
    fn test_extract_invalid_object_falls_back() {
        let reply = extract_reply("{you seem anxious, I stay thoughtful}");

        assert_eq!(reply.text, "{you seem anxious, I stay thoughtful}");
        assert_eq!(reply.emotion, Emotion::Anxious);
        assert_eq!(reply.expression, Expression::Thoughtful);
    }
}
