//! Shapes assistant text before it is stored and shown.

use once_cell::sync::Lazy;
use regex::Regex;
use solace_core::TopicKey;
use solace_core::safety::CrisisClassifier;
use solace_core::session::{Message, Session};

/// Shown with every assistant message. Never produced by the provider.
pub const SAFETY_DISCLAIMER: &str = "This chat offers general wellbeing support and is not \
a substitute for professional care. If you are in crisis, call or text 988 or your local \
emergency number.";

/// Replaces a provider reply that repeats the previous assistant message.
pub const REPEAT_FALLBACK: &str = "I hear you, and what you're feeling matters. Take a slow \
breath and be gentle with yourself; the resources below are here whenever you want them.";

/// Provider-written disclaimer boilerplate.
static DISCLAIMER_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // whole "Disclaimer: ..." lines
        r"(?im)^[ \t>*_]*disclaimer\b[^\n]*$",
        // "Please note: I'm not a therapist ..." lines, but not ordinary notes
        r"(?im)^[ \t>*_]*(?:please\s+note|important\s+note|note)\b[^\n]*\b(?:not\s+(?:a\s+)?(?:substitute|replacement|licensed|medical|professional|clinical|therapist|doctor)|as\s+an\s+ai)\b[^\n]*$",
        r"(?i)\bas an ai(?:\s+(?:language\s+model|assistant|chatbot))?\b[^.!?\n]*[.!?]?",
        r"(?i)\b(?:i am|i'm)\s+(?:not|no)\s+(?:a\s+)?(?:licensed\s+|medical\s+|mental\s+health\s+)?(?:therapist|doctor|professional|counsel+or|clinician|substitute)\b[^.!?\n]*[.!?]?",
        r"(?i)\bthis\s+(?:is\s+not|isn't|does\s+not\s+constitute)\s+(?:medical|professional|clinical)\s+advice\b[^.!?\n]*[.!?]?",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("disclaimer patterns are static and valid"))
    .collect()
});

static EXTRA_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("static pattern is valid"));
static EXTRA_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*){2,}").expect("static pattern is valid"));

/// Removes provider-emitted disclaimer boilerplate and tidies the whitespace
/// left behind.
pub fn strip_disclaimers(text: &str) -> String {
    let mut stripped = text.to_string();
    for marker in DISCLAIMER_MARKERS.iter() {
        stripped = marker.replace_all(&stripped, "").into_owned();
    }
    let stripped = EXTRA_SPACES.replace_all(&stripped, " ");
    let stripped = EXTRA_NEWLINES.replace_all(&stripped, "\n\n");
    stripped.trim().to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponsePostProcessor {
    classifier: CrisisClassifier,
}

impl ResponsePostProcessor {
    pub fn new() -> Self {
        Self {
            classifier: CrisisClassifier::new(),
        }
    }

    /// Provider output: strip disclaimers, redact, dedupe against the
    /// session's previous assistant message, attach `topic`.
    pub fn process_provider_text(
        &self,
        provider_text: &str,
        session: &Session,
        topic: TopicKey,
    ) -> Message {
        let stripped = strip_disclaimers(provider_text);
        let sanitized = self.classifier.sanitize(&stripped).trim().to_string();

        let repeated = session
            .last_assistant_message()
            .is_some_and(|previous| previous.text.trim() == sanitized);

        let text = if sanitized.is_empty() {
            tracing::debug!("[PostProcessor] Provider reply empty after stripping");
            REPEAT_FALLBACK.to_string()
        } else if repeated {
            tracing::debug!("[PostProcessor] Provider repeated itself in {}", session.id);
            REPEAT_FALLBACK.to_string()
        } else {
            sanitized
        };

        Message::assistant(text, Some(topic))
    }

    /// Locally generated text: redact and attach `topic`. Never deduplicated.
    pub fn process_canned_text(&self, text: &str, topic: TopicKey) -> Message {
        let sanitized = self.classifier.sanitize(text);
        Message::assistant(sanitized.into_owned(), Some(topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::safety::REDACTION_TOKEN;

    #[test]
    fn test_strip_disclaimers() {
        let text = "That sounds exhausting. As an AI, I can't feel what you feel. \
                    Try a short walk.\n\nDisclaimer: this is not medical advice.";
        assert_eq!(
            strip_disclaimers(text),
            "That sounds exhausting. Try a short walk."
        );

        let text = "I'm not a therapist, but it helps to rest. Be kind to yourself.";
        assert_eq!(strip_disclaimers(text), "Be kind to yourself.");
    }

    #[test]
    fn test_ordinary_notes_survive() {
        assert_eq!(
            strip_disclaimers("Please note that slow breathing helps."),
            "Please note that slow breathing helps."
        );
        assert_eq!(
            strip_disclaimers("Please note: I'm not a licensed therapist.\nTry slow breathing."),
            "Try slow breathing."
        );

        let processor = ResponsePostProcessor::new();
        let message = processor.process_provider_text(
            "Important note: your feelings are valid.",
            &Session::new(),
            TopicKey::Stress,
        );
        assert_eq!(message.text, "Important note: your feelings are valid.");
    }

    #[test]
    fn test_plain_text_passes_through() {
        let processor = ResponsePostProcessor::new();
        let message =
            processor.process_provider_text("  That sounds hard.  ", &Session::new(), TopicKey::Stress);
        assert_eq!(message.text, "That sounds hard.");
        assert_eq!(message.resource_key, Some(TopicKey::Stress));
        assert!(message.is_assistant());
    }

    #[test]
    fn test_crisis_spans_are_redacted() {
        let processor = ResponsePostProcessor::new();
        let message = processor.process_provider_text(
            "Some people feel they want to die. You are not alone.",
            &Session::new(),
            TopicKey::Depression,
        );
        assert!(message.text.contains(REDACTION_TOKEN));
        assert!(!CrisisClassifier::new().classify(&message.text));
    }

    #[test]
    fn test_repeat_of_previous_assistant_is_replaced() {
        let processor = ResponsePostProcessor::new();
        let mut session = Session::new();
        session
            .messages
            .push(Message::assistant("Breathe slowly with me.", Some(TopicKey::Breathing)));

        let repeated =
            processor.process_provider_text(" Breathe slowly with me.\n", &session, TopicKey::Breathing);
        assert_eq!(repeated.text, REPEAT_FALLBACK);

        // case-sensitive comparison
        let different =
            processor.process_provider_text("breathe slowly with me.", &session, TopicKey::Breathing);
        assert_eq!(different.text, "breathe slowly with me.");
    }

    #[test]
    fn test_disclaimer_only_reply_falls_back() {
        let processor = ResponsePostProcessor::new();
        let message = processor.process_provider_text(
            "Disclaimer: I am not a doctor.",
            &Session::new(),
            TopicKey::GeneralResources,
        );
        assert_eq!(message.text, REPEAT_FALLBACK);
    }

    #[test]
    fn test_canned_text_is_never_deduplicated() {
        let processor = ResponsePostProcessor::new();
        let first = processor.process_canned_text("Call or text 988.", TopicKey::Crisis);
        let second = processor.process_canned_text("Call or text 988.", TopicKey::Crisis);
        assert_eq!(first.text, second.text);
        assert_eq!(second.resource_key, Some(TopicKey::Crisis));
    }

    #[test]
    fn test_constants_are_crisis_free() {
        let classifier = CrisisClassifier::new();
        assert!(!classifier.classify(SAFETY_DISCLAIMER));
        assert!(!classifier.classify(REPEAT_FALLBACK));
    }
}
