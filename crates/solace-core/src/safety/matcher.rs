//! Deterministic text to topic routing.

use super::classifier::CrisisClassifier;
use super::patterns::TOPIC_RULES;
use crate::topic::TopicKey;

/// Maps free text onto a [`TopicKey`].
///
/// Total and deterministic: every input yields a key and the same input
/// always yields the same key. Crisis outranks every topic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceMatcher {
    classifier: CrisisClassifier,
}

impl ResourceMatcher {
    pub fn new() -> Self {
        Self {
            classifier: CrisisClassifier::new(),
        }
    }

    pub fn match_topic(&self, text: &str) -> TopicKey {
        if self.classifier.classify(text) {
            return TopicKey::Crisis;
        }

        TOPIC_RULES
            .iter()
            .find(|(_, patterns)| patterns.is_match(text))
            .map(|(key, _)| *key)
            .unwrap_or(TopicKey::GeneralResources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_examples() {
        let matcher = ResourceMatcher::new();
        let cases = [
            ("I am anxious about exams", TopicKey::Anxiety),
            ("I am stressed about work", TopicKey::Stress),
            ("I've been feeling really depressed", TopicKey::Depression),
            ("I had a panic attack on the bus", TopicKey::Panic),
            ("my heart is racing and I can't breathe", TopicKey::Panic),
            ("teach me a breathing exercise", TopicKey::Breathing),
            ("any calming music?", TopicKey::Music),
            ("the flashbacks keep coming", TopicKey::Ptsd),
            ("my bipolar meds", TopicKey::Bipolar),
            ("hello there", TopicKey::GeneralResources),
            ("", TopicKey::GeneralResources),
        ];
        for (text, expected) in cases {
            assert_eq!(matcher.match_topic(text), expected, "text: {text:?}");
        }
    }

    #[test]
    fn test_crisis_outranks_topics() {
        let matcher = ResourceMatcher::new();
        assert_eq!(
            matcher.match_topic("I'm so anxious and stressed I want to kill myself"),
            TopicKey::Crisis
        );
        assert_eq!(matcher.match_topic("music won't help, I want to die"), TopicKey::Crisis);
    }

    #[test]
    fn test_priority_order_is_fixed() {
        let matcher = ResourceMatcher::new();
        // panic outranks anxiety, anxiety outranks stress
        assert_eq!(matcher.match_topic("anxious panic"), TopicKey::Panic);
        assert_eq!(matcher.match_topic("stressed and worried"), TopicKey::Anxiety);
    }

    #[test]
    fn test_deterministic() {
        let matcher = ResourceMatcher::new();
        for text in ["I am anxious about exams", "random words", "I want to die"] {
            let first = matcher.match_topic(text);
            for _ in 0..5 {
                assert_eq!(matcher.match_topic(text), first);
            }
        }
    }
}
