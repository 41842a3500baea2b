//! Crisis classification and redaction.

use super::patterns::{CRISIS_SET, CRISIS_SPANS};
use std::borrow::Cow;

/// Replacement for every redacted crisis span.
pub const REDACTION_TOKEN: &str = "[sensitive content]";

/// Upper bound on redaction passes. A single pass is enough for every
/// pattern in the library; the loop only exists so the output is checked.
const MAX_REDACTION_PASSES: usize = 8;

/// Stateless predicate and sanitizer over the crisis patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrisisClassifier;

impl CrisisClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Returns true if any crisis pattern matches anywhere in `text`.
    pub fn classify(&self, text: &str) -> bool {
        CRISIS_SET.is_match(text)
    }

    /// Replaces every crisis span with [`REDACTION_TOKEN`].
    ///
    /// Borrowed input comes back unchanged when nothing matched. The result
    /// never contains a crisis match.
    pub fn sanitize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !self.classify(text) {
            return Cow::Borrowed(text);
        }

        let mut current = CRISIS_SPANS.replace_all(text, REDACTION_TOKEN).into_owned();
        let mut passes = 1;
        while CRISIS_SET.is_match(&current) {
            if passes >= MAX_REDACTION_PASSES {
                // Nothing readable survives; keep only the marker.
                tracing::warn!("[Safety] Redaction did not converge, replacing whole text");
                return Cow::Owned(REDACTION_TOKEN.to_string());
            }
            current = CRISIS_SPANS
                .replace_all(&current, REDACTION_TOKEN)
                .into_owned();
            passes += 1;
        }

        Cow::Owned(current)
    }
}
