//! Static pattern library.
//!
//! Crisis patterns are deliberately over-inclusive: a false positive costs a
//! canned resource message, a false negative is not acceptable. All patterns
//! are compiled once, case-insensitively, and may match inside longer words.

use crate::topic::TopicKey;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};

/// Self-harm, suicide and violence indicators, including misspellings and
/// euphemisms.
pub const CRISIS_PATTERNS: &[&str] = &[
    r"su+i?c+i?d\w*",
    r"\bkill(?:ing|ed)?\s*(?:my\s*self|me\b)",
    r"\bkms\b",
    r"\bend(?:ing)?\s+(?:my|it)\s*(?:own\s+)?(?:life|all)",
    r"\btak(?:e|ing)\s+my\s+(?:own\s+)?life",
    r"\b(?:want|wanna|wish|going)\s+(?:to\s+)?(?:die|be\s+dead)",
    r"\bwish\s+i\s+(?:was|were)\s+(?:dead|never\s+born)",
    r"\bbetter\s+off\s+dead",
    r"\bno\s+reason\s+to\s+(?:live|go\s+on)",
    r"\bdon'?t\s+want\s+to\s+(?:live|be\s+alive|exist|wake\s+up)",
    r"self[\s-]*harm\w*",
    r"\bun[\s-]*aliv\w*",
    r"sewer\s*slide",
    r"\bhurt(?:ing)?\s+(?:my\s*self|others|someone|somebody|people)",
    r"\bcut(?:ting)?\s+(?:my\s*self|my\s+(?:wrists?|arms?|legs?))",
    r"\bhang(?:ing)?\s+my\s*self",
    r"\boverdos\w*",
    r"\bkill(?:ing)?\s+(?:him|her|them|someone|somebody|people|everyone|everybody)\b",
    r"\bshoot(?:ing)?\s+(?:up\s+)?(?:the\s+|my\s+)?(?:school|people|someone|everyone)",
];

/// Topic patterns in match priority order: the first group with a hit wins.
pub const TOPIC_PATTERNS: &[(TopicKey, &[&str])] = &[
    (
        TopicKey::Panic,
        &[
            r"panic\w*",
            r"heart\s+(?:is\s+)?(?:racing|pounding)",
            r"can'?t\s+breathe",
        ],
    ),
    (
        TopicKey::Breathing,
        &[r"breath\w*", r"\binhal\w*", r"\bexhal\w*", r"calm\s+down"],
    ),
    (
        TopicKey::Music,
        &[
            r"music\w*",
            r"\bsongs?\b",
            r"playlist\w*",
            r"\bsounds?\b",
            r"\bmelod\w*",
            r"\blisten\w*",
        ],
    ),
    (
        TopicKey::Ptsd,
        &[r"ptsd", r"trauma\w*", r"flash\s*backs?", r"nightmares?"],
    ),
    (
        TopicKey::Bipolar,
        &[r"bipolar", r"\bmania\b", r"\bmanic\b", r"mood\s+swings?"],
    ),
    (
        TopicKey::Anxiety,
        &[
            r"anxi\w*",
            r"\bworr\w*",
            r"nervous\w*",
            r"\bon\s+edge\b",
            r"overthink\w*",
        ],
    ),
    (
        TopicKey::Depression,
        &[
            r"depress\w*",
            r"hopeless\w*",
            r"\bsad(?:ness)?\b",
            r"\bempty\b",
            r"\blonely\b",
            r"worthless\w*",
            r"\bnumb\b",
        ],
    ),
    (
        TopicKey::Stress,
        &[
            r"stress\w*",
            r"overwhelm\w*",
            r"burn(?:ed|t)?\s*out",
            r"\bpressure\w*",
            r"\bdeadlines?\b",
        ],
    ),
];

/// Any-match set over [`CRISIS_PATTERNS`].
pub static CRISIS_SET: Lazy<RegexSet> = Lazy::new(|| {
    RegexSetBuilder::new(CRISIS_PATTERNS)
        .case_insensitive(true)
        .build()
        .expect("crisis patterns are static and valid")
});

/// Single alternation over [`CRISIS_PATTERNS`], used to locate spans.
pub static CRISIS_SPANS: Lazy<Regex> = Lazy::new(|| {
    let alternation = CRISIS_PATTERNS
        .iter()
        .map(|pattern| format!("(?:{pattern})"))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()
        .expect("crisis patterns are static and valid")
});

/// Compiled topic groups, same order as [`TOPIC_PATTERNS`].
pub static TOPIC_RULES: Lazy<Vec<(TopicKey, RegexSet)>> = Lazy::new(|| {
    TOPIC_PATTERNS
        .iter()
        .map(|(key, patterns)| {
            let set = RegexSetBuilder::new(*patterns)
                .case_insensitive(true)
                .build()
                .expect("topic patterns are static and valid");
            (*key, set)
        })
        .collect()
});
