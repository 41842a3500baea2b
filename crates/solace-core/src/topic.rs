//! Support topics and the static resource catalog.
//!
//! A [`TopicKey`] labels the resource category a reply points at. The set is
//! closed: persisted or user supplied strings are parsed with `FromStr` and
//! anything unknown is rejected at the boundary.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Closed set of support topics.
///
/// Declaration order is the rotation order used by "another resource".
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TopicKey {
    Anxiety,
    Depression,
    Panic,
    Stress,
    Bipolar,
    Ptsd,
    Breathing,
    Music,
    Crisis,
    GeneralResources,
}

/// Where the host application should route for a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationTarget {
    /// A dedicated content page.
    Page { path: &'static str },
    /// A section of the shared resource hub.
    Hub { section: &'static str },
}

impl std::fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationTarget::Page { path } => write!(f, "{path}"),
            NavigationTarget::Hub { section } => write!(f, "/resources#{section}"),
        }
    }
}

/// Display metadata for a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicResource {
    pub title: &'static str,
    pub description: &'static str,
    pub navigation: NavigationTarget,
}

static ANXIETY: TopicResource = TopicResource {
    title: "Understanding Anxiety",
    description: "What anxiety feels like, why it happens, and everyday ways to ease it.",
    navigation: NavigationTarget::Page { path: "/anxiety" },
};

static DEPRESSION: TopicResource = TopicResource {
    title: "Coping with Depression",
    description: "Recognising low mood and small steps that help on heavy days.",
    navigation: NavigationTarget::Page { path: "/depression" },
};

static PANIC: TopicResource = TopicResource {
    title: "Managing Panic Attacks",
    description: "Grounding techniques for riding out a panic attack.",
    navigation: NavigationTarget::Page { path: "/panic" },
};

static STRESS: TopicResource = TopicResource {
    title: "Stress Management",
    description: "Practical ways to lower day-to-day pressure at work and school.",
    navigation: NavigationTarget::Page { path: "/stress" },
};

static BIPOLAR: TopicResource = TopicResource {
    title: "Living with Bipolar Disorder",
    description: "Mood episodes, routines and working with a care team.",
    navigation: NavigationTarget::Page { path: "/bipolar" },
};

static PTSD: TopicResource = TopicResource {
    title: "PTSD and Trauma",
    description: "How trauma affects the body and mind, and paths toward recovery.",
    navigation: NavigationTarget::Page { path: "/ptsd" },
};

static BREATHING: TopicResource = TopicResource {
    title: "Breathing Exercises",
    description: "Guided box breathing and 4-7-8 breathing to calm the body.",
    navigation: NavigationTarget::Hub {
        section: "breathing",
    },
};

static MUSIC: TopicResource = TopicResource {
    title: "Calming Music and Sounds",
    description: "Relaxing playlists and ambient sounds for winding down.",
    navigation: NavigationTarget::Hub { section: "music" },
};

static CRISIS: TopicResource = TopicResource {
    title: "Crisis Support",
    description: "Immediate, free, confidential help from trained counsellors, any time of day.",
    navigation: NavigationTarget::Hub { section: "crisis" },
};

static GENERAL_RESOURCES: TopicResource = TopicResource {
    title: "Mental Health Resources",
    description: "Articles, tools and helplines for looking after your wellbeing.",
    navigation: NavigationTarget::Hub { section: "general" },
};

impl TopicKey {
    /// Static display record for this topic.
    pub fn resource(self) -> &'static TopicResource {
        match self {
            TopicKey::Anxiety => &ANXIETY,
            TopicKey::Depression => &DEPRESSION,
            TopicKey::Panic => &PANIC,
            TopicKey::Stress => &STRESS,
            TopicKey::Bipolar => &BIPOLAR,
            TopicKey::Ptsd => &PTSD,
            TopicKey::Breathing => &BREATHING,
            TopicKey::Music => &MUSIC,
            TopicKey::Crisis => &CRISIS,
            TopicKey::GeneralResources => &GENERAL_RESOURCES,
        }
    }

    pub fn title(self) -> &'static str {
        self.resource().title
    }

    /// Next key in the fixed cyclic rotation order.
    ///
    /// Starting from any key and following `next_in_rotation` visits every
    /// key once before coming back, and never returns `self`.
    pub fn next_in_rotation(self) -> TopicKey {
        let all: Vec<TopicKey> = TopicKey::iter().collect();
        let position = all.iter().position(|key| *key == self).unwrap_or(0);
        all[(position + 1) % all.len()]
    }

    /// Number of topics in the closed set.
    pub fn count() -> usize {
        TopicKey::iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    #[test]
    fn test_kebab_case_round_trip() {
        assert_eq!(TopicKey::GeneralResources.to_string(), "general-resources");
        assert_eq!(
            TopicKey::from_str("general-resources").unwrap(),
            TopicKey::GeneralResources
        );
        assert_eq!(
            serde_json::to_string(&TopicKey::Ptsd).unwrap(),
            "\"ptsd\""
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(TopicKey::from_str("astrology").is_err());
        assert!(serde_json::from_str::<TopicKey>("\"astrology\"").is_err());
    }

    #[test]
    fn test_rotation_visits_every_key_once() {
        for start in TopicKey::iter() {
            let mut seen = HashSet::new();
            let mut current = start;
            for _ in 0..TopicKey::count() {
                let next = current.next_in_rotation();
                assert_ne!(next, current);
                assert!(seen.insert(next), "{next} visited twice from {start}");
                current = next;
            }
            assert_eq!(seen.len(), TopicKey::count());
            assert_eq!(current, start);
        }
    }

    #[test]
    fn test_every_topic_has_a_resource() {
        for key in TopicKey::iter() {
            let resource = key.resource();
            assert!(!resource.title.is_empty());
            assert!(!resource.description.is_empty());
        }
        assert_eq!(
            TopicKey::Breathing.resource().navigation.to_string(),
            "/resources#breathing"
        );
        assert_eq!(TopicKey::Anxiety.resource().navigation.to_string(), "/anxiety");
    }
}
