//! Builds provider requests from session history.

use solace_core::TopicKey;
use solace_core::provider::{ProviderRequest, ProviderTurn, TurnRole};
use solace_core::safety::CrisisClassifier;
use solace_core::session::{MessageRole, Session};

/// Default number of trailing session messages sent as context.
pub const DEFAULT_HISTORY_WINDOW: usize = 8;

/// Behavioral constraints sent ahead of every conversation.
pub const SYSTEM_PREAMBLE: &str = "You are a gentle, supportive wellbeing companion in a \
self-help chat. Keep every reply short: two to four sentences of warm, empathetic \
listening. Never diagnose, never suggest medication, and never agree with statements \
that could lead to harm. Do not ask follow-up questions. Do not add disclaimers; the app \
shows its own. Always end with one sentence pointing the user to the resources linked \
below your reply.";

/// Turns the last K messages of a session plus a new user message into a
/// [`ProviderRequest`].
///
/// The produced turns never hold two consecutive assistant turns, never
/// start with an assistant turn, and always end with the new user turn.
/// Resource metadata on messages is never forwarded, and neither are
/// stored crisis messages or the crisis replies that answered them.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    history_window: usize,
    system_preamble: String,
    classifier: CrisisClassifier,
}

impl ContextBuilder {
    pub fn new(history_window: usize) -> Self {
        Self {
            history_window,
            system_preamble: SYSTEM_PREAMBLE.to_string(),
            classifier: CrisisClassifier::new(),
        }
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.system_preamble = preamble.into();
        self
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn build(&self, session: &Session, new_user_text: &str) -> ProviderRequest {
        let start = session.messages.len().saturating_sub(self.history_window);
        let mut turns: Vec<ProviderTurn> = Vec::with_capacity(self.history_window + 1);

        for message in &session.messages[start..] {
            let turn = match message.role {
                MessageRole::User if self.classifier.classify(&message.text) => {
                    tracing::debug!("[ContextBuilder] Withholding a crisis turn in {}", session.id);
                    continue;
                }
                MessageRole::Assistant if message.resource_key == Some(TopicKey::Crisis) => {
                    continue;
                }
                MessageRole::User => ProviderTurn::user(&message.text),
                MessageRole::Assistant => ProviderTurn::assistant(&message.text),
            };
            match (turns.last_mut(), turn.role) {
                // Keep only the newest of back-to-back assistant turns
                (Some(last), TurnRole::Assistant) if last.role == TurnRole::Assistant => {
                    *last = turn;
                }
                // History starts with the user
                (None, TurnRole::Assistant) => {}
                _ => turns.push(turn),
            }
        }

        if turns.last().is_some_and(|turn| turn.role == TurnRole::Assistant) {
            turns.pop();
        }
        turns.push(ProviderTurn::user(new_user_text));

        ProviderRequest {
            system_preamble: self.system_preamble.clone(),
            turns,
        }
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::session::Message;

    fn assert_alternation(request: &ProviderRequest) {
        let roles: Vec<TurnRole> = request.turns.iter().map(|t| t.role).collect();
        assert_eq!(roles.last(), Some(&TurnRole::User));
        assert_eq!(roles.first(), Some(&TurnRole::User));
        for pair in roles.windows(2) {
            assert!(
                !(pair[0] == TurnRole::Assistant && pair[1] == TurnRole::Assistant),
                "consecutive assistant turns in {roles:?}"
            );
        }
    }

    #[test]
    fn test_fresh_session_yields_single_user_turn() {
        let request = ContextBuilder::default().build(&Session::new(), "I am anxious about exams");
        assert_eq!(request.system_preamble, SYSTEM_PREAMBLE);
        assert_eq!(request.turns, vec![ProviderTurn::user("I am anxious about exams")]);
    }

    #[test]
    fn test_trailing_assistant_turn_is_dropped() {
        let mut session = Session::new();
        session.messages.push(Message::user("hi"));
        session.messages.push(Message::assistant("hello", Some(TopicKey::Music)));

        let request = ContextBuilder::default().build(&session, "again");
        assert_eq!(
            request.turns,
            vec![ProviderTurn::user("hi"), ProviderTurn::user("again")]
        );
    }

    #[test]
    fn test_assistant_runs_collapse_to_newest() {
        let mut session = Session::new();
        session.messages.push(Message::user("one"));
        session.messages.push(Message::assistant("first reply", None));
        session.messages.push(Message::assistant("another resource", None));
        session.messages.push(Message::user("two"));
        session.messages.push(Message::assistant("second reply", None));

        let request = ContextBuilder::default().build(&session, "three");
        assert_eq!(
            request.turns,
            vec![
                ProviderTurn::user("one"),
                ProviderTurn::assistant("another resource"),
                ProviderTurn::user("two"),
                ProviderTurn::user("three"),
            ]
        );
    }

    #[test]
    fn test_crisis_exchange_is_withheld() {
        let mut session = Session::new();
        session.messages.push(Message::user("exams are close"));
        session.messages.push(Message::assistant("that sounds stressful", None));
        session.messages.push(Message::user("I want to kill myself"));
        session
            .messages
            .push(Message::assistant("please call 988", Some(TopicKey::Crisis)));

        let request = ContextBuilder::default().build(&session, "I am anxious about exams");
        assert_eq!(
            request.turns,
            vec![
                ProviderTurn::user("exams are close"),
                ProviderTurn::user("I am anxious about exams"),
            ]
        );
        assert_alternation(&request);
    }

    #[test]
    fn test_window_limits_history() {
        let mut session = Session::new();
        for i in 0..20 {
            session.messages.push(Message::user(format!("u{i}")));
            session.messages.push(Message::assistant(format!("a{i}"), None));
        }

        let request = ContextBuilder::new(4).build(&session, "new");
        assert_eq!(
            request.turns,
            vec![
                ProviderTurn::user("u18"),
                ProviderTurn::assistant("a18"),
                ProviderTurn::user("u19"),
                ProviderTurn::user("new"),
            ]
        );
    }

    #[test]
    fn test_alternation_holds_for_any_history_shape() {
        // Every role sequence up to length 7
        for len in 0..=7usize {
            for bits in 0..(1u32 << len) {
                let mut session = Session::new();
                session.messages.clear();
                for i in 0..len {
                    if bits & (1 << i) == 0 {
                        session.messages.push(Message::user(format!("u{i}")));
                    } else {
                        session.messages.push(Message::assistant(format!("a{i}"), None));
                    }
                }
                for window in [0, 1, 3, DEFAULT_HISTORY_WINDOW] {
                    let request = ContextBuilder::new(window).build(&session, "now");
                    assert_alternation(&request);
                    assert_eq!(request.last_user_text(), Some("now"));
                }
            }
        }
    }
}
