//! Locally generated assistant replies.
//!
//! None of these may contain a crisis pattern; the tests below check it.

use solace_core::TopicKey;

/// Reply to any message that trips the crisis classifier.
pub const CRISIS_RESPONSE: &str = "I'm really sorry you're feeling this way, and I'm glad \
you told me. You deserve support right now from someone who can help. Please call or text \
988 to reach the 988 Lifeline (US), text HOME to 741741 to reach the Crisis Text Line, or \
call your local emergency number if you are in immediate danger. You don't have to go \
through this alone.";

/// Reply to the bare "help" command.
pub const HELP_TEXT: &str = "I'm a support companion. Tell me how you're feeling and I'll \
listen and point you to something helpful. I can share resources on anxiety, depression, \
panic attacks, stress, bipolar disorder, PTSD, breathing exercises and calming music. Ask \
for another resource any time to see a different one. If things ever feel unsafe, call or \
text 988 or your local emergency number.";

/// Whether `text` is the bare help command.
pub fn is_help_command(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("help")
}

/// Reply used when the completion provider fails.
pub fn fallback_text(topic: TopicKey) -> String {
    format!(
        "I'm sorry, I'm having trouble responding right now, but I'm still here with you. \
In the meantime, our \"{}\" page may help, and you can keep talking to me whenever you're ready.",
        topic.title()
    )
}

/// Reply citing `topic` for an "another resource" request.
pub fn rotation_text(topic: TopicKey) -> String {
    let resource = topic.resource();
    format!(
        "Here's another resource that might help: \"{}\". {}",
        resource.title, resource.description
    )
}
