//! Terminal rendering of messages, sessions and notices.

use colored::Colorize;
use solace_application::{Notice, SAFETY_DISCLAIMER};
use solace_core::session::{Message, MessageRole, Session};

pub fn print_message(message: &Message) {
    match message.role {
        MessageRole::User => println!("{} {}", "You:".green().bold(), message.text.green()),
        MessageRole::Assistant => print_reply(message),
    }
}

/// An assistant reply with its suggested resource and the disclaimer.
pub fn print_reply(message: &Message) {
    println!("{}", "Solace:".bright_blue().bold());
    for line in message.text.lines() {
        println!("  {}", line.bright_blue());
    }
    if let Some(key) = message.resource_key {
        let resource = key.resource();
        println!(
            "  {} {} {}",
            "Suggested:".yellow(),
            resource.title.yellow().bold(),
            format!("({})", resource.navigation).bright_black()
        );
    }
    println!("  {}", SAFETY_DISCLAIMER.bright_black().italic());
    println!();
}

pub fn print_notice(notice: &Notice) {
    let text = match notice {
        Notice::ProviderUnavailable { .. } => {
            "The assistant is unavailable right now, so this is a standard reply."
        }
        Notice::PersistenceFailed { .. } => {
            "This conversation could not be saved; it is kept until you exit."
        }
    };
    println!("{}", format!("({text})").yellow());
}

pub fn print_sessions(sessions: &[Session], active_id: &str) {
    println!("{}", "Sessions:".bright_magenta().bold());
    for (index, session) in sessions.iter().enumerate() {
        let marker = if session.id == active_id { "*" } else { " " };
        let title = if session.title.is_empty() {
            "(untitled)".to_string()
        } else {
            session.title.clone()
        };
        println!(
            "{} {:>2}. {} {}",
            marker.bright_green(),
            index + 1,
            title,
            format!(
                "[{} messages, {}]",
                session.messages.len(),
                session.last_active_at.format("%Y-%m-%d %H:%M")
            )
            .bright_black()
        );
    }
}

pub fn print_help() {
    println!("{}", "Commands:".bright_magenta().bold());
    for (command, text) in [
        ("/new", "start a new conversation"),
        ("/sessions", "list conversations"),
        ("/switch <n|id>", "switch to a conversation"),
        ("/rename <title>", "rename the current conversation"),
        ("/delete [n|id]", "delete a conversation (default: current)"),
        ("/another", "suggest a different resource"),
        ("/history", "show the current conversation"),
        ("/help", "show this list"),
        ("/quit", "exit"),
    ] {
        println!("  {} {}", format!("{command:<18}").bright_cyan(), text);
    }
    println!(
        "{}",
        "Anything else is sent as a message. Type \"help\" to ask Solace what it can do."
            .bright_black()
    );
}
