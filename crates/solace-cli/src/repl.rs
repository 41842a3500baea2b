use crate::commands::ReplCommand;
use crate::helper::CliHelper;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use solace_application::{Mutation, PipelineOrchestrator, SubmitRejection};
use solace_core::TopicKey;
use solace_core::session::Session;

/// Resolves a `/switch` or `/delete` argument against the `/sessions` listing:
/// a 1-based index, an exact id, or an unambiguous id prefix.
pub fn resolve_session(sessions: &[Session], reference: &str) -> Option<String> {
    if let Ok(index) = reference.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| sessions.get(i))
            .map(|session| session.id.clone());
    }
    if let Some(session) = sessions.iter().find(|session| session.id == reference) {
        return Some(session.id.clone());
    }
    let mut matches = sessions
        .iter()
        .filter(|session| session.id.starts_with(reference));
    match (matches.next(), matches.next()) {
        (Some(session), None) => Some(session.id.clone()),
        _ => None,
    }
}

fn report_persistence<T>(mutation: &Mutation<T>) {
    if mutation.persistence.is_some() {
        println!(
            "{}",
            "(Changes could not be saved; they are kept until you exit.)".yellow()
        );
    }
}

pub struct Repl {
    pipeline: PipelineOrchestrator,
}

impl Repl {
    pub fn new(pipeline: PipelineOrchestrator) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<()> {
        let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
        rl.set_helper(Some(CliHelper));

        println!("{}", "=== Solace ===".bright_magenta().bold());
        println!(
            "{}",
            format!(
                "Replies by: {}. Type /help for commands or /quit to exit.",
                self.pipeline.provider_name()
            )
            .bright_black()
        );
        println!();
        self.show_history().await;

        loop {
            match rl.readline(">> ") {
                Ok(line) => {
                    let command = ReplCommand::parse(&line);
                    if command == ReplCommand::Empty {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.trim());
                    if command == ReplCommand::Quit {
                        println!("{}", "Take care. Goodbye!".bright_green());
                        break;
                    }
                    self.dispatch(command).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                Err(err) => {
                    tracing::error!("[Repl] Readline failed: {:?}", err);
                    eprintln!("{}", format!("Error: {err:?}").red());
                    break;
                }
            }
        }

        Ok(())
    }

    async fn dispatch(&self, command: ReplCommand) {
        match command {
            ReplCommand::Message(text) => self.send(&text).await,
            ReplCommand::New => {
                let created = self.pipeline.create_session().await;
                report_persistence(&created);
                println!("{}", "Started a new conversation.".bright_green());
                self.show_history().await;
            }
            ReplCommand::Sessions => {
                let active_id = self.pipeline.active_session().await.id;
                render::print_sessions(&self.pipeline.sessions().await, &active_id);
            }
            ReplCommand::Switch(reference) => {
                let Some(id) = self.resolve(&reference).await else {
                    return;
                };
                let selected = self.pipeline.select_session(&id).await;
                report_persistence(&selected);
                self.show_history().await;
            }
            ReplCommand::Rename(title) => {
                let id = self.pipeline.active_session().await.id;
                let renamed = self.pipeline.rename_session(&id, &title).await;
                report_persistence(&renamed);
                println!("{}", format!("Renamed to \"{title}\".").bright_green());
            }
            ReplCommand::Delete(reference) => {
                let id = match reference {
                    Some(reference) => match self.resolve(&reference).await {
                        Some(id) => id,
                        None => return,
                    },
                    None => self.pipeline.active_session().await.id,
                };
                let deleted = self.pipeline.delete_session(&id).await;
                report_persistence(&deleted);
                if deleted.value {
                    println!("{}", "Conversation deleted.".bright_green());
                } else {
                    println!(
                        "{}",
                        "The last remaining conversation cannot be deleted.".yellow()
                    );
                }
            }
            ReplCommand::Another => self.another().await,
            ReplCommand::History => self.show_history().await,
            ReplCommand::Help => render::print_help(),
            ReplCommand::Usage(usage) => println!("{}", format!("Usage: {usage}").yellow()),
            ReplCommand::Unknown(command) => {
                println!(
                    "{}",
                    format!("Unknown command {command}. Type /help for the list.").bright_black()
                );
            }
            ReplCommand::Quit | ReplCommand::Empty => {}
        }
    }

    async fn send(&self, text: &str) {
        match self.pipeline.submit(text).await {
            Ok(outcome) => {
                render::print_reply(&outcome.reply);
                for notice in &outcome.notices {
                    render::print_notice(notice);
                }
            }
            Err(SubmitRejection::EmptyMessage) => {}
            Err(rejection) => println!("{}", rejection.to_string().yellow()),
        }
    }

    async fn another(&self) {
        let current = self
            .pipeline
            .active_session()
            .await
            .messages
            .iter()
            .rev()
            .find_map(|message| message.resource_key)
            .unwrap_or(TopicKey::GeneralResources);

        match self.pipeline.rotate_resource(current).await {
            Ok(outcome) => {
                render::print_reply(&outcome.reply);
                for notice in &outcome.notices {
                    render::print_notice(notice);
                }
            }
            Err(rejection) => println!("{}", rejection.to_string().yellow()),
        }
    }

    async fn resolve(&self, reference: &str) -> Option<String> {
        let resolved = resolve_session(&self.pipeline.sessions().await, reference);
        if resolved.is_none() {
            println!(
                "{}",
                format!("No conversation matches \"{reference}\". See /sessions.").yellow()
            );
        }
        resolved
    }

    async fn show_history(&self) {
        let session = self.pipeline.active_session().await;
        println!("{}", format!("--- {} ---", session.title).bright_magenta());
        for message in &session.messages {
            render::print_message(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions() -> Vec<Session> {
        let mut a = Session::new();
        a.id = "abc-111".to_string();
        let mut b = Session::new();
        b.id = "abd-222".to_string();
        vec![a, b]
    }

    #[test]
    fn test_resolve_by_index() {
        let sessions = sessions();
        assert_eq!(resolve_session(&sessions, "1"), Some("abc-111".to_string()));
        assert_eq!(resolve_session(&sessions, "2"), Some("abd-222".to_string()));
        assert_eq!(resolve_session(&sessions, "0"), None);
        assert_eq!(resolve_session(&sessions, "3"), None);
    }

    #[test]
    fn test_resolve_by_id_or_prefix() {
        let sessions = sessions();
        assert_eq!(
            resolve_session(&sessions, "abd-222"),
            Some("abd-222".to_string())
        );
        assert_eq!(resolve_session(&sessions, "abc"), Some("abc-111".to_string()));
        // ambiguous
        assert_eq!(resolve_session(&sessions, "ab"), None);
        assert_eq!(resolve_session(&sessions, "zzz"), None);
    }
}
