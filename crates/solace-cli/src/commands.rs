//! REPL input parsing.

/// Slash commands offered by completion and hints.
pub const COMMANDS: &[&str] = &[
    "/new",
    "/sessions",
    "/switch",
    "/rename",
    "/delete",
    "/another",
    "/history",
    "/help",
    "/quit",
];

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    New,
    Sessions,
    /// 1-based listing index or (prefix of) a session id.
    Switch(String),
    Rename(String),
    Delete(Option<String>),
    Another,
    History,
    Help,
    Quit,
    /// Plain text for the pipeline.
    Message(String),
    Unknown(String),
    /// A command missing its argument.
    Usage(&'static str),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ReplCommand::Empty;
        }
        if !trimmed.starts_with('/') {
            return ReplCommand::Message(trimmed.to_string());
        }

        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        match command {
            "/new" => ReplCommand::New,
            "/sessions" => ReplCommand::Sessions,
            "/switch" => argument
                .map(ReplCommand::Switch)
                .unwrap_or(ReplCommand::Usage("/switch <number|id>")),
            // An empty title is allowed
            "/rename" => ReplCommand::Rename(rest.to_string()),
            "/delete" => ReplCommand::Delete(argument),
            "/another" => ReplCommand::Another,
            "/history" => ReplCommand::History,
            "/help" => ReplCommand::Help,
            "/quit" | "/exit" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}
