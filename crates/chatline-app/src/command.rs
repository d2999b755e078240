//! Slash-command parsing.
//!
//! A submitted line starting with `/` is a command. The command name is the
//! first whitespace-separated word and must match exactly; everything after
//! it is the argument string. Any other non-empty line is a chat message.

/// Marks a line as a command.
pub const COMMAND_MARKER: char = '/';

/// Usage shown when `/join` has no bundle.
pub const JOIN_USAGE: &str = "Usage: /join <intro_bundle_json>";

/// Parsed form of a submitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Nothing to do.
    Empty,
    /// Plain chat text.
    Message(&'a str),
    /// `/quit` or `/q`.
    Quit,
    /// `/join <bundle>`.
    Join {
        /// Intro bundle JSON, trimmed.
        bundle: &'a str,
    },
    /// `/bundle`.
    Bundle,
    /// `/help`.
    Help,
    /// A known command with missing arguments.
    InvalidArgs {
        /// Usage line to show.
        usage: &'static str,
    },
    /// Unrecognised `/` command, carrying the whole input.
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Classify a submitted line.
    pub fn parse(line: &'a str) -> Self {
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix(COMMAND_MARKER) else {
            return Self::Message(line);
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        match name {
            "quit" | "q" => Self::Quit,
            "join" if args.is_empty() => Self::InvalidArgs { usage: JOIN_USAGE },
            "join" => Self::Join { bundle: args },
            "bundle" => Self::Bundle,
            "help" => Self::Help,
            _ => Self::Unknown(line),
        }
    }
}
