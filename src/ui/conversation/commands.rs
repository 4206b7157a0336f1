use std::str::FromStr;

use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
/// They are handled locally and never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SlashCommand {
    /// Show or hide the key and command reference
    Help,
    /// Exit the application
    Bye,
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Help => "show or hide this help",
            SlashCommand::Bye => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Parse a slash command from user input.
///
/// Returns `None` for ordinary text and for unknown commands, so a question
/// that happens to start with '/' is still sent as a query.
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    let head = trimmed.strip_prefix('/')?;
    if head.split_whitespace().count() != 1 {
        return None;
    }

    SlashCommand::from_str(head).ok().or_else(|| match head.to_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(SlashCommand::Bye),
        "h" | "?" => Some(SlashCommand::Help),
        _ => None,
    })
}

/// Help text for keys and commands
pub fn get_help_text() -> String {
    let mut help = String::from("Keys:\n");
    help.push_str("  Enter           send your question\n");
    help.push_str("  Shift+Enter     new line\n");
    help.push_str("  Esc / Ctrl+C    quit\n\n");
    help.push_str("Commands:\n");
    for command in SlashCommand::iter() {
        help.push_str(&format!("  /{:<14} {}\n", command.command(), command.description()));
    }
    help.push_str("\nAliases: /q, /quit, /exit for /bye; /h, /? for /help");

    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(parse_slash_command("/help"), Some(SlashCommand::Help));
        assert_eq!(parse_slash_command(" /bye "), Some(SlashCommand::Bye));
        assert_eq!(parse_slash_command("/q"), Some(SlashCommand::Bye));
        assert_eq!(parse_slash_command("/EXIT"), Some(SlashCommand::Bye));
        assert_eq!(parse_slash_command("/?"), Some(SlashCommand::Help));
        assert_eq!(parse_slash_command("/HELP"), Some(SlashCommand::Help));
        assert_eq!(parse_slash_command("/Bye"), Some(SlashCommand::Bye));
    }

    #[test]
    fn ordinary_text_is_not_a_command() {
        assert_eq!(parse_slash_command("help"), None);
        assert_eq!(parse_slash_command("/unknown"), None);
        assert_eq!(parse_slash_command("/help me with chest pain"), None);
        assert_eq!(parse_slash_command("/"), None);
    }

    #[test]
    fn help_lists_every_command() {
        let help = get_help_text();
        for command in SlashCommand::iter() {
            assert!(help.contains(&format!("/{}", command.command())));
        }
    }
}
