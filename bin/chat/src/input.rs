//! Parsing of terminal input lines.

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain chat text.
    Chat(String),
    /// `/agent`: request a live agent.
    LiveAgent,
    /// `/callback [number]`: request a phone callback.
    Callback(Option<String>),
    /// `/cancel`: leave the callback prompt.
    Cancel,
    /// `/help`.
    Help,
    /// `/quit` or `/exit`.
    Quit,
    /// Any other `/word`.
    Unknown(String),
}

/// Help text listing the commands.
pub const HELP: &str = "\
Type a message and press Enter to send it.
  /agent             request a live agent
  /callback [phone]  request a phone callback
  /cancel            leave the callback prompt
  /help              show this help
  /quit              end the chat";

/// Parses one line of input.
#[must_use]
pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Chat(trimmed.to_string());
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };
    match name.to_ascii_lowercase().as_str() {
        "agent" => Command::LiveAgent,
        "callback" if argument.is_empty() => Command::Callback(None),
        "callback" => Command::Callback(Some(argument.to_string())),
        "cancel" => Command::Cancel,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(
            parse("  my vpn is down \n"),
            Command::Chat("my vpn is down".to_string())
        );
    }

    #[test]
    fn blank_line_is_empty_chat() {
        assert_eq!(parse("   "), Command::Chat(String::new()));
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse("/AGENT"), Command::LiveAgent);
        assert_eq!(parse("/Quit"), Command::Quit);
        assert_eq!(parse("/exit"), Command::Quit);
    }

    #[test]
    fn callback_takes_optional_number() {
        assert_eq!(parse("/callback"), Command::Callback(None));
        assert_eq!(parse("/callback    "), Command::Callback(None));
        assert_eq!(
            parse("/callback  555-0100 ext 2"),
            Command::Callback(Some("555-0100 ext 2".to_string()))
        );
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(parse("/reboot now"), Command::Unknown("reboot".to_string()));
    }
}
