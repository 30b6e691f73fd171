//! User slash-command parser.
//!
//! Parses `/command arg1 arg2 ...` input lines into typed [`ParsedCommand`]
//! values that the event handler can act on.

/// A parsed user command. Each variant corresponds to a `/command`.
#[derive(Debug, PartialEq, Eq)]
pub enum ParsedCommand {
    Connect { name: String },
    Disconnect,
    Join { channel: String },
    Part { channel: Option<String> },
    Close,
    Msg { target: String, text: String },
    Query { nick: String },
    Nick { nick: String },
    Raw { line: String },
    Upper { text: String },
    Lower { text: String },
    Quit { message: Option<String> },
    Help,
}

/// Parse a slash-command string into a [`ParsedCommand`].
///
/// Returns `None` if the input does not start with `/` or is not a recognized
/// command. Command names are case-insensitive.
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    if !input.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = input[1..].splitn(2, ' ').collect();
    let cmd = parts.first()?.to_lowercase();
    let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd.as_str() {
        "connect" | "server" => {
            if rest.is_empty() {
                return None;
            }
            Some(ParsedCommand::Connect { name: rest.to_string() })
        }
        "disconnect" => Some(ParsedCommand::Disconnect),
        "join" | "j" => {
            if rest.is_empty() {
                return None;
            }
            let channel = if !rest.starts_with('#') && !rest.starts_with('&') {
                format!("#{}", rest)
            } else {
                rest.to_string()
            };
            Some(ParsedCommand::Join { channel })
        }
        "part" | "leave" => {
            let channel = if rest.is_empty() { None } else { Some(rest.to_string()) };
            Some(ParsedCommand::Part { channel })
        }
        "close" => Some(ParsedCommand::Close),
        "msg" => {
            let mut it = rest.splitn(2, ' ');
            let target = it.next().filter(|t| !t.is_empty())?.to_string();
            let text = it.next().unwrap_or("").to_string();
            Some(ParsedCommand::Msg { target, text })
        }
        "query" | "q" => {
            if rest.is_empty() {
                return None;
            }
            Some(ParsedCommand::Query { nick: rest.to_string() })
        }
        "nick" => {
            if rest.is_empty() {
                return None;
            }
            Some(ParsedCommand::Nick { nick: rest.to_string() })
        }
        "raw" | "quote" => {
            if rest.is_empty() {
                return None;
            }
            Some(ParsedCommand::Raw { line: rest.to_string() })
        }
        "upper" => Some(ParsedCommand::Upper { text: rest.to_string() }),
        "lower" => Some(ParsedCommand::Lower { text: rest.to_string() }),
        "quit" | "exit" => {
            let message = if rest.is_empty() { None } else { Some(rest.to_string()) };
            Some(ParsedCommand::Quit { message })
        }
        "help" | "h" => Some(ParsedCommand::Help),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_defaults_hash_prefix() {
        assert_eq!(
            parse_command("/join vy"),
            Some(ParsedCommand::Join { channel: "#vy".into() })
        );
        assert_eq!(
            parse_command("/JOIN #vy"),
            Some(ParsedCommand::Join { channel: "#vy".into() })
        );
    }

    #[test]
    fn test_msg_splits_target_and_text() {
        assert_eq!(
            parse_command("/msg nickserv identify hunter2"),
            Some(ParsedCommand::Msg {
                target: "nickserv".into(),
                text: "identify hunter2".into()
            })
        );
        assert_eq!(parse_command("/msg"), None);
    }

    #[test]
    fn test_raw_keeps_line_verbatim() {
        assert_eq!(
            parse_command("/raw PRIVMSG nickserv :identify x"),
            Some(ParsedCommand::Raw {
                line: "PRIVMSG nickserv :identify x".into()
            })
        );
    }

    #[test]
    fn test_case_commands() {
        assert_eq!(
            parse_command("/upper hello"),
            Some(ParsedCommand::Upper { text: "hello".into() })
        );
        assert_eq!(
            parse_command("/lower HELLO"),
            Some(ParsedCommand::Lower { text: "HELLO".into() })
        );
    }

    #[test]
    fn test_not_a_command() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/bogus"), None);
    }
}
