//! Command parsing for the command line

/// Parsed command from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask a question: :ask <question>
    Ask(String),
    /// Back to the subject list: :subjects
    Subjects,
    /// Open a subject's chapters: :chapters <subject-id>
    Chapters(String),
    /// Open a chapter: :chapter <chapter-id>
    Chapter(String),
    /// Jump to a topic by number: :topic <n>
    Topic(usize),
    /// Next topic: :next or :n
    Next,
    /// Previous topic: :prev or :p
    Previous,
    /// Refetch the current screen: :reload or :r
    Reload,
    /// Quit the application: :q or :quit
    Quit,
    /// Show help: :help or :h
    Help,
    /// Clear message: (empty command)
    Nop,
}

/// Result of parsing a command
#[derive(Debug)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
    /// Argument could not be understood
    InvalidArgument { command: String, argument: String },
}

fn required(name: &str, args: &str, build: impl FnOnce(String) -> Command) -> ParseResult {
    if args.is_empty() {
        ParseResult::MissingArgument(name.to_string())
    } else {
        ParseResult::Ok(build(args.to_string()))
    }
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    // Split into command and arguments
    let mut parts = input.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim()).unwrap_or("");

    match cmd.to_lowercase().as_str() {
        "ask" | "a" => required("ask", args, Command::Ask),
        "subjects" | "home" => ParseResult::Ok(Command::Subjects),
        "chapters" | "subject" => required("chapters", args, Command::Chapters),
        "chapter" | "c" => required("chapter", args, Command::Chapter),
        "topic" | "t" => {
            if args.is_empty() {
                return ParseResult::MissingArgument("topic".to_string());
            }
            match args.parse::<usize>() {
                Ok(n) if n > 0 => ParseResult::Ok(Command::Topic(n)),
                _ => ParseResult::InvalidArgument {
                    command: "topic".to_string(),
                    argument: args.to_string(),
                },
            }
        }
        "next" | "n" => ParseResult::Ok(Command::Next),
        "prev" | "previous" | "p" => ParseResult::Ok(Command::Previous),
        "reload" | "r" => ParseResult::Ok(Command::Reload),
        "quit" | "q" => ParseResult::Ok(Command::Quit),
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        _ => ParseResult::UnknownCommand(cmd.to_string()),
    }
}
