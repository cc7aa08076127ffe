//! Interactive session commands read from stdin

use std::str::FromStr;

use thiserror::Error;

/// A single-word command typed in an interactive session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start recording, or stop if recording
    Record,
    /// Play the recording, or stop if playing
    Play,
    Share,
    Help,
    Quit,
}

#[derive(Debug, Clone, Error)]
#[error("Unknown command '{input}'. Type 'h' for help")]
pub struct UnknownCommandError {
    pub input: String,
}

impl FromStr for SessionCommand {
    type Err = UnknownCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "r" | "record" => Ok(Self::Record),
            "p" | "play" => Ok(Self::Play),
            "s" | "share" => Ok(Self::Share),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            _ => Err(UnknownCommandError {
                input: s.trim().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_and_long_forms() {
        assert_eq!("r".parse::<SessionCommand>().unwrap(), SessionCommand::Record);
        assert_eq!("record".parse::<SessionCommand>().unwrap(), SessionCommand::Record);
        assert_eq!("p".parse::<SessionCommand>().unwrap(), SessionCommand::Play);
        assert_eq!("share".parse::<SessionCommand>().unwrap(), SessionCommand::Share);
        assert_eq!("?".parse::<SessionCommand>().unwrap(), SessionCommand::Help);
        assert_eq!("exit".parse::<SessionCommand>().unwrap(), SessionCommand::Quit);
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!("  Q \n".parse::<SessionCommand>().unwrap(), SessionCommand::Quit);
    }

    #[test]
    fn parse_unknown() {
        let err = "dance".parse::<SessionCommand>().unwrap_err();
        assert_eq!(err.input, "dance");
        assert!(err.to_string().contains("help"));
    }
}
