//! Share target value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidShareTargetError;

/// Where a finished recording is handed off when shared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    /// Open with the desktop's default handler
    #[default]
    Open,
    /// Copy the file URI to the clipboard
    Clipboard,
    /// Sharing disabled
    None,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 3] = [ShareTarget::Open, ShareTarget::Clipboard, ShareTarget::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Clipboard => "clipboard",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ShareTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShareTarget {
    type Err = InvalidShareTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "clipboard" => Ok(Self::Clipboard),
            "none" | "off" => Ok(Self::None),
            _ => Err(InvalidShareTargetError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_targets() {
        for target in ShareTarget::ALL {
            assert_eq!(target.as_str().parse::<ShareTarget>().unwrap(), target);
        }
    }

    #[test]
    fn parse_aliases_and_case() {
        assert_eq!("OFF".parse::<ShareTarget>().unwrap(), ShareTarget::None);
        assert_eq!(" Clipboard ".parse::<ShareTarget>().unwrap(), ShareTarget::Clipboard);
    }

    #[test]
    fn parse_invalid() {
        let err = "airdrop".parse::<ShareTarget>().unwrap_err();
        assert_eq!(err.input, "airdrop");
    }

    #[test]
    fn default_is_open() {
        assert_eq!(ShareTarget::default(), ShareTarget::Open);
    }
}
