use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Workflow status carried on a card. Independent of board membership.
///
/// Values this client does not know are kept verbatim in `Other` and written
/// back unchanged, so saving a card never rewrites its status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
    Other(String),
}

impl CardStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CardStatus::Todo => "todo",
            CardStatus::InProgress => "in_progress",
            CardStatus::Review => "review",
            CardStatus::Done => "done",
            CardStatus::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CardStatus::Other(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, CardStatus::Done)
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strict parse for user input; wire values go through `From<String>`.
impl FromStr for CardStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(CardStatus::Todo),
            "in_progress" => Ok(CardStatus::InProgress),
            "review" => Ok(CardStatus::Review),
            "done" => Ok(CardStatus::Done),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl From<String> for CardStatus {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or(CardStatus::Other(raw))
    }
}

impl From<CardStatus> for String {
    fn from(status: CardStatus) -> Self {
        match status {
            CardStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for status in [
            CardStatus::Todo,
            CardStatus::InProgress,
            CardStatus::Review,
            CardStatus::Done,
        ] {
            assert_eq!(status.as_str().parse::<CardStatus>(), Ok(status.clone()));
        }
        assert!("archived".parse::<CardStatus>().is_err());
    }

    #[test]
    fn test_unrecognised_wire_status() {
        let status: CardStatus = serde_json::from_str("\"blocked\"").unwrap();
        assert_eq!(status, CardStatus::Other("blocked".into()));
        assert!(!status.is_known());
        assert!(!status.is_closed());
    }

    #[test]
    fn test_unrecognised_status_is_written_back_verbatim() {
        let status: CardStatus = serde_json::from_str("\"blocked\"").unwrap();
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"blocked\"");
        assert_eq!(serde_json::to_string(&CardStatus::InProgress).unwrap(), "\"in_progress\"");
    }
}
