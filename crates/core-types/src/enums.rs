use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two formats a session can be played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Cash,
    Tournament,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Cash => "cash",
            SessionKind::Tournament => "tournament",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(SessionKind::Cash),
            "tournament" => Ok(SessionKind::Tournament),
            other => Err(CoreError::InvalidInput(
                "session kind".to_string(),
                other.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_case_insensitively() {
        assert_eq!("Cash".parse::<SessionKind>().unwrap(), SessionKind::Cash);
        assert_eq!(
            " TOURNAMENT ".parse::<SessionKind>().unwrap(),
            SessionKind::Tournament
        );
        assert!("sng".parse::<SessionKind>().is_err());
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(SessionKind::Cash.to_string(), "cash");
        assert_eq!(
            serde_json::to_string(&SessionKind::Tournament).unwrap(),
            "\"tournament\""
        );
    }
}
