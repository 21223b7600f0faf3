//! Conversion direction between Mainland and Taiwan terminology.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DirectionError;

/// Which of the two directional mappings is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Mainland (source) terms to Taiwan (target) terms.
    #[default]
    CnToTw,
    /// Taiwan terms back to Mainland terms.
    TwToCn,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CnToTw => "cn_to_tw",
            Self::TwToCn => "tw_to_cn",
        }
    }

    /// Human-readable label used in CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CnToTw => "簡體→繁體(台灣)",
            Self::TwToCn => "繁體(台灣)→簡體",
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Self::CnToTw => Self::TwToCn,
            Self::TwToCn => Self::CnToTw,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cn_to_tw" => Ok(Self::CnToTw),
            "tw_to_cn" => Ok(Self::TwToCn),
            other => Err(DirectionError::InvalidArgument {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_directions() {
        assert_eq!("cn_to_tw".parse::<Direction>().unwrap(), Direction::CnToTw);
        assert_eq!("tw_to_cn".parse::<Direction>().unwrap(), Direction::TwToCn);
    }

    #[test]
    fn rejects_unknown_direction() {
        let err = "CN_TO_TW".parse::<Direction>().unwrap_err();
        assert!(matches!(err, DirectionError::InvalidArgument { ref value } if value == "CN_TO_TW"));
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for d in [Direction::CnToTw, Direction::TwToCn] {
            assert_eq!(d.to_string().parse::<Direction>().unwrap(), d);
            assert_eq!(d.reversed().reversed(), d);
        }
    }
}
