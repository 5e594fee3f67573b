//! Player competitive classes.
//!
//! Classes are ordered `A > B > C > D > E`: `A` is the most competitive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A player's competitive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerClass {
    A,
    B,
    C,
    D,
    E,
}

/// All classes from most to least competitive.
pub const ALL_CLASSES: [PlayerClass; 5] = [
    PlayerClass::A,
    PlayerClass::B,
    PlayerClass::C,
    PlayerClass::D,
    PlayerClass::E,
];

/// Class assigned to newly registered players when none is given.
pub const DEFAULT_CLASS: PlayerClass = PlayerClass::E;

impl PlayerClass {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerClass::A => "A",
            PlayerClass::B => "B",
            PlayerClass::C => "C",
            PlayerClass::D => "D",
            PlayerClass::E => "E",
        }
    }
}

impl fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(PlayerClass::A),
            "B" => Ok(PlayerClass::B),
            "C" => Ok(PlayerClass::C),
            "D" => Ok(PlayerClass::D),
            "E" => Ok(PlayerClass::E),
            other => Err(format!(
                "Invalid class '{other}'. Must be one of: A, B, C, D, E"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_class() {
        for class in ALL_CLASSES {
            assert_eq!(class.as_str().parse::<PlayerClass>(), Ok(class));
        }
    }

    #[test]
    fn lowercase_is_rejected() {
        let err = "a".parse::<PlayerClass>().unwrap_err();
        assert!(err.contains("Invalid class"));
    }
}
