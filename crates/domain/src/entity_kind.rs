use std::fmt;

use serde::{Deserialize, Serialize};

/// Object categories the authorization engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Thing,
    Room,
    Exit,
    Division,
}

impl EntityKind {
    pub fn is_division(self) -> bool {
        self == EntityKind::Division
    }

    /// Players are the higher-order actors: they own other objects and
    /// moving them between divisions moves their belongings too.
    pub fn is_player(self) -> bool {
        self == EntityKind::Player
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Player => "PLAYER",
            EntityKind::Thing => "THING",
            EntityKind::Room => "ROOM",
            EntityKind::Exit => "EXIT",
            EntityKind::Division => "DIVISION",
        };
        write!(f, "{}", name)
    }
}
