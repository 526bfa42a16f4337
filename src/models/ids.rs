//! Upstream identifiers.
//!
//! The fantasy API identifies everything by plain integers. Wrapping them
//! keeps an entry id from being passed where a league id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl From<$inner> for $name {
            fn from(v: $inner) -> Self {
                Self(v)
            }
        }
    };
}

numeric_id!(
    /// A fantasy team (manager entry).
    EntryId(u64)
);

numeric_id!(
    /// A classic or head-to-head league.
    LeagueId(u64)
);

numeric_id!(
    /// A real-world player ("element" upstream).
    ElementId(u32)
);

numeric_id!(
    /// A real-world club.
    TeamId(u32)
);

numeric_id!(
    /// A gameweek (round). Ids start at 1.
    Gameweek(u32)
);

impl Gameweek {
    pub const FIRST: Gameweek = Gameweek(1);
}
