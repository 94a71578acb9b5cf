//-
// Copyright (c) 2024, Jason Lingle
//
// This file is part of Movemap.
//
// Movemap is free software: you can  redistribute it and/or modify it under
// the terms of  the GNU General Public  License as published  by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Movemap is distributed  in the hope that  it will be useful,  but WITHOUT
// ANY WARRANTY; without even  the implied warranty of MERCHANTABILITY  or
// FITNESS FOR  A PARTICULAR PURPOSE.  See the GNU  General Public License
// for more details.
//
// You should have received a copy of the GNU General Public License along
// with Movemap. If not, see <http://www.gnu.org/licenses/>.

use serde::{Deserialize, Serialize};

/// Operational settings for the move engine.
///
/// Typically deserialised from a `[move]` table in the embedding server's
/// TOML configuration. All fields have defaults suitable for small
/// installations.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Settings {
    /// The maximum number of messages one MOVE command may relocate.
    ///
    /// Requests which select more messages than this fail up front, before
    /// any message is moved.
    #[serde(default = "default_max_move_batch")]
    pub max_move_batch: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_move_batch: default_max_move_batch(),
        }
    }
}

fn default_max_move_batch() -> usize {
    65536
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(65536, settings.max_move_batch);

        let settings = Settings::from_toml("").unwrap();
        assert_eq!(65536, settings.max_move_batch);
    }

    #[test]
    fn explicit_values() {
        let settings = Settings::from_toml("max_move_batch = 100").unwrap();
        assert_eq!(100, settings.max_move_batch);
    }
}
