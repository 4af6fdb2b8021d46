//! ZK protocol constants, command families and the command-id table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Size of the response header: cmd(2) + checksum(2) + session(2) + reply(2).
pub const HEADER_SIZE: usize = 8;

/// Offset of the device status byte that may follow the header.
pub const ERROR_BYTE_OFFSET: usize = HEADER_SIZE;

// User management command codes
pub const CMD_USER_CREATE: u16 = 0x07D0;
pub const CMD_USER_CREATE_WITH_PASSWORD: u16 = 0x07D1;
pub const CMD_USER_DELETE: u16 = 0x07D2;
pub const CMD_USER_UPDATE: u16 = 0x07D3;
pub const CMD_USER_LIST: u16 = 0x07D4;
/// Delete id used by the dedicated delete check on some firmware.
pub const CMD_USER_DELETE_ALT: u16 = 0x1380;

/// Logical operation a response is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandFamily {
    Create,
    Update,
    Delete,
    List,
    Unknown,
}

impl CommandFamily {
    /// Fixed success phrase for the write families.
    pub fn success_message(self) -> Option<&'static str> {
        match self {
            Self::Create => Some("User created successfully"),
            Self::Update => Some("User updated successfully"),
            Self::Delete => Some("User deleted successfully"),
            Self::List | Self::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CommandFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses an operation hint. `unknown` is not a valid hint.
impl FromStr for CommandFamily {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "list" => Ok(Self::List),
            other => Err(format!(
                "Invalid operation '{other}': expected create, update, delete or list"
            )),
        }
    }
}

/// Mapping from response command ids to command families.
///
/// Used by the dispatcher when the caller gives no operation hint. The
/// delete id differs between firmware, so the default table accepts both
/// known values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTable {
    entries: Vec<(u16, CommandFamily)>,
}

impl CommandTable {
    /// Build a table from explicit `(command_id, family)` entries.
    ///
    /// Later duplicates of an id are ignored; the first entry wins.
    pub fn new(entries: impl IntoIterator<Item = (u16, CommandFamily)>) -> Self {
        let mut table = Self { entries: Vec::new() };
        for (id, family) in entries {
            if table.entries.iter().all(|(known, _)| *known != id) {
                table.entries.push((id, family));
            }
        }
        table
    }

    /// Family for a command id, `Unknown` when the id is not in the table.
    pub fn family_of(&self, command_id: u16) -> CommandFamily {
        self.entries
            .iter()
            .find(|(id, _)| *id == command_id)
            .map_or(CommandFamily::Unknown, |(_, family)| *family)
    }

    /// All command ids mapped to `family`.
    pub fn ids_for(&self, family: CommandFamily) -> Vec<u16> {
        self.entries
            .iter()
            .filter(|(_, f)| *f == family)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn entries(&self) -> &[(u16, CommandFamily)] {
        &self.entries
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new([
            (CMD_USER_CREATE, CommandFamily::Create),
            (CMD_USER_CREATE_WITH_PASSWORD, CommandFamily::Create),
            (CMD_USER_DELETE, CommandFamily::Delete),
            (CMD_USER_UPDATE, CommandFamily::Update),
            (CMD_USER_LIST, CommandFamily::List),
            (CMD_USER_DELETE_ALT, CommandFamily::Delete),
        ])
    }
}
