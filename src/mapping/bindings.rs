//! RetroArch key binding loader
//!
//! Pulls the player 1 keyboard bindings for the eight roles the remote can
//! drive out of `retroarch.cfg`. Everything else in the file is ignored.

use crate::mapping::config::ConfigError;
use log::{debug, info, warn};
use std::fmt;
use std::path::Path;

/// Prefix shared by every player 1 input line.
pub const PLAYER1_PREFIX: &str = "input_player1_";

/// Logical control roles bound in the frontend config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    A,
    B,
    Start,
    Select,
    Up,
    Down,
    Left,
    Right,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::A,
        Role::B,
        Role::Start,
        Role::Select,
        Role::Up,
        Role::Down,
        Role::Left,
        Role::Right,
    ];

    /// Identifier used after `input_player1_`.
    pub fn ident(self) -> &'static str {
        match self {
            Role::A => "a",
            Role::B => "b",
            Role::Start => "start",
            Role::Select => "select",
            Role::Up => "up",
            Role::Down => "down",
            Role::Left => "left",
            Role::Right => "right",
        }
    }

    pub fn from_ident(ident: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.ident() == ident)
    }

    /// Full config key, e.g. `input_player1_left`.
    pub fn config_key(self) -> String {
        format!("{}{}", PLAYER1_PREFIX, self.ident())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ident())
    }
}

/// A key name extracted from the config, tagged with the role it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBinding {
    pub role: Role,
    pub key: String,
    /// 1-based line in the source file
    pub line: usize,
}

/// Read `path` and extract the role bindings in file order.
pub fn load_bindings<P: AsRef<Path>>(path: P) -> Result<Vec<RoleBinding>, ConfigError> {
    let path_ref = path.as_ref();
    info!("Loading key bindings from: {}", path_ref.display());

    let content = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let bindings = parse_bindings(&content);
    debug!("  - Found {} of {} role bindings", bindings.len(), Role::ALL.len());
    Ok(bindings)
}

/// Extract role bindings from config text.
///
/// First occurrence of a role wins. Lines whose key is not exactly
/// `input_player1_<role>` (e.g. `input_player1_a_btn`) are skipped.
pub fn parse_bindings(content: &str) -> Vec<RoleBinding> {
    let mut bindings: Vec<RoleBinding> = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let Some((key, value)) = raw.split_once('=') else {
            continue;
        };
        let Some(ident) = key.trim().strip_prefix(PLAYER1_PREFIX) else {
            continue;
        };
        let Some(role) = Role::from_ident(ident) else {
            continue;
        };

        let line = index + 1;
        if let Some(first) = bindings.iter().find(|b| b.role == role) {
            warn!(
                "Duplicate binding for {} on line {} ignored (first seen on line {})",
                role.config_key(),
                line,
                first.line
            );
            continue;
        }

        let key = unquote(value.trim()).to_string();
        debug!("  {} = '{}' (line {})", role.config_key(), key, line);
        bindings.push(RoleBinding { role, key, line });
    }

    bindings
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
