//! # Configuration
//!
//! Serialization settings are loaded by [`confique`] from a TOML file and the
//! environment, in priority order:
//!
//! 1. **Environment variables**: `ATTRCODER_REPEAT_POLICY`, `ATTRCODER_DOCUMENT_START`.
//! 2. **Config file**: the path passed to [`SerializationConfig::load`].
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `repeat_policy` | `nest` | What a second `serialize` on the same attribute does |
//! | `document_start` | `false` | Default coder writes a leading `---` line |

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens when an attribute is registered for serialization again.
///
/// Stored as a plain string (`"nest"` / `"replace"`) so it reads the same from
/// TOML and from the environment.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum RepeatPolicy {
    /// Wrap the already serialized type again; both coders apply.
    #[default]
    Nest,
    /// Drop earlier coders and wrap the attribute's original type.
    Replace,
}

impl TryFrom<String> for RepeatPolicy {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nest" => Ok(RepeatPolicy::Nest),
            "replace" => Ok(RepeatPolicy::Replace),
            other => Err(format!(
                "unknown repeat policy `{}` (expected `nest` or `replace`)",
                other
            )),
        }
    }
}

impl From<RepeatPolicy> for String {
    fn from(policy: RepeatPolicy) -> Self {
        match policy {
            RepeatPolicy::Nest => "nest".to_string(),
            RepeatPolicy::Replace => "replace".to_string(),
        }
    }
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SerializationConfig {
    #[config(default = "nest", env = "ATTRCODER_REPEAT_POLICY")]
    pub repeat_policy: RepeatPolicy,

    /// Prefix default-coder output with an explicit YAML document start.
    #[config(default = false, env = "ATTRCODER_DOCUMENT_START")]
    pub document_start: bool,
}

impl Default for SerializationConfig {
    fn default() -> Self {
        Self {
            repeat_policy: RepeatPolicy::Nest,
            document_start: false,
        }
    }
}

impl SerializationConfig {
    /// Load from the environment and, if given, a TOML file.
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }
}
