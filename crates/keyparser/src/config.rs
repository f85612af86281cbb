//! # Mode configuration
//!
//! ## Overview
//!
//! Each key parser is bound to a single [Mode], and reads the [ModeSettings] for that mode once
//! when it's created. Settings come from a [ConfigSource]; [KeyConfig] is one backed by a TOML
//! document:
//!
//! ```
//! use keyparser::config::{ConfigSource, KeyConfig, Mode};
//!
//! let config = KeyConfig::from_toml_str(r#"
//!     [key_mappings]
//!     "<C-[>" = "<Esc>"
//!
//!     [modes.insert.bindings]
//!     "<C-e>" = "edit-text"
//!     "jk" = "mode-leave"
//! "#).unwrap();
//!
//! let settings = config.read_config(Mode::Insert);
//! assert_eq!(settings.bindings.len(), 2);
//! assert_eq!(settings.key_mappings.len(), 1);
//! assert!(!settings.supports_count);
//! ```
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::key::{KeyInfo, KeySequence, MacroError};

/// The input modes a key parser can be bound to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Mode {
    /// Browsing, where keys are commands.
    Normal,

    /// Typing into an editable element.
    Insert,

    /// Every unbound key goes to the page.
    Passthrough,

    /// Typing into the command line.
    Command,

    /// Answering a prompt.
    Prompt,

    /// Moving a caret through page text.
    Caret,

    /// Selecting a hint label.
    Hint,

    /// Choosing a register or mark.
    Register,
}

impl Mode {
    /// Whether key chains in this mode accept a leading count by default.
    pub fn supports_count(&self) -> bool {
        matches!(self, Mode::Normal | Mode::Caret)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Passthrough => "passthrough",
            Mode::Command => "command",
            Mode::Prompt => "prompt",
            Mode::Caret => "caret",
            Mode::Hint => "hint",
            Mode::Register => "register",
        };

        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Mode::Normal),
            "insert" => Ok(Mode::Insert),
            "passthrough" => Ok(Mode::Passthrough),
            "command" => Ok(Mode::Command),
            "prompt" => Ok(Mode::Prompt),
            "caret" => Ok(Mode::Caret),
            "hint" => Ok(Mode::Hint),
            "register" => Ok(Mode::Register),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Errors encountered while loading key configuration.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// The document isn't valid TOML, or doesn't have the expected layout.
    #[error("Invalid key configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A binding's key string couldn't be interpreted.
    #[error("Invalid keys {keys:?} bound in {mode} mode: {source}")]
    InvalidKeys {
        /// The mode the binding was in.
        mode: Mode,
        /// The offending key string.
        keys: String,
        /// Why the keys couldn't be parsed.
        source: MacroError,
    },

    /// A key mapping didn't map exactly one key onto one key.
    #[error("Invalid key mapping {from:?} -> {to:?}")]
    InvalidMapping {
        /// The key being mapped.
        from: String,
        /// What it was mapped to.
        to: String,
    },

    /// A binding was given an empty command.
    #[error("Empty command bound to {keys:?} in {mode} mode")]
    EmptyCommand {
        /// The mode the binding was in.
        mode: Mode,
        /// The key string bound to nothing.
        keys: String,
    },

    /// An unrecognized mode name.
    #[error("Unknown mode: {0:?}")]
    UnknownMode(String),
}

/// Everything a key parser needs to know about the mode it's bound to.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ModeSettings {
    /// Key chains and the commands they run.
    pub bindings: Vec<(KeySequence, String)>,

    /// Keys that are treated as other keys before looking up bindings.
    pub key_mappings: Vec<(KeyInfo, KeyInfo)>,

    /// Whether a leading count may be typed before a key chain.
    pub supports_count: bool,
}

impl ModeSettings {
    /// Look up the command bound to exactly `keys`.
    pub fn command(&self, keys: &KeySequence) -> Option<&str> {
        self.bindings.iter().find(|(seq, _)| seq == keys).map(|(_, cmd)| cmd.as_str())
    }

    /// Apply the key mappings to a single key.
    pub fn map_key(&self, key: KeyInfo) -> KeyInfo {
        self.key_mappings
            .iter()
            .find(|(from, _)| *from == key)
            .map(|(_, to)| *to)
            .unwrap_or(key)
    }
}

/// A source of per-mode settings.
pub trait ConfigSource {
    /// Read the settings for `mode`.
    fn read_config(&self, mode: Mode) -> ModeSettings;
}

impl ConfigSource for HashMap<Mode, ModeSettings> {
    fn read_config(&self, mode: Mode) -> ModeSettings {
        self.get(&mode).cloned().unwrap_or_else(|| ModeSettings {
            supports_count: mode.supports_count(),
            ..Default::default()
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModeConfig {
    supports_count: Option<bool>,

    #[serde(default)]
    bindings: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawKeyConfig {
    #[serde(default)]
    key_mappings: BTreeMap<String, String>,

    #[serde(default)]
    modes: BTreeMap<String, RawModeConfig>,
}

/// Key configuration loaded from a TOML document.
#[derive(Clone, Debug, Default)]
pub struct KeyConfig {
    modes: HashMap<Mode, ModeSettings>,
    key_mappings: Vec<(KeyInfo, KeyInfo)>,
}

impl KeyConfig {
    /// Parse and validate a TOML key configuration.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: RawKeyConfig = toml::from_str(input)?;

        let key_mappings = raw
            .key_mappings
            .into_iter()
            .map(|(from, to)| parse_mapping(from, to))
            .collect::<Result<Vec<_>, _>>()?;

        let mut modes = HashMap::new();

        for (name, rmc) in raw.modes {
            let mode = Mode::from_str(&name)?;
            let mut bindings = Vec::with_capacity(rmc.bindings.len());

            for (keys, cmd) in rmc.bindings {
                let seq = KeySequence::from_str(&keys).map_err(|source| {
                    ConfigError::InvalidKeys { mode, keys: keys.clone(), source }
                })?;

                if cmd.trim().is_empty() {
                    return Err(ConfigError::EmptyCommand { mode, keys });
                }

                bindings.push((seq, cmd));
            }

            let settings = ModeSettings {
                bindings,
                key_mappings: key_mappings.clone(),
                supports_count: rmc.supports_count.unwrap_or_else(|| mode.supports_count()),
            };

            modes.insert(mode, settings);
        }

        Ok(KeyConfig { modes, key_mappings })
    }
}

fn parse_mapping(from: String, to: String) -> Result<(KeyInfo, KeyInfo), ConfigError> {
    match (KeyInfo::from_str(&from), KeyInfo::from_str(&to)) {
        (Ok(f), Ok(t)) => Ok((f, t)),
        _ => Err(ConfigError::InvalidMapping { from, to }),
    }
}

impl ConfigSource for KeyConfig {
    fn read_config(&self, mode: Mode) -> ModeSettings {
        self.modes.get(&mode).cloned().unwrap_or_else(|| ModeSettings {
            key_mappings: self.key_mappings.clone(),
            supports_count: mode.supports_count(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    const CONFIG: &str = r#"
        [key_mappings]
        "<C-[>" = "<Esc>"
        "<C-6>" = "<C-^>"

        [modes.normal.bindings]
        "gg" = "scroll-to-perc 0"
        "<C-w>v" = "tab-clone"

        [modes.passthrough]
        supports_count = true

        [modes.passthrough.bindings]
        "<S-Esc>" = "mode-leave"
    "#;

    #[test]
    fn test_read_bound_mode() {
        let config = KeyConfig::from_toml_str(CONFIG).unwrap();
        let normal = config.read_config(Mode::Normal);

        assert_eq!(normal.bindings.len(), 2);
        assert!(normal.supports_count);
        assert_eq!(
            normal.command(&KeySequence::from_str("gg").unwrap()),
            Some("scroll-to-perc 0")
        );
        assert_eq!(
            normal.command(&KeySequence::from(vec![ctl!('w'), key!('v')])),
            Some("tab-clone")
        );
        assert_eq!(normal.command(&KeySequence::from_str("g").unwrap()), None);

        let passthrough = config.read_config(Mode::Passthrough);
        assert!(passthrough.supports_count);
        assert_eq!(passthrough.bindings.len(), 1);
    }

    #[test]
    fn test_read_unbound_mode() {
        let config = KeyConfig::from_toml_str(CONFIG).unwrap();
        let insert = config.read_config(Mode::Insert);

        assert!(insert.bindings.is_empty());
        assert!(!insert.supports_count);
        assert_eq!(insert.key_mappings.len(), 2);
    }

    #[test]
    fn test_key_mappings() {
        let config = KeyConfig::from_toml_str(CONFIG).unwrap();
        let normal = config.read_config(Mode::Normal);

        // <C-[> already parses as <Esc>, so the mapping is the identity.
        assert_eq!(normal.map_key(key!(KeyCode::Esc)), key!(KeyCode::Esc));
        assert_eq!(normal.map_key(ctl!('6')), ctl!('^'));
        assert_eq!(normal.map_key(key!('x')), key!('x'));
    }

    #[test]
    fn test_invalid_mapping() {
        let err = KeyConfig::from_toml_str("[key_mappings]\n\"ab\" = \"c\"\n").unwrap_err();

        assert!(matches!(err, ConfigError::InvalidMapping { .. }));
    }

    #[test]
    fn test_empty_keys() {
        let err = KeyConfig::from_toml_str("[modes.insert.bindings]\n\"\" = \"open\"\n").unwrap_err();

        match err {
            ConfigError::InvalidKeys { mode, keys, source } => {
                assert_eq!(mode, Mode::Insert);
                assert_eq!(keys, "");
                assert_eq!(source, MacroError::EmptyMacro);
            },
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn test_empty_command() {
        let err = KeyConfig::from_toml_str("[modes.insert.bindings]\n\"jk\" = \" \"\n").unwrap_err();

        assert!(matches!(err, ConfigError::EmptyCommand { mode: Mode::Insert, .. }));
    }

    #[test]
    fn test_unknown_mode() {
        assert!(matches!(
            KeyConfig::from_toml_str("[modes.visual]\n"),
            Err(ConfigError::UnknownMode(name)) if name == "visual"
        ));
        assert!(matches!("visual".parse::<Mode>(), Err(ConfigError::UnknownMode(_))));
        assert_eq!("caret".parse::<Mode>().unwrap(), Mode::Caret);
        assert_eq!(Mode::Passthrough.to_string(), "passthrough");
    }

    #[test]
    fn test_map_source() {
        let mut map = HashMap::new();
        map.insert(Mode::Insert, ModeSettings {
            bindings: vec![(KeySequence::from_str("jk").unwrap(), "mode-leave".into())],
            ..Default::default()
        });

        assert_eq!(map.read_config(Mode::Insert).bindings.len(), 1);
        assert!(map.read_config(Mode::Normal).supports_count);
        assert!(map.read_config(Mode::Hint).bindings.is_empty());
    }
}
