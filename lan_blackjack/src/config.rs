//! Protocol constants loaded once at process start.
//!
//! The wire protocol's magic value and message-type tags live in a small
//! JSON file so every peer on the LAN can agree on them without rebuilding.
//! Values are hex strings in the file (`"0xabcddcba"`) and plain integers
//! in memory.

use serde::Deserialize;
use std::{fs, path::Path};

/// Default location of the protocol constants file, relative to the
/// working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Fixed protocol constants shared by every message on the wire.
///
/// Loaded once at startup and passed by reference afterwards; the values
/// never change while the process runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProtocolConfig {
    /// Magic value opening every datagram and message.
    pub magic_cookie: u32,
    /// Type tag for offer broadcasts.
    pub msg_type_offer: u8,
    /// Type tag for play requests.
    pub msg_type_request: u8,
    /// Type tag for card events.
    pub msg_type_payload: u8,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            magic_cookie: 0xabcd_dcba,
            msg_type_offer: 0x2,
            msg_type_request: 0x3,
            msg_type_payload: 0x4,
        }
    }
}

/// File form of the constants: every value is a hex string.
#[derive(Debug, Deserialize)]
struct RawConfig {
    magic_cookie: String,
    msg_type_offer: String,
    msg_type_request: String,
    msg_type_payload: String,
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("config is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ProtocolConfig {
    /// Load constants from `path`, falling back to the built-in defaults
    /// when the file does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read, is not JSON, or holds
    /// anything other than hex-string integers that fit their wire fields.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse constants from their JSON file form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] for bad JSON and
    /// [`ConfigError::Invalid`] for values that are not hex integers or do
    /// not fit their wire fields.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(contents)?;
        Ok(Self {
            magic_cookie: parse_hex(&raw.magic_cookie, "magic_cookie")?,
            msg_type_offer: parse_hex(&raw.msg_type_offer, "msg_type_offer")?,
            msg_type_request: parse_hex(&raw.msg_type_request, "msg_type_request")?,
            msg_type_payload: parse_hex(&raw.msg_type_payload, "msg_type_payload")?,
        })
    }
}

/// Parse a hex string, with or without a `0x` prefix, into an integer that
/// fits the target wire field.
fn parse_hex<T>(value: &str, key: &str) -> Result<T, ConfigError>
where
    T: TryFrom<u64>,
{
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    let parsed = u64::from_str_radix(digits, 16).map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        reason: format!("{value:?} is not a hexadecimal integer"),
    })?;
    T::try_from(parsed).map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        reason: format!("{value:?} does not fit the wire field"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"{
        "magic_cookie": "0xabcddcba",
        "msg_type_offer": "0x2",
        "msg_type_request": "0x3",
        "msg_type_payload": "0x4"
    }"#;

    #[test]
    fn test_default_matches_shipped_file() {
        let config = ProtocolConfig::from_json(FULL_CONFIG).unwrap();
        assert_eq!(config, ProtocolConfig::default());
    }

    #[test]
    fn test_from_json_parses_values() {
        let config = ProtocolConfig::from_json(
            r#"{
                "magic_cookie": "0xdeadbeef",
                "msg_type_offer": "0x10",
                "msg_type_request": "0x11",
                "msg_type_payload": "0x12"
            }"#,
        )
        .unwrap();
        assert_eq!(config.magic_cookie, 0xdead_beef);
        assert_eq!(config.msg_type_offer, 0x10);
        assert_eq!(config.msg_type_request, 0x11);
        assert_eq!(config.msg_type_payload, 0x12);
    }

    #[test]
    fn test_hex_without_prefix_is_accepted() {
        let config = ProtocolConfig::from_json(
            r#"{
                "magic_cookie": "abcddcba",
                "msg_type_offer": "2",
                "msg_type_request": "3",
                "msg_type_payload": "4"
            }"#,
        )
        .unwrap();
        assert_eq!(config, ProtocolConfig::default());
    }

    #[test]
    fn test_junk_hex_is_rejected() {
        let result = ProtocolConfig::from_json(
            r#"{
                "magic_cookie": "not hex",
                "msg_type_offer": "0x2",
                "msg_type_request": "0x3",
                "msg_type_payload": "0x4"
            }"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid { key, .. }) if key == "magic_cookie"));
    }

    #[test]
    fn test_oversized_message_type_is_rejected() {
        // Message types are a single byte on the wire.
        let result = ProtocolConfig::from_json(
            r#"{
                "magic_cookie": "0xabcddcba",
                "msg_type_offer": "0x100",
                "msg_type_request": "0x3",
                "msg_type_payload": "0x4"
            }"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid { key, .. }) if key == "msg_type_offer"));
    }

    #[test]
    fn test_missing_key_is_malformed() {
        let result = ProtocolConfig::from_json(r#"{"magic_cookie": "0xabcddcba"}"#);
        assert!(matches!(result, Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ProtocolConfig::load("does-not-exist-config.json").unwrap();
        assert_eq!(config, ProtocolConfig::default());
    }
}
