//! Session configuration.

use serde::{Deserialize, Serialize};

/// Default mismatch-reveal window in milliseconds.
///
/// Long enough for the player to see the second card before a failed pair
/// flips back.
pub const DEFAULT_RESOLVE_DELAY_MS: u64 = 600;

/// Tuning knobs for a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a completed turn stays on screen before its outcome is
    /// applied, in milliseconds.
    pub resolve_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resolve_delay_ms: DEFAULT_RESOLVE_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delay() {
        assert_eq!(SessionConfig::default().resolve_delay_ms, 600);
    }

    #[test]
    fn test_config_serialization() {
        let config = SessionConfig {
            resolve_delay_ms: 800,
        };

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SessionConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
    }
}
