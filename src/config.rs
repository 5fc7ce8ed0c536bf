//! Calculator configuration.
//!
//! The only tunable is the default doctrine. It can come from code, from a
//! serialized config, or from the `ALICE_FARAID_DOCTRINE` environment
//! variable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::doctrine::Doctrine;
use crate::error::Result;

/// Environment variable naming the default doctrine.
pub const DOCTRINE_ENV: &str = "ALICE_FARAID_DOCTRINE";

/// Settings for a [`Calculator`](crate::pipeline::Calculator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Doctrine applied when the caller does not pick one.
    pub doctrine: Doctrine,
}

impl CalculatorConfig {
    /// Configuration defaulting to `doctrine`.
    pub fn new(doctrine: Doctrine) -> Self {
        Self { doctrine }
    }

    /// Read [`DOCTRINE_ENV`]; fall back to the default when unset or empty.
    ///
    /// # Errors
    ///
    /// [`FaraidError::UnknownDoctrine`](crate::error::FaraidError::UnknownDoctrine)
    /// if the variable names no known doctrine.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(DOCTRINE_ENV).filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let doctrine = raw.parse()?;
                debug!(%doctrine, "doctrine from environment");
                Ok(Self { doctrine })
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaraidError;

    #[test]
    fn test_default_doctrine() {
        assert_eq!(CalculatorConfig::default().doctrine, Doctrine::Shafii);
    }

    #[test]
    fn test_lookup_reads_doctrine() {
        let config = CalculatorConfig::from_lookup(|key| {
            (key == DOCTRINE_ENV).then(|| "Hanafi".to_string())
        })
        .unwrap();
        assert_eq!(config.doctrine, Doctrine::Hanafi);
    }

    #[test]
    fn test_lookup_unset_or_blank_uses_default() {
        assert_eq!(
            CalculatorConfig::from_lookup(|_| None).unwrap(),
            CalculatorConfig::default()
        );
        assert_eq!(
            CalculatorConfig::from_lookup(|_| Some("  ".into())).unwrap(),
            CalculatorConfig::default()
        );
    }

    #[test]
    fn test_lookup_rejects_unknown_doctrine() {
        let err = CalculatorConfig::from_lookup(|_| Some("zahiri".into())).unwrap_err();
        assert_eq!(err, FaraidError::UnknownDoctrine("zahiri".into()));
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let config: CalculatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.doctrine, Doctrine::Shafii);
        let config: CalculatorConfig = serde_json::from_str(r#"{"doctrine":"maliki"}"#).unwrap();
        assert_eq!(config.doctrine, Doctrine::Maliki);
    }
}
