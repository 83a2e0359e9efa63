use crate::domain::promptpay::PromptPayProfile;
use crate::error::{PosError, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_MERCHANT_PHONE: &str = "0917797477";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Process configuration, read from an optional JSON file.
///
/// Every field has a default, so a missing file or a partial file is valid:
///
/// ```json
/// { "merchant_phone": "0812345678", "promptpay": { "initiation": "dynamic" } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// PromptPay number that receives customer payments.
    pub merchant_phone: String,
    pub log_level: String,
    pub promptpay: PromptPayProfile,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            merchant_phone: DEFAULT_MERCHANT_PHONE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            promptpay: PromptPayProfile::default(),
        }
    }
}

impl AppConfig {
    /// Loads the file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                serde_json::from_str(&text).map_err(|e| {
                    PosError::ConfigError(format!("{}: {}", path.display(), e))
                })?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.promptpay.validate()?;
        self.promptpay
            .normalize_identifier(&self.merchant_phone)
            .map_err(|e| PosError::ConfigError(format!("merchant_phone: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::promptpay::PointOfInitiation;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.merchant_phone, "0917797477");
        assert_eq!(config.promptpay.currency, "764");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"merchant_phone": "0812345678", "promptpay": {{"initiation": "dynamic"}}}}"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.merchant_phone, "0812345678");
        assert_eq!(config.promptpay.initiation, PointOfInitiation::Dynamic);
        assert_eq!(config.promptpay.guid, "A000000677010111");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_invalid_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"merchant_phone": "12"}}"#).unwrap();
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(PosError::ConfigError(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"merchant": "0812345678"}}"#).unwrap();
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(PosError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/promptpos.json")));
        assert!(matches!(result, Err(PosError::IoError(_))));
    }
}
