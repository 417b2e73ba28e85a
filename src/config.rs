use crate::error::{CodecError, Result};
use crate::numeric::NumberFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PROJECT_REFERENCE_KEY: &str = "realEstateAssetDTO";

/// Settings shared by the summary codec and the payment plan validator.
///
/// Every field has a default matching the backend's standard contract, so an
/// empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CodecConfig {
    #[schemars(description = "Separators used when parsing user-typed amounts")]
    pub number_format: NumberFormat,

    #[schemars(
        description = "Wire key holding the nested { id } project reference in financial summary payloads"
    )]
    pub project_reference_key: String,

    #[schemars(
        description = "Wire key holding the nested { id } project reference in payment plan payloads"
    )]
    pub payment_plan_project_key: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            number_format: NumberFormat::default(),
            project_reference_key: DEFAULT_PROJECT_REFERENCE_KEY.to_string(),
            payment_plan_project_key: DEFAULT_PROJECT_REFERENCE_KEY.to_string(),
        }
    }
}

impl CodecConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let fmt = &self.number_format;
        if fmt.thousands_separator == fmt.decimal_separator {
            return Err(CodecError::InvalidConfig(format!(
                "thousands and decimal separators must differ (both are '{}')",
                fmt.thousands_separator
            )));
        }
        for sep in [fmt.thousands_separator, fmt.decimal_separator] {
            if sep.is_ascii_digit() || sep == '-' {
                return Err(CodecError::InvalidConfig(format!(
                    "'{}' cannot be used as a number separator",
                    sep
                )));
            }
        }
        if self.project_reference_key.trim().is_empty() {
            return Err(CodecError::InvalidConfig(
                "projectReferenceKey must not be empty".to_string(),
            ));
        }
        if self.payment_plan_project_key.trim().is_empty() {
            return Err(CodecError::InvalidConfig(
                "paymentPlanProjectKey must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config = CodecConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CodecConfig::default());
        assert_eq!(config.project_reference_key, "realEstateAssetDTO");
    }

    #[test]
    fn test_partial_override() {
        let config = CodecConfig::from_json_str(
            r#"{"numberFormat": {"thousandsSeparator": ".", "decimalSeparator": ","}, "projectReferenceKey": "projectDTO"}"#,
        )
        .unwrap();
        assert_eq!(config.number_format.thousands_separator, '.');
        assert_eq!(config.number_format.decimal_separator, ',');
        assert_eq!(config.project_reference_key, "projectDTO");
        assert_eq!(config.payment_plan_project_key, "realEstateAssetDTO");
    }

    #[test]
    fn test_equal_separators_rejected() {
        let result = CodecConfig::from_json_str(
            r#"{"numberFormat": {"thousandsSeparator": ",", "decimalSeparator": ","}}"#,
        );
        assert!(matches!(result, Err(CodecError::InvalidConfig(_))));
    }

    #[test]
    fn test_digit_separator_rejected() {
        let mut config = CodecConfig::default();
        config.number_format.thousands_separator = '0';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_project_key_rejected() {
        let result = CodecConfig::from_json_str(r#"{"projectReferenceKey": "  "}"#);
        assert!(matches!(result, Err(CodecError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"paymentPlanProjectKey": "projectRef"}}"#).unwrap();

        let config = CodecConfig::from_path(file.path()).unwrap();
        assert_eq!(config.payment_plan_project_key, "projectRef");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = CodecConfig::from_path("/definitely/not/here/codec.json");
        assert!(matches!(result, Err(CodecError::IoError(_))));
    }
}
