use anyhow::Result;
use std::path::Path;
pub const MAX_COMMANDS_WARNING: usize = 10_000;
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}
pub struct ConfigValidator;
impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }
    pub fn validate_config(&self, config: &crate::FundoConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        self.validate_history_config(&config.history, &mut errors, &mut warnings);
        self.validate_home_directory(&config.home_dir, &mut errors, &mut warnings);
        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
    fn validate_history_config(
        &self,
        config: &crate::HistoryConfig,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        if config.max_commands == 0 {
            errors
                .push(ValidationError {
                    field: "history.max_commands".to_string(),
                    message: "History capacity cannot be zero".to_string(),
                    suggestion: Some(
                        "Set max_commands to a value greater than 0".to_string(),
                    ),
                });
        }
        if config.max_commands > MAX_COMMANDS_WARNING {
            warnings
                .push(ValidationWarning {
                    field: "history.max_commands".to_string(),
                    message: "Very large histories make every save slower".to_string(),
                    suggestion: Some(
                        format!(
                            "Consider keeping max_commands at or below {}",
                            MAX_COMMANDS_WARNING
                        ),
                    ),
                });
        }
        if config.compression > 9 {
            errors
                .push(ValidationError {
                    field: "history.compression".to_string(),
                    message: "Compression level must be between 0-9".to_string(),
                    suggestion: Some(
                        "Set compression to a value between 0-9".to_string(),
                    ),
                });
        }
    }
    fn validate_home_directory(
        &self,
        home_dir: &Path,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        if !home_dir.exists() {
            warnings
                .push(ValidationWarning {
                    field: "home_dir".to_string(),
                    message: "Home directory does not exist".to_string(),
                    suggestion: Some(
                        "Run `fundo settings init` or let the first command create it"
                            .to_string(),
                    ),
                });
        } else if !home_dir.is_dir() {
            errors
                .push(ValidationError {
                    field: "home_dir".to_string(),
                    message: "Home directory path exists but is not a directory"
                        .to_string(),
                    suggestion: Some(
                        "Choose a different path for home directory".to_string(),
                    ),
                });
        }
    }
    /// Validates, then clamps whatever can be fixed in place.
    pub fn validate_and_fix_config(
        &self,
        config: &mut crate::FundoConfig,
    ) -> Result<ValidationResult> {
        let result = self.validate_config(config);
        if config.history.max_commands == 0 {
            config.history.max_commands = crate::DEFAULT_MAX_COMMANDS;
        }
        if config.history.compression > 9 {
            config.history.compression = 9;
        }
        Ok(result)
    }
}
impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    #[test]
    fn test_config_validation() {
        let validator = ConfigValidator::new();
        let mut config = crate::FundoConfig::default();
        config.home_dir = "/nonexistent/fundo-home".into();
        config.history.max_commands = 0;
        config.history.compression = 10;
        let result = validator.validate_config(&config);
        assert!(! result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.warnings.len(), 1);
        let fixed = validator.validate_and_fix_config(&mut config).unwrap();
        assert!(! fixed.is_valid);
        assert_eq!(config.history.max_commands, crate::DEFAULT_MAX_COMMANDS);
        assert_eq!(config.history.compression, 9);
        assert!(validator.validate_config(&config).errors.is_empty());
    }
    #[test]
    fn test_home_must_be_directory() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        let mut config = crate::FundoConfig::default();
        config.home_dir = file;
        config.history.max_commands = MAX_COMMANDS_WARNING + 1;
        let result = ConfigValidator::new().validate_config(&config);
        assert_eq!(result.errors[0].field, "home_dir");
        assert_eq!(result.warnings[0].field, "history.max_commands");
        let hint = result.warnings[0].suggestion.as_deref().unwrap();
        assert!(hint.contains(&MAX_COMMANDS_WARNING.to_string()));
    }
}
