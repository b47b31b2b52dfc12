use crate::error::{BotError, Result};

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a job title filter before it is stored
    pub fn validate_filter_text(text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(BotError::InvalidInput(
                "filter text cannot be empty".to_string(),
            ));
        }

        if text.len() > 200 {
            return Err(BotError::InvalidInput(
                "filter text too long (max 200 characters)".to_string(),
            ));
        }

        // Check for potentially dangerous characters
        if text.contains('\0') || text.contains('\r') || text.contains('\n') {
            return Err(BotError::InvalidInput(
                "filter text contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_filter() {
        assert!(InputValidator::validate_filter_text("Backend Developer").is_ok());
    }

    #[test]
    fn test_empty_filter_rejected() {
        assert!(InputValidator::validate_filter_text("").is_err());
        assert!(InputValidator::validate_filter_text("   ").is_err());
    }

    #[test]
    fn test_control_characters_rejected() {
        assert!(InputValidator::validate_filter_text("dev\nops").is_err());
    }
}
