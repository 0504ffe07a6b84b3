//! Configuration validator module
//!
//! This module provides comprehensive validation for configuration with
//! contextual error messages and suggestions for fixing issues.

mod messages;
mod rules;

pub use messages::{
    ValidationError, ValidationResult, ValidationWarning, format_validation_result,
    validate_config, validate_config_path,
};
pub use rules::{
    quick_validation_check, validate_cli_config, validate_cross_config, validate_database_config,
    validate_environment_fitness, validate_storage_config,
};
