pub mod validation;
pub use validation::{ConfigValidator, ValidationResult, ValidationError, ValidationWarning};
