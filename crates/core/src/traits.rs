//! Core traits for the plano editor

use crate::error::EditorResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated before they are sent to the backend
///
/// # Example
///
/// ```rust,ignore
/// use plano_core::{EditorError, EditorResult, Validatable};
///
/// struct Link {
///     from: i64,
///     to: i64,
/// }
///
/// impl Validatable for Link {
///     fn validate(&self) -> EditorResult<()> {
///         if self.from == self.to {
///             return Err(EditorError::SelfConnection(self.from));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `EditorError` describing the problem.
    fn validate(&self) -> EditorResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    struct NonEmpty(&'static str);

    impl Validatable for NonEmpty {
        fn validate(&self) -> EditorResult<()> {
            if self.0.is_empty() {
                return Err(EditorError::validation("must not be empty"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_default_methods() {
        assert!(NonEmpty("x").is_valid());
        assert!(NonEmpty("x").validation_errors().is_empty());
        assert!(!NonEmpty("").is_valid());
        assert_eq!(
            NonEmpty("").validation_errors(),
            vec!["Validation error: must not be empty".to_string()]
        );
    }
}
