//! Result type alias for Satchel

use super::errors::SatchelError;

/// Result type alias for Satchel operations
///
/// # Examples
///
/// ```
/// use satchel::domain::result::Result;
/// use satchel::domain::errors::SatchelError;
///
/// fn failing_function() -> Result<()> {
///     Err(SatchelError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SatchelError>;
