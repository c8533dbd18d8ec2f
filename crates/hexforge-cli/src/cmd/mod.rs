pub mod attach;
pub mod handler;
pub mod outbound;
pub mod repository;
pub mod usecase;

use hexforge_core::ForgeError;

/// A value that was neither passed as a flag nor answered at a prompt.
fn required(value: Option<String>, flag: &str) -> Result<String, ForgeError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ForgeError::MissingArgument(flag.to_string()))
}
