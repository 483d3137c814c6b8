//! Shared error plumbing.

/// Grepable error code for structured error responses.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}
