/* src/server/core/rust/src/errors.rs */

use std::fmt;

/// Error carried from the core services out to an adapter.
/// `details` holds the individual validator messages, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseoError {
  code: String,
  message: String,
  status: u16,
  details: Vec<String>,
}

fn default_status(code: &str) -> u16 {
  match code {
    "VALIDATION_ERROR" => 400,
    "NOT_FOUND" => 404,
    "CONFLICT" => 409,
    "INTERNAL_ERROR" => 500,
    _ => 500,
  }
}

impl PseoError {
  pub fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
    Self { code: code.into(), message: message.into(), status, details: Vec::new() }
  }

  pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
    let code = code.into();
    let status = default_status(&code);
    Self::new(code, message, status)
  }

  pub fn validation(msg: impl Into<String>) -> Self {
    Self::with_code("VALIDATION_ERROR", msg)
  }

  pub fn not_found(msg: impl Into<String>) -> Self {
    Self::with_code("NOT_FOUND", msg)
  }

  pub fn conflict(msg: impl Into<String>) -> Self {
    Self::with_code("CONFLICT", msg)
  }

  pub fn internal(msg: impl Into<String>) -> Self {
    Self::with_code("INTERNAL_ERROR", msg)
  }

  pub fn with_details(mut self, details: Vec<String>) -> Self {
    self.details = details;
    self
  }

  pub fn code(&self) -> &str {
    &self.code
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn status(&self) -> u16 {
    self.status
  }

  pub fn details(&self) -> &[String] {
    &self.details
  }
}

impl fmt::Display for PseoError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.code, self.message)?;
    if !self.details.is_empty() {
      write!(f, " ({})", self.details.join("; "))?;
    }
    Ok(())
  }
}

impl std::error::Error for PseoError {}
