//! The public error type.
//!
//! Inside the crate, functions return `anyhow` results and add context as they go. At the public
//! boundary the error is tagged with an `ErrorType` so callers can tell a bad input file from a
//! failed export without parsing the message.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

pub(crate) type Re<T> = anyhow::Result<T>;

/// The result type returned by the public API.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The configuration file or command line could not be used.
    Config,
    /// A CSV input file is missing or does not match its schema.
    Load,
    /// A chart could not be built or serialized.
    Render,
    /// The static HTML artifact could not be written.
    Export,
    /// The HTTP server or the event loop failed.
    Service,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error with a category and the underlying chain of causes.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts an internal result into a public `Result` tagged with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_display_includes_type_and_context() {
        let r: Re<()> = Err(anyhow!("no such file")).context("Unable to load national CSV");
        let e = r.pub_result(ErrorType::Load).unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Load);
        assert_eq!(
            e.to_string(),
            "load error: Unable to load national CSV: no such file"
        );
    }

    #[test]
    fn test_error_type_from_str() {
        use std::str::FromStr;
        assert_eq!(ErrorType::from_str("export").unwrap(), ErrorType::Export);
        assert!(ErrorType::from_str("bogus").is_err());
    }
}
