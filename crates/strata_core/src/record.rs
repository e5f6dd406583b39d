//! Whitespace-separated text records.
//!
//! Save files are sequences of text tokens. A [`Tokens`] reader pulls typed
//! values off such a sequence; every read either yields a value or a
//! [`RecordError`] naming the field that was missing or malformed. Callers
//! parse a whole record into locals first and only then commit.

use std::fmt::Display;
use std::str::{FromStr, SplitWhitespace};

use thiserror::Error;

/// Failure to read a text record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record ended before the named field.
    #[error("record ended before {field}")]
    Truncated {
        /// Field that was expected next.
        field: &'static str,
    },

    /// A token could not be parsed as the named field.
    #[error("invalid {field}: {token:?}")]
    Invalid {
        /// Field being parsed.
        field: &'static str,
        /// Offending token.
        token: String,
    },

    /// A numeric id does not name any known variant.
    #[error("unknown {kind} id {id}")]
    UnknownId {
        /// Kind of id (block, biome, entity type).
        kind: &'static str,
        /// The id read from the record.
        id: u64,
    },

    /// A count or size field is inconsistent with the rest of the record.
    #[error("{0}")]
    Inconsistent(String),
}

/// Result type for record parsing.
pub type RecordResult<T> = Result<T, RecordError>;

/// Typed reader over whitespace-separated tokens.
pub struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    /// Starts reading `text` from the beginning.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    /// Reads the next token as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Truncated`] when no tokens are left and
    /// [`RecordError::Invalid`] when the token does not parse.
    pub fn take<T>(&mut self, field: &'static str) -> RecordResult<T>
    where
        T: FromStr,
    {
        let token = self.inner.next().ok_or(RecordError::Truncated { field })?;
        token.parse().map_err(|_| RecordError::Invalid {
            field,
            token: token.to_owned(),
        })
    }

    /// Reads a finite `f32`. `NaN` and infinities are rejected.
    ///
    /// # Errors
    ///
    /// Fails like [`Tokens::take`], and with [`RecordError::Invalid`] for a
    /// non-finite value.
    pub fn take_finite(&mut self, field: &'static str) -> RecordResult<f32> {
        let value: f32 = self.take(field)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(RecordError::Invalid {
                field,
                token: value.to_string(),
            })
        }
    }

    /// Reads a `0`/`1` flag.
    ///
    /// # Errors
    ///
    /// Fails like [`Tokens::take`], and for any value other than 0 or 1.
    pub fn take_flag(&mut self, field: &'static str) -> RecordResult<bool> {
        match self.take::<u8>(field)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(RecordError::Invalid {
                field,
                token: other.to_string(),
            }),
        }
    }

    /// Returns true once every token has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.inner.clone().next().is_none()
    }
}

/// Appends one whitespace-separated line to `out`.
pub fn write_line<I, T>(out: &mut String, values: I)
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    use std::fmt::Write as _;

    let mut first = true;
    for value in values {
        if !first {
            out.push(' ');
        }
        first = false;
        // Writing into a String cannot fail.
        let _ = write!(out, "{value}");
    }
    out.push('\n');
}
