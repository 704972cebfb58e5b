// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for self-describing field resolution.

use std::fmt;

/// Boxed error used at collaborator seams (type factories, record accessors).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for fixup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`crate::fix_self_describing_field`].
///
/// None of these are retried internally. Discriminator defaulting is a
/// configured policy, not error recovery.
#[derive(Debug)]
pub enum Error {
    /// Data is present in the self-describing field but the discriminator is empty.
    RequiredFieldMissing {
        /// Record (segment) name.
        record: String,
        /// Position of the self-describing field.
        position: usize,
        /// Position of the discriminator field.
        discriminator_position: usize,
    },
    /// No type mapping exists for the code at the schema version.
    UnresolvedType {
        /// Type code after compatibility adjustment.
        code: String,
        /// Schema version of the owning message.
        version: String,
        /// Record (segment) name.
        record: String,
        /// Content of the record identifier field (may be empty).
        record_id: String,
        /// Position of the self-describing field.
        position: usize,
    },
    /// Unexpected failure during lookup or construction.
    InternalResolutionError {
        /// What the procedure was doing when it failed.
        context: String,
        /// Original failure.
        source: BoxError,
    },
}

impl Error {
    /// Wrap an unexpected failure, keeping it as the error source.
    pub fn internal(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::InternalResolutionError {
            context: context.into(),
            source: source.into(),
        }
    }

    /// True for `RequiredFieldMissing` and `UnresolvedType`.
    pub fn is_domain_error(&self) -> bool {
        !matches!(self, Error::InternalResolutionError { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RequiredFieldMissing {
                record,
                position,
                discriminator_position,
            } => write!(
                f,
                "{}-{} has data but {}-{} (type code) is empty",
                record, position, record, discriminator_position
            ),
            Error::UnresolvedType {
                code,
                version,
                record,
                record_id,
                position,
            } => write!(
                f,
                "'{}' in record {} is invalid for version {} ({}-{})",
                code, record_id, version, record, position
            ),
            Error::InternalResolutionError { context, source } => {
                write!(f, "Internal resolution error: {}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InternalResolutionError { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Record accessor failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Field position is outside the record definition (positions are 1-based).
    PositionOutOfRange {
        /// Record (segment) name.
        record: String,
        /// Requested position.
        position: usize,
    },
    /// Field exists but is not of the requested kind.
    WrongFieldKind {
        /// Record (segment) name.
        record: String,
        /// Requested position.
        position: usize,
        /// Kind the caller asked for.
        expected: &'static str,
    },
    /// The owning message has been dropped.
    MessageDropped,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::PositionOutOfRange { record, position } => {
                write!(f, "{} has no field at position {}", record, position)
            }
            RecordError::WrongFieldKind {
                record,
                position,
                expected,
            } => write!(f, "{}-{} is not a {} field", record, position, expected),
            RecordError::MessageDropped => write!(f, "owning message is no longer alive"),
        }
    }
}

impl std::error::Error for RecordError {}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read.
    Io(std::io::Error),
    /// YAML document is malformed.
    Parse(serde_yaml::Error),
    /// Document parsed but holds an invalid value.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read parser options: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse YAML: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid parser options: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Parse(e)
    }
}
