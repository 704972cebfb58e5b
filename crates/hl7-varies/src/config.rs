// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parser options and field layout for the fixup.
//!
//! # Example YAML
//!
//! ```yaml
//! # fixup.yaml
//! parser:
//!   default_code: ST
//!   fallback_invalid_code: ST
//!   escape_subcomponent_delimiter_in_primitive: true
//! layout:
//!   record_id: 1
//!   discriminator: 2
//!   value: 5
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options consulted while resolving self-describing fields.
///
/// Empty strings are treated the same as unset codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Code assumed when the discriminator is empty.
    pub default_code: Option<String>,
    /// Code tried when the discriminator names an unknown type.
    pub fallback_invalid_code: Option<String>,
    /// Keep subcomponents when a generic composite lands in a primitive type,
    /// joining them with the escaped delimiter `\T\`.
    pub escape_subcomponent_delimiter_in_primitive: bool,
}

impl ParserOptions {
    /// Options with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default discriminator code.
    pub fn with_default_code(mut self, code: impl Into<String>) -> Self {
        self.default_code = Some(code.into());
        self
    }

    /// Set the fallback code for unknown types.
    pub fn with_fallback_invalid_code(mut self, code: impl Into<String>) -> Self {
        self.fallback_invalid_code = Some(code.into());
        self
    }

    /// Enable or disable subcomponent escaping.
    pub fn with_subcomponent_escaping(mut self, enabled: bool) -> Self {
        self.escape_subcomponent_delimiter_in_primitive = enabled;
        self
    }

    /// Default code, if configured and non-empty.
    pub fn default_code(&self) -> Option<&str> {
        non_empty(self.default_code.as_deref())
    }

    /// Fallback code, if configured and non-empty.
    pub fn fallback_invalid_code(&self) -> Option<&str> {
        non_empty(self.fallback_invalid_code.as_deref())
    }

    /// Parse options from a YAML document (the `parser` section of [`FixupConfig`]).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load options from a YAML file holding only the `parser` section.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

fn non_empty(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|c| !c.is_empty())
}

/// Positions (1-based) of the fields the fixup works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLayout {
    /// Field identifying the record in diagnostics (OBX-1 Set ID).
    pub record_id: usize,
    /// Field carrying the type code (OBX-2 Value Type).
    pub discriminator: usize,
    /// Self-describing field (OBX-5 Observation Value).
    pub value: usize,
}

impl FieldLayout {
    /// OBX layout: set id 1, value type 2, observation value 5.
    pub const OBX: FieldLayout = FieldLayout {
        record_id: 1,
        discriminator: 2,
        value: 5,
    };

    /// Check positions are 1-based and the discriminator is not the value field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.record_id == 0 || self.discriminator == 0 || self.value == 0 {
            return Err(ConfigError::Invalid(
                "field positions are 1-based".to_string(),
            ));
        }
        if self.discriminator == self.value {
            return Err(ConfigError::Invalid(format!(
                "discriminator and value share position {}",
                self.value
            )));
        }
        Ok(())
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self::OBX
    }
}

/// Complete fixup configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixupConfig {
    /// Resolution options.
    pub parser: ParserOptions,
    /// Field positions.
    pub layout: FieldLayout,
}

impl FixupConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.layout.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}
