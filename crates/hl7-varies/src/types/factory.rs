// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type factory seam and the registry-backed implementation.
//!
//! ## Standard table
//!
//! [`TypeRegistry::standard`] seeds the data types commonly carried by
//! self-describing fields, per schema version:
//!
//! | Types | Versions |
//! |-------|----------|
//! | `ST TX FT NM ID SI DT TM TS CE` | all |
//! | `IS SN` | 2.2 and later |
//! | `ED CF` | 2.3 and later |
//! | `CWE` | 2.5 and later |
//! | `DTM` | 2.5.1 and later |

use crate::error::BoxError;
use crate::types::{CompositeBuilder, TypeDescriptor};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Schema versions covered by [`TypeRegistry::standard`], oldest first.
pub const STANDARD_VERSIONS: [&str; 11] = [
    "2.1", "2.2", "2.3", "2.3.1", "2.4", "2.5", "2.5.1", "2.6", "2.7", "2.7.1", "2.8",
];

/// Resolves `(code, version)` to a constructible type.
///
/// `Ok(None)` means no mapping exists. `Err` is reserved for lookups that
/// could not be performed at all.
pub trait TypeFactory: Send + Sync {
    /// Look up the descriptor for `code` at schema `version`.
    fn type_descriptor(
        &self,
        code: &str,
        version: &str,
    ) -> Result<Option<Arc<TypeDescriptor>>, BoxError>;
}

impl<F: TypeFactory + ?Sized> TypeFactory for Arc<F> {
    fn type_descriptor(
        &self,
        code: &str,
        version: &str,
    ) -> Result<Option<Arc<TypeDescriptor>>, BoxError> {
        (**self).type_descriptor(code, version)
    }
}

/// Concurrent version -> code -> descriptor map.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<String, HashMap<String, Arc<TypeDescriptor>>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the standard table (see module docs).
    #[must_use]
    pub fn standard() -> Self {
        let registry = Self::new();
        for (index, version) in STANDARD_VERSIONS.iter().enumerate() {
            let since = |v: &str| {
                STANDARD_VERSIONS
                    .iter()
                    .position(|s| *s == v)
                    .is_some_and(|first| index >= first)
            };

            for code in ["ST", "TX", "FT", "NM", "ID", "SI", "DT", "TM"] {
                registry.register(version, TypeDescriptor::primitive(code).describable());
            }
            registry.register(version, ts());
            registry.register(version, coded("CE", 6));
            if since("2.2") {
                registry.register(version, TypeDescriptor::primitive("IS").describable());
                registry.register(version, sn());
            }
            if since("2.3") {
                registry.register(version, ed());
                registry.register(version, cf());
            }
            if since("2.5") {
                registry.register(version, coded("CWE", 9));
            }
            if since("2.5.1") {
                registry.register(version, TypeDescriptor::primitive("DTM").describable());
            }
        }
        log::debug!(
            "[types] standard registry seeded for {} versions",
            STANDARD_VERSIONS.len()
        );
        registry
    }

    /// Register `descriptor` under its code for `version`.
    ///
    /// Returns the descriptor it replaced, if any.
    pub fn register(&self, version: &str, descriptor: TypeDescriptor) -> Option<Arc<TypeDescriptor>> {
        let code = descriptor.code().to_string();
        self.types
            .entry(version.to_string())
            .or_default()
            .insert(code, Arc::new(descriptor))
    }

    /// Remove a mapping.
    pub fn unregister(&self, code: &str, version: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get_mut(version)?.remove(code)
    }

    /// Look up a mapping.
    pub fn get(&self, code: &str, version: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(version)?.get(code).cloned()
    }

    /// Number of (version, code) mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.iter().map(|entry| entry.value().len()).sum()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeFactory for TypeRegistry {
    fn type_descriptor(
        &self,
        code: &str,
        version: &str,
    ) -> Result<Option<Arc<TypeDescriptor>>, BoxError> {
        Ok(self.get(code, version))
    }
}

/// Coded element with repeating identifier/text/system triplets.
fn coded(code: &str, arity: usize) -> TypeDescriptor {
    let names = [
        ("Identifier", "ST"),
        ("Text", "ST"),
        ("Name of Coding System", "ID"),
        ("Alternate Identifier", "ST"),
        ("Alternate Text", "ST"),
        ("Name of Alternate Coding System", "ID"),
        ("Coding System Version ID", "ST"),
        ("Alternate Coding System Version ID", "ST"),
        ("Original Text", "ST"),
    ];
    names
        .iter()
        .take(arity)
        .fold(CompositeBuilder::new(code), |b, (name, ty)| b.component(*name, ty))
        .build()
}

fn ts() -> TypeDescriptor {
    CompositeBuilder::new("TS")
        .component("Time", "ST")
        .component("Degree of Precision", "ID")
        .build()
}

fn sn() -> TypeDescriptor {
    CompositeBuilder::new("SN")
        .component("Comparator", "ST")
        .component("Num1", "NM")
        .component("Separator/Suffix", "ST")
        .component("Num2", "NM")
        .build()
}

fn ed() -> TypeDescriptor {
    CompositeBuilder::new("ED")
        .component("Source Application", "ST")
        .component("Type of Data", "ID")
        .component("Data Subtype", "ID")
        .component("Encoding", "ID")
        .component("Data", "TX")
        .build()
}

fn cf() -> TypeDescriptor {
    CompositeBuilder::new("CF")
        .component("Identifier", "ID")
        .component("Formatted Text", "FT")
        .component("Name of Coding System", "ID")
        .component("Alternate Identifier", "ID")
        .component("Alternate Formatted Text", "FT")
        .component("Name of Alternate Coding System", "ID")
        .build()
}
