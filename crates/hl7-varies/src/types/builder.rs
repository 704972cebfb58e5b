// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for composite type descriptors.

use crate::types::{ComponentDescriptor, TypeDescriptor};
use std::sync::Arc;

/// Builder for composite [`TypeDescriptor`]s.
#[derive(Debug)]
pub struct CompositeBuilder {
    code: String,
    components: Vec<ComponentDescriptor>,
    describable: bool,
}

impl CompositeBuilder {
    /// Create a new builder for a composite type.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            components: Vec::new(),
            describable: false,
        }
    }

    /// Add a primitive component of the given type code.
    pub fn component(mut self, name: impl Into<String>, code: &str) -> Self {
        let type_desc = Arc::new(TypeDescriptor::primitive(code));
        self.components.push(ComponentDescriptor::new(name, type_desc));
        self
    }

    /// Add a component with an existing type descriptor.
    pub fn component_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.components.push(ComponentDescriptor::new(name, type_desc));
        self
    }

    /// Add `count` string components named `<prefix> 1..=count`.
    pub fn string_components(mut self, prefix: &str, count: usize) -> Self {
        for i in 1..=count {
            self = self.component(format!("{} {}", prefix, i), "ST");
        }
        self
    }

    /// Instances accept a description at construction.
    pub fn describable(mut self) -> Self {
        self.describable = true;
        self
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        let desc = TypeDescriptor::composite(self.code, self.components);
        if self.describable {
            desc.describable()
        } else {
            desc
        }
    }
}
