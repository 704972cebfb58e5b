// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime value construction.

use crate::model::{Composite, ConcreteValue, MessageRef, Primitive, TypeIdentity};
use std::sync::Arc;

/// How instances of a type are constructed.
///
/// Fixed when the descriptor is built, so construction never has to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construction {
    /// Constructed from the owning message and a description.
    WithDescription,
    /// Constructed from the owning message only.
    OwnerOnly,
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Single text value.
    Primitive,
    /// Ordered components.
    Composite(Vec<ComponentDescriptor>),
}

/// Component of a composite type.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDescriptor {
    /// Component name.
    pub name: String,
    /// Component type.
    pub type_desc: Arc<TypeDescriptor>,
}

impl ComponentDescriptor {
    /// Create a component descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// A constructible data type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    code: String,
    kind: TypeKind,
    construction: Construction,
}

impl TypeDescriptor {
    /// Create a descriptor constructed from the owning message only.
    pub fn new(code: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            code: code.into(),
            kind,
            construction: Construction::OwnerOnly,
        }
    }

    /// Create a primitive type descriptor.
    pub fn primitive(code: impl Into<String>) -> Self {
        Self::new(code, TypeKind::Primitive)
    }

    /// Create a composite type descriptor.
    pub fn composite(code: impl Into<String>, components: Vec<ComponentDescriptor>) -> Self {
        Self::new(code, TypeKind::Composite(components))
    }

    /// Mark the type as accepting a description at construction.
    pub fn describable(mut self) -> Self {
        self.construction = Construction::WithDescription;
        self
    }

    /// Type code (e.g. `ST`).
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Type kind.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Construction capability.
    pub fn construction(&self) -> Construction {
        self.construction
    }

    /// Does this type accept a description parameter?
    pub fn accepts_description(&self) -> bool {
        self.construction == Construction::WithDescription
    }

    /// Check if this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive)
    }

    /// Check if this is a composite type.
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, TypeKind::Composite(_))
    }

    /// Get components if this is a composite.
    pub fn components(&self) -> Option<&[ComponentDescriptor]> {
        match &self.kind {
            TypeKind::Composite(components) => Some(components),
            TypeKind::Primitive => None,
        }
    }

    /// Get component index by name.
    pub fn component_index(&self, name: &str) -> Option<usize> {
        self.components()?.iter().position(|c| c.name == name)
    }

    /// Create a fresh, empty instance.
    ///
    /// `description` is passed on only when the type accepts one.
    pub fn instantiate(&self, owner: &MessageRef, description: Option<&str>) -> ConcreteValue {
        let description: Option<Arc<str>> = match self.construction {
            Construction::WithDescription => description.map(Arc::from),
            Construction::OwnerOnly => None,
        };
        self.build(owner, description)
    }

    fn build(&self, owner: &MessageRef, description: Option<Arc<str>>) -> ConcreteValue {
        let identity = TypeIdentity::named(&self.code);
        match &self.kind {
            TypeKind::Primitive => {
                ConcreteValue::Primitive(Primitive::new(identity, owner.clone(), description))
            }
            TypeKind::Composite(components) => {
                let values = components
                    .iter()
                    .map(|c| c.type_desc.build(owner, None))
                    .collect();
                ConcreteValue::Composite(Composite::new(
                    identity,
                    values,
                    owner.clone(),
                    description,
                ))
            }
        }
    }
}
