// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concrete field values.

use crate::model::MessageRef;
use std::fmt;
use std::sync::Arc;

/// Type name reported for values whose type is not known yet.
pub const UNRESOLVED_TYPE_NAME: &str = "*";

/// Which type a value is an instance of.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeIdentity {
    /// Untyped placeholder produced before resolution.
    Generic,
    /// Resolved data type code (e.g. `ST`, `CE`).
    Named(Arc<str>),
}

impl TypeIdentity {
    /// Named identity from a type code.
    pub fn named(code: &str) -> Self {
        Self::Named(Arc::from(code))
    }

    /// Type code, or `None` when generic.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Generic => None,
            Self::Named(code) => Some(&**code),
        }
    }

    /// True for [`TypeIdentity::Generic`].
    pub fn is_generic(&self) -> bool {
        matches!(self, Self::Generic)
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code().unwrap_or(UNRESOLVED_TYPE_NAME))
    }
}

/// Single-valued field content.
#[derive(Debug, Clone)]
pub struct Primitive {
    identity: TypeIdentity,
    value: Option<String>,
    extra: Vec<ConcreteValue>,
    owner: MessageRef,
    description: Option<Arc<str>>,
}

impl Primitive {
    /// Create an empty primitive.
    pub fn new(identity: TypeIdentity, owner: MessageRef, description: Option<Arc<str>>) -> Self {
        Self {
            identity,
            value: None,
            extra: Vec::new(),
            owner,
            description,
        }
    }

    /// Type identity.
    pub fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    /// Textual value (`None` when never set).
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Set or clear the textual value.
    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.value == other.value && self.extra == other.extra
    }
}

/// Multi-component field content.
#[derive(Debug, Clone)]
pub struct Composite {
    identity: TypeIdentity,
    components: Vec<ConcreteValue>,
    extra: Vec<ConcreteValue>,
    owner: MessageRef,
    description: Option<Arc<str>>,
}

impl Composite {
    /// Create a composite from its ordered components.
    pub fn new(
        identity: TypeIdentity,
        components: Vec<ConcreteValue>,
        owner: MessageRef,
        description: Option<Arc<str>>,
    ) -> Self {
        Self {
            identity,
            components,
            extra: Vec::new(),
            owner,
            description,
        }
    }

    /// Type identity.
    pub fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    /// Declared components.
    pub fn components(&self) -> &[ConcreteValue] {
        &self.components
    }

    /// Component by zero-based index.
    pub fn component(&self, index: usize) -> Option<&ConcreteValue> {
        self.components.get(index)
    }

    /// Mutable component by zero-based index.
    pub fn component_mut(&mut self, index: usize) -> Option<&mut ConcreteValue> {
        self.components.get_mut(index)
    }

    /// Generic composites grow on demand, typed ones have a fixed shape.
    pub fn component_or_grow(&mut self, index: usize) -> Option<&mut ConcreteValue> {
        if self.identity.is_generic() {
            while self.components.len() <= index {
                let filler = ConcreteValue::generic(self.owner.clone());
                self.components.push(filler);
            }
        }
        self.components.get_mut(index)
    }
}

impl PartialEq for Composite {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && self.components == other.components
            && self.extra == other.extra
    }
}

/// A value held by a field: either a primitive or a composite.
///
/// Equality compares type identity and content, not the owning message.
#[derive(Debug, Clone, PartialEq)]
pub enum ConcreteValue {
    /// Single text value.
    Primitive(Primitive),
    /// Ordered components.
    Composite(Composite),
}

impl ConcreteValue {
    /// The untyped, empty placeholder.
    pub fn generic(owner: MessageRef) -> Self {
        Self::Primitive(Primitive::new(TypeIdentity::Generic, owner, None))
    }

    /// Generic primitive carrying `text`.
    pub fn generic_text(owner: MessageRef, text: impl Into<String>) -> Self {
        let mut p = Primitive::new(TypeIdentity::Generic, owner, None);
        p.set_value(Some(text.into()));
        Self::Primitive(p)
    }

    /// Generic composite whose components are generic primitives.
    pub fn generic_composite<I, S>(owner: MessageRef, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let components = texts
            .into_iter()
            .map(|t| Self::generic_text(owner.clone(), t))
            .collect();
        Self::Composite(Composite::new(TypeIdentity::Generic, components, owner, None))
    }

    /// Type identity of the held variant.
    pub fn identity(&self) -> &TypeIdentity {
        match self {
            Self::Primitive(p) => &p.identity,
            Self::Composite(c) => &c.identity,
        }
    }

    /// Resolved type code, or `None` for generic values.
    pub fn type_code(&self) -> Option<&str> {
        self.identity().code()
    }

    /// True if the value carries no observable data.
    ///
    /// Composites always count as non-empty; primitives are empty only when
    /// their value was never set.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Primitive(p) => p.value.is_none(),
            Self::Composite(_) => false,
        }
    }

    /// True for the untouched generic placeholder: no type, no data, no extras.
    pub fn is_placeholder(&self) -> bool {
        match self {
            Self::Primitive(p) => {
                p.identity.is_generic() && p.value.is_none() && p.extra.is_empty()
            }
            Self::Composite(_) => false,
        }
    }

    /// Point this value and everything below it at `owner`.
    pub(crate) fn rehome(&mut self, owner: &MessageRef) {
        let (own, children, extra) = match self {
            Self::Primitive(p) => (&mut p.owner, None, &mut p.extra),
            Self::Composite(c) => (&mut c.owner, Some(&mut c.components), &mut c.extra),
        };
        *own = owner.clone();
        for child in children.into_iter().flatten().chain(extra.iter_mut()) {
            child.rehome(owner);
        }
    }

    /// True for primitives.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Try to get as primitive.
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Self::Primitive(p) => Some(p),
            Self::Composite(_) => None,
        }
    }

    /// Try to get as mutable primitive.
    pub fn as_primitive_mut(&mut self) -> Option<&mut Primitive> {
        match self {
            Self::Primitive(p) => Some(p),
            Self::Composite(_) => None,
        }
    }

    /// Try to get as composite.
    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            Self::Composite(c) => Some(c),
            Self::Primitive(_) => None,
        }
    }

    /// Try to get as mutable composite.
    pub fn as_composite_mut(&mut self) -> Option<&mut Composite> {
        match self {
            Self::Composite(c) => Some(c),
            Self::Primitive(_) => None,
        }
    }

    /// Text of a primitive value.
    pub fn text(&self) -> Option<&str> {
        self.as_primitive().and_then(Primitive::value)
    }

    /// Components appended beyond the declared shape.
    pub fn extra_components(&self) -> &[ConcreteValue] {
        match self {
            Self::Primitive(p) => &p.extra,
            Self::Composite(c) => &c.extra,
        }
    }

    /// Extra component at `index`, created as a generic value if missing.
    pub fn extra_component_mut(&mut self, index: usize) -> &mut ConcreteValue {
        let owner = self.owner().clone();
        let extra = match self {
            Self::Primitive(p) => &mut p.extra,
            Self::Composite(c) => &mut c.extra,
        };
        while extra.len() <= index {
            extra.push(Self::generic(owner.clone()));
        }
        &mut extra[index]
    }

    /// Enclosing message reference.
    pub fn owner(&self) -> &MessageRef {
        match self {
            Self::Primitive(p) => &p.owner,
            Self::Composite(c) => &c.owner,
        }
    }

    /// Description given at construction.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Primitive(p) => p.description.as_deref(),
            Self::Composite(c) => c.description.as_deref(),
        }
    }

    /// All leaf texts in depth-first order, `None` for unset leaves.
    pub fn leaf_texts(&self) -> Vec<Option<&str>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<Option<&'a str>>) {
        match self {
            Self::Primitive(p) => out.push(p.value()),
            Self::Composite(c) => {
                for component in &c.components {
                    component.collect_leaves(out);
                }
            }
        }
    }
}
