// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Placeholder for a field whose type is decided at runtime.
//!
//! A [`ValueSlot`] always holds a [`ConcreteValue`]. Until the type is known
//! it holds the generic primitive, which a parser can fill with whatever it
//! read off the wire. When the real type is resolved the slot's content is
//! migrated into the new value before the swap.

use crate::copy::{CopyPolicy, StructuralCopy};
use crate::model::{ConcreteValue, MessageRef, UNRESOLVED_TYPE_NAME};
use std::sync::Arc;

/// Holder for one repetition of a self-describing field.
#[derive(Debug, Clone)]
pub struct ValueSlot {
    held: ConcreteValue,
    owner: MessageRef,
    description: Option<Arc<str>>,
}

impl ValueSlot {
    /// Create a slot holding the generic placeholder.
    pub fn new(owner: MessageRef, description: Option<&str>) -> Self {
        Self {
            held: ConcreteValue::generic(owner.clone()),
            owner,
            description: description.map(Arc::from),
        }
    }

    /// Currently held value.
    pub fn get(&self) -> &ConcreteValue {
        &self.held
    }

    /// Mutable access to the held value (parsers fill the placeholder through this).
    pub fn get_mut(&mut self) -> &mut ConcreteValue {
        &mut self.held
    }

    /// Replace the held value, migrating existing content with [`StructuralCopy`].
    pub fn set(&mut self, new_value: ConcreteValue) {
        self.set_with(new_value, &StructuralCopy);
    }

    /// Replace the held value, migrating existing content with `policy`.
    ///
    /// If the slot is empty this is a plain replacement.
    pub fn set_with(&mut self, mut new_value: ConcreteValue, policy: &dyn CopyPolicy) {
        if !self.held.is_empty() {
            policy.copy_into(&self.held, &mut new_value);
        }
        self.held = new_value;
    }

    /// Reset to the generic placeholder, discarding content.
    pub fn clear(&mut self) {
        self.held = ConcreteValue::generic(self.owner.clone());
    }

    /// Type code of the held value, or `"*"` while unresolved.
    pub fn type_name(&self) -> &str {
        self.held.type_code().unwrap_or(UNRESOLVED_TYPE_NAME)
    }

    /// True once a concrete type has been set.
    pub fn is_resolved(&self) -> bool {
        !self.held.identity().is_generic()
    }

    /// True if the held value carries no data.
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Extra components of the held value.
    pub fn extra_components(&self) -> &[ConcreteValue] {
        self.held.extra_components()
    }

    /// Human-readable label given at construction.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Enclosing message.
    pub fn owner_message(&self) -> &MessageRef {
        &self.owner
    }
}
