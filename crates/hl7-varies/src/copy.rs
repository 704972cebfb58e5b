// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Content migration between values of different shapes.

use crate::model::ConcreteValue;

/// Copies the observable content of one value into another.
///
/// Implementations must not fail when the shapes differ: source content
/// with no counterpart is dropped, destination content with no source is
/// left at its default.
pub trait CopyPolicy: Send + Sync {
    /// Copy `source` into `destination`.
    fn copy_into(&self, source: &ConcreteValue, destination: &mut ConcreteValue);
}

/// Position-based structural copy.
///
/// - primitive -> primitive: text
/// - composite -> composite: component-wise, recursively, up to the shorter shape
/// - primitive -> composite: into the first component
/// - composite -> primitive: from the first component
/// - anything -> generic placeholder: cloned whole, keeping the destination's owner
/// - extra components: positionally, growing the destination
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralCopy;

impl CopyPolicy for StructuralCopy {
    fn copy_into(&self, source: &ConcreteValue, destination: &mut ConcreteValue) {
        copy_value(source, destination);
    }
}

fn copy_value(source: &ConcreteValue, dest: &mut ConcreteValue) {
    // A placeholder has no shape of its own to map onto.
    if dest.is_placeholder() {
        let owner = dest.owner().clone();
        *dest = source.clone();
        dest.rehome(&owner);
        return;
    }

    match source {
        ConcreteValue::Primitive(s) => match &mut *dest {
            ConcreteValue::Primitive(d) => d.set_value(s.value().map(str::to_owned)),
            ConcreteValue::Composite(d) => {
                if let Some(first) = d.component_or_grow(0) {
                    copy_value(source, first);
                }
            }
        },
        ConcreteValue::Composite(s) => {
            if dest.is_primitive() {
                if let Some(first) = s.component(0) {
                    copy_value(first, dest);
                }
            } else if let ConcreteValue::Composite(d) = &mut *dest {
                for (index, component) in s.components().iter().enumerate() {
                    match d.component_or_grow(index) {
                        Some(target) => copy_value(component, target),
                        None => break,
                    }
                }
            }
        }
    }

    for (index, extra) in source.extra_components().iter().enumerate() {
        copy_value(extra, dest.extra_component_mut(index));
    }
}
