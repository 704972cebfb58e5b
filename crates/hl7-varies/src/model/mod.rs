// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message object model: messages, records and field values.

mod message;
mod segment;
mod value;

pub use message::{Message, MessageRef};
pub use segment::{FieldDefinition, FieldKind, Record, Segment, SegmentDefinition};
pub use value::{Composite, ConcreteValue, Primitive, TypeIdentity, UNRESOLVED_TYPE_NAME};
