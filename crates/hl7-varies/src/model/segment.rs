// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Records (segments) and the accessor trait the fixup runs against.
//!
//! Field positions are 1-based, repetitions are 0-based. Fields other than
//! the self-describing one are held as text primitives tagged with their
//! declared type code; their component structure is not modeled here.

use crate::error::RecordError;
use crate::model::{ConcreteValue, Message, MessageRef, Primitive, TypeIdentity};
use crate::slot::ValueSlot;
use std::sync::Arc;

/// Accessor over one record instance.
pub trait Record {
    /// Record (segment) name, e.g. `OBX`.
    fn name(&self) -> &str;

    /// Enclosing message.
    fn message(&self) -> &MessageRef;

    /// Text of repetition `rep` of the field at `position`.
    ///
    /// Returns `Ok(None)` when the repetition does not exist or was never set.
    fn text(&self, position: usize, rep: usize) -> Result<Option<String>, RecordError>;

    /// Overwrite the text of repetition `rep` of the field at `position`.
    fn set_text(&mut self, position: usize, rep: usize, text: &str) -> Result<(), RecordError>;

    /// All repetitions of the self-describing field at `position`, in order.
    fn slots_mut(&mut self, position: usize) -> Result<&mut [ValueSlot], RecordError>;
}

/// Declared kind of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Statically typed field with the given data type code.
    Typed(String),
    /// Self-describing field; type decided at runtime.
    Varies,
}

/// Field declaration inside a [`SegmentDefinition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Human-readable field name (used as slot description).
    pub name: String,
    /// Field kind.
    pub kind: FieldKind,
    /// Whether the field may repeat.
    pub repeating: bool,
}

/// Ordered field layout of a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDefinition {
    name: String,
    fields: Vec<FieldDefinition>,
}

impl SegmentDefinition {
    /// Start a definition with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a non-repeating typed field.
    pub fn field(mut self, name: impl Into<String>, code: impl Into<String>) -> Self {
        self.fields.push(FieldDefinition {
            name: name.into(),
            kind: FieldKind::Typed(code.into()),
            repeating: false,
        });
        self
    }

    /// Append a repeating typed field.
    pub fn repeating_field(mut self, name: impl Into<String>, code: impl Into<String>) -> Self {
        self.fields.push(FieldDefinition {
            name: name.into(),
            kind: FieldKind::Typed(code.into()),
            repeating: true,
        });
        self
    }

    /// Append a self-describing field.
    pub fn varies_field(mut self, name: impl Into<String>, repeating: bool) -> Self {
        self.fields.push(FieldDefinition {
            name: name.into(),
            kind: FieldKind::Varies,
            repeating,
        });
        self
    }

    /// Built-in OBX (observation) layout, fields 1 to 11.
    pub fn obx() -> Arc<Self> {
        Arc::new(
            Self::new("OBX")
                .field("Set ID - OBX", "SI")
                .field("Value Type", "ID")
                .field("Observation Identifier", "CE")
                .field("Observation Sub-ID", "ST")
                .varies_field("Observation Value", true)
                .field("Units", "CE")
                .field("References Range", "ST")
                .repeating_field("Abnormal Flags", "IS")
                .field("Probability", "NM")
                .repeating_field("Nature of Abnormal Test", "ID")
                .field("Observation Result Status", "ID"),
        )
    }

    /// Segment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field declaration at a 1-based position.
    pub fn field_def(&self, position: usize) -> Option<&FieldDefinition> {
        position.checked_sub(1).and_then(|i| self.fields.get(i))
    }
}

#[derive(Debug, Clone)]
enum FieldData {
    Typed(Vec<ConcreteValue>),
    Varies(Vec<ValueSlot>),
}

/// A record instance.
#[derive(Debug, Clone)]
pub struct Segment {
    definition: Arc<SegmentDefinition>,
    message: MessageRef,
    fields: Vec<FieldData>,
}

impl Segment {
    /// Create an empty segment inside `message`.
    pub fn new(definition: Arc<SegmentDefinition>, message: &Arc<Message>) -> Self {
        let fields = definition
            .fields
            .iter()
            .map(|f| match f.kind {
                FieldKind::Typed(_) => FieldData::Typed(Vec::new()),
                FieldKind::Varies => FieldData::Varies(Vec::new()),
            })
            .collect();
        Self {
            definition,
            message: message.downgrade(),
            fields,
        }
    }

    /// Segment definition.
    pub fn definition(&self) -> &Arc<SegmentDefinition> {
        &self.definition
    }

    /// Slot for repetition `rep` of the self-describing field, created on demand.
    pub fn slot_mut(&mut self, position: usize, rep: usize) -> Result<&mut ValueSlot, RecordError> {
        let description = self.def(position)?.name.clone();
        let owner = self.message.clone();
        let slots = self.varies_mut(position)?;
        while slots.len() <= rep {
            slots.push(ValueSlot::new(owner.clone(), Some(description.as_str())));
        }
        Ok(&mut slots[rep])
    }

    /// Repetitions of the self-describing field.
    pub fn slots(&self, position: usize) -> Result<&[ValueSlot], RecordError> {
        match self.data(position)? {
            FieldData::Varies(slots) => Ok(slots),
            FieldData::Typed(_) => Err(self.wrong_kind(position, "self-describing")),
        }
    }

    /// Number of repetitions currently present at `position`.
    pub fn repetitions(&self, position: usize) -> Result<usize, RecordError> {
        Ok(match self.data(position)? {
            FieldData::Typed(values) => values.len(),
            FieldData::Varies(slots) => slots.len(),
        })
    }

    fn def(&self, position: usize) -> Result<&FieldDefinition, RecordError> {
        self.definition
            .field_def(position)
            .ok_or_else(|| RecordError::PositionOutOfRange {
                record: self.definition.name.clone(),
                position,
            })
    }

    fn data(&self, position: usize) -> Result<&FieldData, RecordError> {
        self.def(position)?;
        Ok(&self.fields[position - 1])
    }

    fn varies_mut(&mut self, position: usize) -> Result<&mut Vec<ValueSlot>, RecordError> {
        let err = self.wrong_kind(position, "self-describing");
        self.def(position)?;
        match &mut self.fields[position - 1] {
            FieldData::Varies(slots) => Ok(slots),
            FieldData::Typed(_) => Err(err),
        }
    }

    fn wrong_kind(&self, position: usize, expected: &'static str) -> RecordError {
        RecordError::WrongFieldKind {
            record: self.definition.name.clone(),
            position,
            expected,
        }
    }
}

impl Record for Segment {
    fn name(&self) -> &str {
        &self.definition.name
    }

    fn message(&self) -> &MessageRef {
        &self.message
    }

    fn text(&self, position: usize, rep: usize) -> Result<Option<String>, RecordError> {
        match self.data(position)? {
            FieldData::Typed(values) => {
                Ok(values.get(rep).and_then(ConcreteValue::text).map(str::to_owned))
            }
            FieldData::Varies(_) => Err(self.wrong_kind(position, "typed")),
        }
    }

    fn set_text(&mut self, position: usize, rep: usize, text: &str) -> Result<(), RecordError> {
        let code = match &self.def(position)?.kind {
            FieldKind::Typed(code) => code.clone(),
            FieldKind::Varies => return Err(self.wrong_kind(position, "typed")),
        };
        let owner = self.message.clone();
        if let FieldData::Typed(values) = &mut self.fields[position - 1] {
            while values.len() <= rep {
                values.push(ConcreteValue::Primitive(Primitive::new(
                    TypeIdentity::named(&code),
                    owner.clone(),
                    None,
                )));
            }
            if let Some(p) = values[rep].as_primitive_mut() {
                p.set_value(Some(text.to_string()));
            }
        }
        Ok(())
    }

    fn slots_mut(&mut self, position: usize) -> Result<&mut [ValueSlot], RecordError> {
        self.varies_mut(position).map(Vec::as_mut_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obx_layout() {
        let obx = SegmentDefinition::obx();
        assert_eq!(obx.name(), "OBX");
        assert_eq!(obx.len(), 11);
        assert_eq!(obx.field_def(5).map(|f| &f.kind), Some(&FieldKind::Varies));
        assert_eq!(
            obx.field_def(2).map(|f| &f.kind),
            Some(&FieldKind::Typed("ID".into()))
        );
        assert!(obx.field_def(0).is_none());
        assert!(obx.field_def(12).is_none());
    }

    #[test]
    fn test_text_roundtrip_and_missing_rep() {
        let msg = Message::new("ORU_R01", "2.5");
        let mut seg = Segment::new(SegmentDefinition::obx(), &msg);
        assert_eq!(seg.text(2, 0).expect("text"), None);
        seg.set_text(2, 0, "NM").expect("set");
        assert_eq!(seg.text(2, 0).expect("text"), Some("NM".into()));
        assert_eq!(seg.repetitions(2).expect("reps"), 1);
    }

    #[test]
    fn test_slots_created_on_demand_with_description() {
        let msg = Message::new("ORU_R01", "2.5");
        let mut seg = Segment::new(SegmentDefinition::obx(), &msg);
        seg.slot_mut(5, 2).expect("slot");
        let slots = seg.slots(5).expect("slots");
        assert_eq!(slots.len(), 3);
        assert!(slots.iter().all(|s| s.description() == Some("Observation Value")));
        assert!(slots.iter().all(|s| s.owner_message().ptr_eq(&msg.downgrade())));
    }

    #[test]
    fn test_accessor_errors() {
        let msg = Message::new("ORU_R01", "2.5");
        let mut seg = Segment::new(SegmentDefinition::obx(), &msg);
        assert_eq!(
            seg.text(42, 0),
            Err(RecordError::PositionOutOfRange {
                record: "OBX".into(),
                position: 42
            })
        );
        assert!(matches!(
            seg.text(5, 0),
            Err(RecordError::WrongFieldKind { position: 5, .. })
        ));
        assert!(matches!(
            seg.slots_mut(2),
            Err(RecordError::WrongFieldKind { position: 2, .. })
        ));
    }
}
