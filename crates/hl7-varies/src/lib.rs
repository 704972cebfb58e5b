// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hl7-varies - runtime typing of self-describing message fields
//!
//! Some message fields carry no fixed data type in the schema: their type is
//! named by a sibling field of the same record. The canonical example is the
//! observation segment, where `OBX-5` (Observation Value) is typed by
//! `OBX-2` (Value Type). A parser first captures such a field into a generic
//! placeholder; once the record is complete, the placeholder is resolved to
//! its real type and its content migrated over.
//!
//! ## Quick Start
//!
//! ```rust
//! use hl7_varies::model::{ConcreteValue, Message, Record, Segment, SegmentDefinition};
//! use hl7_varies::types::TypeRegistry;
//! use hl7_varies::{fix_self_describing_field, ParserOptions};
//!
//! let msg = Message::new("ORU_R01", "2.5");
//! let mut obx = Segment::new(SegmentDefinition::obx(), &msg);
//! obx.set_text(1, 0, "1").unwrap();
//! obx.set_text(2, 0, "NM").unwrap();
//!
//! // What a parser would leave behind for OBX-5.
//! let slot = obx.slot_mut(5, 0).unwrap();
//! *slot.get_mut() = ConcreteValue::generic_text(slot.owner_message().clone(), "7.2");
//! assert_eq!(slot.type_name(), "*");
//!
//! let registry = TypeRegistry::standard();
//! fix_self_describing_field(&mut obx, &registry, &ParserOptions::default()).unwrap();
//!
//! let slot = &obx.slots(5).unwrap()[0];
//! assert_eq!(slot.type_name(), "NM");
//! assert_eq!(slot.get().text(), Some("7.2"));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! FieldFixup ──> Record (discriminator text, slots)
//!     │
//!     ├─> compat::effective_code      (schema-evolution corrections)
//!     ├─> TypeResolver ──> TypeFactory (TypeRegistry)
//!     ├─> TypeDescriptor::instantiate (construction capability)
//!     └─> ValueSlot::set ──> CopyPolicy (StructuralCopy)
//! ```
//!
//! ## Modules Overview
//!
//! - [`fixup`] - the per-record procedure (start here)
//! - [`slot`] - the placeholder holding one repetition
//! - [`types`] - descriptors, factory seam, resolver
//! - [`model`] - messages, records, values
//! - [`config`] - parser options and YAML loading
//! - [`observer`] - injected event reporting

/// Schema-evolution corrections for type codes.
pub mod compat;
/// Parser options, field layout and YAML loading.
pub mod config;
/// Content migration between values.
pub mod copy;
/// Error types.
pub mod error;
/// Per-record resolution of self-describing fields.
pub mod fixup;
/// Messages, records and field values.
pub mod model;
/// Fixup event reporting.
pub mod observer;
/// Runtime-typed field placeholder.
pub mod slot;
/// Type descriptors, factory and resolver.
pub mod types;

pub use config::{FieldLayout, FixupConfig, ParserOptions};
pub use copy::{CopyPolicy, StructuralCopy};
pub use error::{BoxError, ConfigError, Error, RecordError, Result};
pub use fixup::{fix_self_describing_field, FieldFixup, FixupReport, RepetitionOutcome};
pub use observer::{FixupEvent, FixupObserver, LogObserver, RecordingObserver};
pub use slot::ValueSlot;
