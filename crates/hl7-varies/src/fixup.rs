// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolution of self-describing fields inside one record.
//!
//! For every repetition of the self-describing field the discriminator is
//! read, defaulted if configured, corrected for the schema version and
//! resolved through the type factory. The repetition's slot then receives a
//! fresh value of the resolved type with its previous content migrated in.
//!
//! ```text
//! Unresolved --(empty code, default set)--> Defaulted --+
//!     |                                                 |
//!     +-------------------------------------------------+--> Resolved
//!     |                                                 +--> Failed (UnresolvedType)
//!     +--(empty code, empty slot)--> EmptyAccepted
//!     +--(empty code, data)--------> Failed (RequiredFieldMissing)
//! ```

use crate::compat::effective_code;
use crate::config::{FieldLayout, ParserOptions};
use crate::copy::{CopyPolicy, StructuralCopy};
use crate::error::{Error, RecordError, Result};
use crate::model::{ConcreteValue, Record};
use crate::observer::{FixupEvent, FixupObserver, LogObserver};
use crate::slot::ValueSlot;
use crate::types::{TypeFactory, TypeResolver};

/// Escaped form of the subcomponent delimiter (`&`).
pub const ESCAPED_SUBCOMPONENT_DELIMITER: &str = "\\T\\";

/// Terminal state of one repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepetitionOutcome {
    /// The slot holds a value of `type_name`.
    Resolved {
        /// Type now held by the slot.
        type_name: String,
        /// The configured default code was used.
        defaulted: bool,
        /// The configured fallback code was used.
        via_fallback: bool,
    },
    /// No type code and no data; the slot keeps the generic placeholder.
    EmptyAccepted,
}

/// Per-repetition outcomes of one fixup run, indexed by repetition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixupReport {
    /// Outcome of each repetition.
    pub outcomes: Vec<RepetitionOutcome>,
}

impl FixupReport {
    /// Number of repetitions that were resolved.
    pub fn resolved_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RepetitionOutcome::Resolved { .. }))
            .count()
    }
}

/// Configured fixup procedure.
///
/// Defaults to the OBX layout, [`LogObserver`] and [`StructuralCopy`].
pub struct FieldFixup<'a> {
    factory: &'a dyn TypeFactory,
    options: &'a ParserOptions,
    layout: FieldLayout,
    observer: &'a dyn FixupObserver,
    copy_policy: &'a dyn CopyPolicy,
}

impl<'a> FieldFixup<'a> {
    /// Create a fixup over `factory` with `options`.
    pub fn new(factory: &'a dyn TypeFactory, options: &'a ParserOptions) -> Self {
        Self {
            factory,
            options,
            layout: FieldLayout::OBX,
            observer: &LogObserver,
            copy_policy: &StructuralCopy,
        }
    }

    /// Use a different field layout.
    ///
    /// The layout is validated when [`FieldFixup::run`] starts.
    pub fn with_layout(mut self, layout: FieldLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Report events to `observer`.
    pub fn with_observer(mut self, observer: &'a dyn FixupObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Migrate slot content with `policy`.
    pub fn with_copy_policy(mut self, policy: &'a dyn CopyPolicy) -> Self {
        self.copy_policy = policy;
        self
    }

    /// Fix every repetition of the self-describing field in `record`.
    ///
    /// Stops at the first failing repetition; earlier repetitions keep
    /// their resolved values. An invalid layout fails before the record is
    /// touched, with the [`ConfigError`](crate::ConfigError) as source.
    pub fn run<R: Record + ?Sized>(&self, record: &mut R) -> Result<FixupReport> {
        let record_name = record.name().to_string();
        let value_pos = self.layout.value;

        self.layout.validate().map_err(|e| {
            Error::internal(format!("checking field layout for {}", record_name), e)
        })?;

        let version = record
            .message()
            .get()
            .map(|m| m.version().to_string())
            .ok_or_else(|| {
                Error::internal(
                    format!("reading schema version for {}-{}", record_name, value_pos),
                    RecordError::MessageDropped,
                )
            })?;

        let repetitions = record
            .slots_mut(value_pos)
            .map_err(|e| Error::internal(format!("reading {}-{}", record_name, value_pos), e))?
            .len();

        let mut report = FixupReport::default();
        for rep in 0..repetitions {
            let outcome = self.fix_repetition(record, &record_name, &version, rep)?;
            report.outcomes.push(outcome);
        }
        Ok(report)
    }

    fn fix_repetition<R: Record + ?Sized>(
        &self,
        record: &mut R,
        record_name: &str,
        version: &str,
        rep: usize,
    ) -> Result<RepetitionOutcome> {
        let disc_pos = self.layout.discriminator;
        let value_pos = self.layout.value;

        let mut code = record
            .text(disc_pos, 0)
            .map_err(|e| Error::internal(format!("reading {}-{}", record_name, disc_pos), e))?
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let mut defaulted = false;
        if code.is_none() {
            if let Some(default) = self.options.default_code() {
                record.set_text(disc_pos, 0, default).map_err(|e| {
                    Error::internal(format!("writing {}-{}", record_name, disc_pos), e)
                })?;
                self.observer.on_event(&FixupEvent::DefaultCodeApplied {
                    record: record_name.to_string(),
                    position: disc_pos,
                    code: default.to_string(),
                });
                code = Some(default.to_string());
                defaulted = true;
            }
        }

        let Some(code) = code else {
            let slot = slot_mut(record, record_name, value_pos, rep)?;
            if !slot.is_empty() {
                return Err(Error::RequiredFieldMissing {
                    record: record_name.to_string(),
                    position: value_pos,
                    discriminator_position: disc_pos,
                });
            }
            self.observer.on_event(&FixupEvent::LeftGeneric {
                record: record_name.to_string(),
                repetition: rep,
            });
            return Ok(RepetitionOutcome::EmptyAccepted);
        };

        let effective = effective_code(&code, version);
        if effective != code {
            self.observer.on_event(&FixupEvent::CodeAdjusted {
                raw: code.clone(),
                effective: effective.to_string(),
                version: version.to_string(),
            });
        }

        let fallback = self.options.fallback_invalid_code();
        let resolved = TypeResolver::new(self.factory)
            .resolve(effective, version, fallback)
            .map_err(|e| {
                Error::internal(
                    format!("looking up '{}' for version {}", effective, version),
                    e,
                )
            })?;

        let Some(resolved) = resolved else {
            // Diagnostic only: a missing record id must not mask the real error.
            let record_id = record
                .text(self.layout.record_id, 0)
                .ok()
                .flatten()
                .unwrap_or_default();
            return Err(Error::UnresolvedType {
                code: effective.to_string(),
                version: version.to_string(),
                record: record_name.to_string(),
                record_id,
                position: value_pos,
            });
        };

        if resolved.via_fallback {
            self.observer.on_event(&FixupEvent::FallbackUsed {
                requested: effective.to_string(),
                fallback: resolved.descriptor.code().to_string(),
                version: version.to_string(),
            });
        }

        let slot = slot_mut(record, record_name, value_pos, rep)?;
        let new_value = resolved
            .descriptor
            .instantiate(slot.owner_message(), slot.description());

        if self.options.escape_subcomponent_delimiter_in_primitive
            && resolved.descriptor.is_primitive()
        {
            if let Some(collapsed) = collapse_subcomponents(slot.get()) {
                *slot.get_mut() = collapsed;
                self.observer.on_event(&FixupEvent::SubcomponentsEscaped {
                    record: record_name.to_string(),
                    repetition: rep,
                });
            }
        }

        slot.set_with(new_value, self.copy_policy);

        let type_name = slot.type_name().to_string();
        self.observer.on_event(&FixupEvent::Resolved {
            record: record_name.to_string(),
            repetition: rep,
            type_name: type_name.clone(),
        });
        Ok(RepetitionOutcome::Resolved {
            type_name,
            defaulted,
            via_fallback: resolved.via_fallback,
        })
    }
}

/// Fix the self-describing field of `record` with the OBX layout, logging
/// through the `log` facade.
pub fn fix_self_describing_field<R: Record + ?Sized>(
    record: &mut R,
    factory: &dyn TypeFactory,
    options: &ParserOptions,
) -> Result<FixupReport> {
    FieldFixup::new(factory, options).run(record)
}

fn slot_mut<'r, R: Record + ?Sized>(
    record: &'r mut R,
    record_name: &str,
    position: usize,
    rep: usize,
) -> Result<&'r mut ValueSlot> {
    let context = || format!("accessing {}-{} rep {}", record_name, position, rep);
    record
        .slots_mut(position)
        .map_err(|e| Error::internal(context(), e))?
        .get_mut(rep)
        .ok_or_else(|| Error::internal(context(), "repetition disappeared during fixup"))
}

/// Generic composite whose first component has subcomponents, folded into a
/// generic primitive: `a&b^c` becomes `a\T\b`.
fn collapse_subcomponents(held: &ConcreteValue) -> Option<ConcreteValue> {
    let composite = held.as_composite()?;
    if !composite.identity().is_generic() {
        return None;
    }
    let first = composite.component(0)?.as_composite()?;
    let text = first
        .components()
        .iter()
        .map(|c| c.leaf_texts().into_iter().flatten().collect::<String>())
        .collect::<Vec<_>>()
        .join(ESCAPED_SUBCOMPONENT_DELIMITER);

    let mut collapsed = ConcreteValue::generic_text(held.owner().clone(), text);
    for (index, extra) in held.extra_components().iter().enumerate() {
        *collapsed.extra_component_mut(index) = extra.clone();
    }
    Some(collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Composite, Message, Segment, SegmentDefinition, TypeIdentity};
    use crate::observer::RecordingObserver;
    use crate::types::TypeRegistry;
    use std::sync::Arc;

    fn obx(version: &str) -> (Arc<Message>, Segment) {
        let msg = Message::new("ORU_R01", version);
        let seg = Segment::new(SegmentDefinition::obx(), &msg);
        (msg, seg)
    }

    fn fill(seg: &mut Segment, rep: usize, text: &str) {
        let slot = seg.slot_mut(5, rep).expect("slot");
        let owner = slot.owner_message().clone();
        *slot.get_mut() = ConcreteValue::generic_text(owner, text);
    }

    #[test]
    fn test_resolves_primitive_and_keeps_text() {
        let (_msg, mut seg) = obx("2.5");
        seg.set_text(1, 0, "1").expect("set id");
        seg.set_text(2, 0, "DT").expect("value type");
        fill(&mut seg, 0, "19901012");

        let registry = TypeRegistry::standard();
        let report =
            fix_self_describing_field(&mut seg, &registry, &ParserOptions::new()).expect("fixup");

        assert_eq!(report.resolved_count(), 1);
        let slot = &seg.slots(5).expect("slots")[0];
        assert_eq!(slot.type_name(), "DT");
        assert_eq!(slot.get().text(), Some("19901012"));
        assert_eq!(slot.get().description(), Some("Observation Value"));
    }

    #[test]
    fn test_no_repetitions_is_noop() {
        let (_msg, mut seg) = obx("2.5");
        let registry = TypeRegistry::standard();
        let report =
            fix_self_describing_field(&mut seg, &registry, &ParserOptions::new()).expect("fixup");
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_dtm_downgraded_before_lookup() {
        let (_msg, mut seg) = obx("2.4");
        seg.set_text(2, 0, "DTM").expect("value type");
        fill(&mut seg, 0, "20240101");

        let registry = TypeRegistry::standard();
        let observer = RecordingObserver::new();
        let options = ParserOptions::new();
        FieldFixup::new(&registry, &options)
            .with_observer(&observer)
            .run(&mut seg)
            .expect("fixup");

        assert_eq!(seg.slots(5).expect("slots")[0].type_name(), "DT");
        assert!(observer.events().contains(&FixupEvent::CodeAdjusted {
            raw: "DTM".into(),
            effective: "DT".into(),
            version: "2.4".into(),
        }));
    }

    #[test]
    fn test_unresolved_names_record_and_position() {
        let (_msg, mut seg) = obx("2.5");
        seg.set_text(1, 0, "7").expect("set id");
        seg.set_text(2, 0, "XYZ").expect("value type");
        fill(&mut seg, 0, "abc");

        let registry = TypeRegistry::standard();
        let err = fix_self_describing_field(&mut seg, &registry, &ParserOptions::new())
            .expect_err("unknown code");
        match err {
            Error::UnresolvedType {
                code,
                version,
                record_id,
                position,
                ..
            } => {
                assert_eq!(code, "XYZ");
                assert_eq!(version, "2.5");
                assert_eq!(record_id, "7");
                assert_eq!(position, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(seg.slots(5).expect("slots")[0].type_name(), "*");
    }

    #[test]
    fn test_escape_subcomponents_into_primitive() {
        let (_msg, mut seg) = obx("2.5");
        seg.set_text(2, 0, "ST").expect("value type");
        {
            let slot = seg.slot_mut(5, 0).expect("slot");
            let owner = slot.owner_message().clone();
            let first = ConcreteValue::generic_composite(owner.clone(), ["a", "b"]);
            let second = ConcreteValue::generic_text(owner.clone(), "c");
            *slot.get_mut() = ConcreteValue::Composite(Composite::new(
                TypeIdentity::Generic,
                vec![first, second],
                owner,
                None,
            ));
        }

        let registry = TypeRegistry::standard();
        let options = ParserOptions::new().with_subcomponent_escaping(true);
        let observer = RecordingObserver::new();
        FieldFixup::new(&registry, &options)
            .with_observer(&observer)
            .run(&mut seg)
            .expect("fixup");

        let slot = &seg.slots(5).expect("slots")[0];
        assert_eq!(slot.get().text(), Some("a\\T\\b"));
        assert!(observer
            .events()
            .iter()
            .any(|e| matches!(e, FixupEvent::SubcomponentsEscaped { .. })));
    }

    #[test]
    fn test_without_escaping_first_subcomponent_wins() {
        let (_msg, mut seg) = obx("2.5");
        seg.set_text(2, 0, "ST").expect("value type");
        {
            let slot = seg.slot_mut(5, 0).expect("slot");
            let owner = slot.owner_message().clone();
            let first = ConcreteValue::generic_composite(owner.clone(), ["a", "b"]);
            *slot.get_mut() = ConcreteValue::Composite(Composite::new(
                TypeIdentity::Generic,
                vec![first],
                owner,
                None,
            ));
        }
        let registry = TypeRegistry::standard();
        fix_self_describing_field(&mut seg, &registry, &ParserOptions::new()).expect("fixup");
        assert_eq!(seg.slots(5).expect("slots")[0].get().text(), Some("a"));
    }

    #[test]
    fn test_collapse_ignores_plain_values() {
        let owner = crate::model::MessageRef::detached();
        assert!(collapse_subcomponents(&ConcreteValue::generic_text(owner.clone(), "x")).is_none());
        let flat = ConcreteValue::generic_composite(owner, ["x", "y"]);
        assert!(collapse_subcomponents(&flat).is_none());
    }

    #[test]
    fn test_custom_layout() {
        let msg = Message::new("MFN_M01", "2.5");
        let def = Arc::new(
            SegmentDefinition::new("ZVL")
                .field("Key", "ST")
                .varies_field("Value", false)
                .field("Kind", "ID"),
        );
        let mut seg = Segment::new(def, &msg);
        seg.set_text(3, 0, "NM").expect("kind");
        let slot = seg.slot_mut(2, 0).expect("slot");
        let owner = slot.owner_message().clone();
        *slot.get_mut() = ConcreteValue::generic_text(owner, "42");

        let registry = TypeRegistry::standard();
        let options = ParserOptions::new();
        let layout = FieldLayout {
            record_id: 1,
            discriminator: 3,
            value: 2,
        };
        FieldFixup::new(&registry, &options)
            .with_layout(layout)
            .run(&mut seg)
            .expect("fixup");
        let slot = &seg.slots(2).expect("slots")[0];
        assert_eq!(slot.type_name(), "NM");
        assert_eq!(slot.get().text(), Some("42"));
    }

    #[test]
    fn test_invalid_layout_rejected_before_reading_record() {
        let (_msg, mut seg) = obx("2.5");
        seg.set_text(2, 0, "ST").expect("value type");
        fill(&mut seg, 0, "kept");

        let registry = TypeRegistry::standard();
        let options = ParserOptions::new().with_default_code("TX");
        let layout = FieldLayout {
            record_id: 1,
            discriminator: 5,
            value: 5,
        };
        let err = FieldFixup::new(&registry, &options)
            .with_layout(layout)
            .run(&mut seg)
            .expect_err("discriminator and value collide");

        assert!(!err.is_domain_error());
        let source = std::error::Error::source(&err).expect("cause");
        assert!(matches!(
            source.downcast_ref::<crate::ConfigError>(),
            Some(crate::ConfigError::Invalid(_))
        ));
        let slot = &seg.slots(5).expect("slots")[0];
        assert!(!slot.is_resolved());
        assert_eq!(slot.get().text(), Some("kept"));
    }

    #[test]
    fn test_layout_pointing_at_typed_field_is_internal() {
        let (_msg, mut seg) = obx("2.5");
        let registry = TypeRegistry::standard();
        let options = ParserOptions::new();
        let layout = FieldLayout {
            record_id: 1,
            discriminator: 2,
            value: 3,
        };
        let err = FieldFixup::new(&registry, &options)
            .with_layout(layout)
            .run(&mut seg)
            .expect_err("OBX-3 is not self-describing");
        assert!(!err.is_domain_error());
    }
}
