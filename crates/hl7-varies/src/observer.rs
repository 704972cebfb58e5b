// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Injected observability for the fixup.
//!
//! The fixup never logs through global state directly: it reports
//! [`FixupEvent`]s to the [`FixupObserver`] it was given. [`LogObserver`]
//! forwards them to the `log` facade, [`RecordingObserver`] keeps them.

use parking_lot::Mutex;
use std::fmt;

/// Something noteworthy that happened while fixing a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixupEvent {
    /// The discriminator was empty and the configured default was written.
    DefaultCodeApplied {
        /// Record (segment) name.
        record: String,
        /// Discriminator position.
        position: usize,
        /// Code written into the discriminator.
        code: String,
    },
    /// A compatibility rule rewrote the code for this schema version.
    CodeAdjusted {
        /// Code as sent.
        raw: String,
        /// Code used for lookup.
        effective: String,
        /// Schema version of the message.
        version: String,
    },
    /// The code had no mapping and the fallback code was used.
    FallbackUsed {
        /// Code that had no mapping.
        requested: String,
        /// Code that resolved instead.
        fallback: String,
        /// Schema version of the message.
        version: String,
    },
    /// Subcomponents were folded into a primitive with escaped delimiters.
    SubcomponentsEscaped {
        /// Record (segment) name.
        record: String,
        /// Repetition index.
        repetition: usize,
    },
    /// A repetition now holds a value of the resolved type.
    Resolved {
        /// Record (segment) name.
        record: String,
        /// Repetition index.
        repetition: usize,
        /// Type now held.
        type_name: String,
    },
    /// Empty repetition with no type code, left as the placeholder.
    LeftGeneric {
        /// Record (segment) name.
        record: String,
        /// Repetition index.
        repetition: usize,
    },
}

impl fmt::Display for FixupEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultCodeApplied {
                record,
                position,
                code,
            } => write!(f, "{}-{} is empty, defaulting to '{}'", record, position, code),
            Self::CodeAdjusted {
                raw,
                effective,
                version,
            } => write!(f, "'{}' is not valid in {}, using '{}'", raw, version, effective),
            Self::FallbackUsed {
                requested,
                fallback,
                version,
            } => write!(
                f,
                "'{}' is unknown in {}, falling back to '{}'",
                requested, version, fallback
            ),
            Self::SubcomponentsEscaped { record, repetition } => {
                write!(f, "{} rep {}: subcomponents escaped into primitive", record, repetition)
            }
            Self::Resolved {
                record,
                repetition,
                type_name,
            } => write!(f, "{} rep {} resolved to {}", record, repetition, type_name),
            Self::LeftGeneric { record, repetition } => {
                write!(f, "{} rep {} has no type code and no data", record, repetition)
            }
        }
    }
}

/// Receiver of fixup events.
pub trait FixupObserver: Send + Sync {
    /// Called once per event, in order.
    fn on_event(&self, event: &FixupEvent);
}

/// Forwards events to the `log` facade.
///
/// Policy fallbacks (default code, fallback code) are logged at `info`,
/// everything else at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl FixupObserver for LogObserver {
    fn on_event(&self, event: &FixupEvent) {
        match event {
            FixupEvent::DefaultCodeApplied { .. } | FixupEvent::FallbackUsed { .. } => {
                log::info!("[fixup] {}", event);
            }
            _ => log::debug!("[fixup] {}", event),
        }
    }
}

/// Keeps every event for later inspection.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<FixupEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far.
    pub fn events(&self) -> Vec<FixupEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<FixupEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl FixupObserver for RecordingObserver {
    fn on_event(&self, event: &FixupEvent) {
        self.events.lock().push(event.clone());
    }
}
