// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message handle and the non-owning reference held by values.

use std::fmt;
use std::sync::{Arc, Weak};

/// Minimal message context: the values inside a message only need its
/// schema version and name.
#[derive(Debug, PartialEq, Eq)]
pub struct Message {
    name: String,
    version: String,
}

impl Message {
    /// Create a shared message handle.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            version: version.into(),
        })
    }

    /// Message structure name (e.g. `ORU_R01`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema version (e.g. `2.5.1`).
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Non-owning reference for values created inside this message.
    pub fn downgrade(self: &Arc<Self>) -> MessageRef {
        MessageRef(Arc::downgrade(self))
    }
}

/// Non-owning reference to the enclosing [`Message`].
#[derive(Clone, Default)]
pub struct MessageRef(Weak<Message>);

impl MessageRef {
    /// A reference that never resolves.
    pub fn detached() -> Self {
        Self(Weak::new())
    }

    /// Upgrade to the message, if it is still alive.
    pub fn get(&self) -> Option<Arc<Message>> {
        self.0.upgrade()
    }

    /// True if both references point at the same message.
    pub fn ptr_eq(&self, other: &MessageRef) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(msg) => write!(f, "MessageRef({} v{})", msg.name, msg.version),
            None => write!(f, "MessageRef(<dropped>)"),
        }
    }
}

impl From<&Arc<Message>> for MessageRef {
    fn from(msg: &Arc<Message>) -> Self {
        msg.downgrade()
    }
}
