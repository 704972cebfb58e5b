// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Data type descriptors, the factory seam and code resolution.
//!
//! # Example
//!
//! ```rust
//! use hl7_varies::model::MessageRef;
//! use hl7_varies::types::{CompositeBuilder, TypeRegistry, TypeResolver};
//!
//! let registry = TypeRegistry::standard();
//! registry.register(
//!     "2.5",
//!     CompositeBuilder::new("ZRD").component("Code", "ST").component("Rank", "NM").build(),
//! );
//!
//! let resolved = TypeResolver::new(&registry)
//!     .resolve("ZRD", "2.5", None)
//!     .unwrap()
//!     .unwrap();
//! let value = resolved.descriptor.instantiate(&MessageRef::detached(), None);
//! assert_eq!(value.type_code(), Some("ZRD"));
//! ```

mod builder;
mod descriptor;
mod factory;
mod resolver;

pub use builder::CompositeBuilder;
pub use descriptor::{ComponentDescriptor, Construction, TypeDescriptor, TypeKind};
pub use factory::{TypeFactory, TypeRegistry, STANDARD_VERSIONS};
pub use resolver::{Resolved, TypeResolver};
