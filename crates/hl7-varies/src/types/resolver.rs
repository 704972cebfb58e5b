// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Code-to-type resolution with a configured fallback code.

use crate::error::BoxError;
use crate::types::{TypeDescriptor, TypeFactory};
use std::sync::Arc;

/// Outcome of a successful lookup.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Descriptor to instantiate.
    pub descriptor: Arc<TypeDescriptor>,
    /// True when the fallback code was used instead of the requested one.
    pub via_fallback: bool,
}

/// Looks codes up in a [`TypeFactory`], retrying with a fallback code.
pub struct TypeResolver<'a> {
    factory: &'a dyn TypeFactory,
}

impl<'a> TypeResolver<'a> {
    /// Create a resolver over `factory`.
    pub fn new(factory: &'a dyn TypeFactory) -> Self {
        Self { factory }
    }

    /// Resolve `code` at `version`.
    ///
    /// When `code` has no mapping and `fallback` is a non-empty code, the
    /// lookup is retried once with it. `Ok(None)` means neither resolved.
    pub fn resolve(
        &self,
        code: &str,
        version: &str,
        fallback: Option<&str>,
    ) -> Result<Option<Resolved>, BoxError> {
        if let Some(descriptor) = self.factory.type_descriptor(code, version)? {
            return Ok(Some(Resolved {
                descriptor,
                via_fallback: false,
            }));
        }

        let Some(fallback) = fallback.filter(|f| !f.is_empty()) else {
            return Ok(None);
        };
        Ok(self
            .factory
            .type_descriptor(fallback, version)?
            .map(|descriptor| Resolved {
                descriptor,
                via_fallback: true,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeRegistry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        inner: TypeRegistry,
        calls: AtomicUsize,
    }

    impl TypeFactory for Counting {
        fn type_descriptor(
            &self,
            code: &str,
            version: &str,
        ) -> Result<Option<Arc<TypeDescriptor>>, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.type_descriptor(code, version)
        }
    }

    fn counting() -> Counting {
        Counting {
            inner: TypeRegistry::standard(),
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_direct_hit_skips_fallback() {
        let factory = counting();
        let resolved = TypeResolver::new(&factory)
            .resolve("NM", "2.5", Some("ST"))
            .expect("lookup")
            .expect("found");
        assert_eq!(resolved.descriptor.code(), "NM");
        assert!(!resolved.via_fallback);
        assert_eq!(factory.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fallback_used_on_miss() {
        let factory = counting();
        let resolved = TypeResolver::new(&factory)
            .resolve("XYZ", "2.5", Some("ST"))
            .expect("lookup")
            .expect("found");
        assert_eq!(resolved.descriptor.code(), "ST");
        assert!(resolved.via_fallback);
        assert_eq!(factory.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_no_fallback_or_empty_fallback() {
        let factory = counting();
        let resolver = TypeResolver::new(&factory);
        assert!(resolver.resolve("XYZ", "2.5", None).expect("lookup").is_none());
        assert!(resolver.resolve("XYZ", "2.5", Some("")).expect("lookup").is_none());
        assert_eq!(factory.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unresolvable_fallback() {
        let factory = counting();
        let found = TypeResolver::new(&factory)
            .resolve("XYZ", "2.1", Some("CWE"))
            .expect("lookup");
        assert!(found.is_none());
    }
}
