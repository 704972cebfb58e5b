// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-evolution corrections for discriminator codes.

/// Versions that predate the `DTM` (date/time with zone) data type.
pub const DTM_LEGACY_VERSIONS: [&str; 6] = ["2.1", "2.2", "2.3", "2.3.1", "2.4", "2.5"];

/// Map a raw type code to the code that is valid at `version`.
///
/// Senders routinely emit `DTM` against versions where only `DT` exists;
/// those are rewritten. Every other code is returned unchanged.
pub fn effective_code<'a>(raw_code: &'a str, version: &str) -> &'a str {
    if raw_code == "DTM" && DTM_LEGACY_VERSIONS.contains(&version) {
        "DT"
    } else {
        raw_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtm_downgraded_for_legacy_versions() {
        for version in DTM_LEGACY_VERSIONS {
            assert_eq!(effective_code("DTM", version), "DT", "version {}", version);
        }
    }

    #[test]
    fn test_dtm_kept_for_newer_versions() {
        for version in ["2.5.1", "2.6", "2.7", "2.7.1", "2.8", "3.0", ""] {
            assert_eq!(effective_code("DTM", version), "DTM", "version {}", version);
        }
    }

    #[test]
    fn test_other_codes_untouched() {
        let codes = ["ST", "DT", "NM", "CE", "TS", "dtm", "DTM ", "CWE"];
        for _ in 0..64 {
            let code = codes[fastrand::usize(..codes.len())];
            let version = DTM_LEGACY_VERSIONS[fastrand::usize(..DTM_LEGACY_VERSIONS.len())];
            assert_eq!(effective_code(code, version), code);
        }
    }
}
