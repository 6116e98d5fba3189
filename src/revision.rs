//! Named AcqKnowledge file-format revisions.
//!
//! These are not software release numbers; they're the values stored in a
//! file's version field, used throughout the header schema to decide which
//! fields a given file actually contains.

pub const V_ALL: i32 = 0;
pub const V_20A: i32 = 30;
pub const V_20B: i32 = 31;
pub const V_20R: i32 = 32;
pub const V_207: i32 = 33;
pub const V_30R: i32 = 34;
pub const V_303: i32 = 35;
pub const V_35X: i32 = 36;
pub const V_36X: i32 = 37;
pub const V_370: i32 = 38;
pub const V_373: i32 = 39;
pub const V_381: i32 = 41;
pub const V_37P: i32 = 42;
pub const V_382: i32 = 43;
pub const V_38P: i32 = 44;
pub const V_390: i32 = 45;
pub const V_400B: i32 = 61;
pub const V_400: i32 = 68;
pub const V_401: i32 = 76;
pub const V_402: i32 = 78;
pub const V_41A: i32 = 80;
pub const V_410: i32 = 83;
pub const V_411: i32 = 84;
pub const V_420: i32 = 108;
pub const V_42X: i32 = 121;
pub const V_430: i32 = 124;
pub const V_440: i32 = 128;
pub const V_501: i32 = 132;

const NAMED: &[(i32, &str)] = &[
    (V_ALL, "all"),
    (V_20A, "2.0a"),
    (V_20B, "2.0b"),
    (V_20R, "2.0r"),
    (V_207, "2.0.7"),
    (V_30R, "3.0r"),
    (V_303, "3.0.3"),
    (V_35X, "3.5x"),
    (V_36X, "3.6x"),
    (V_370, "3.7.0"),
    (V_373, "3.7.3"),
    (V_381, "3.8.1"),
    (V_37P, "3.7+"),
    (V_382, "3.8.2"),
    (V_38P, "3.8+"),
    (V_390, "3.9.0"),
    (V_400B, "4.0 beta"),
    (V_400, "4.0"),
    (V_401, "4.0.1"),
    (V_402, "4.0.2"),
    (V_41A, "4.1 alpha"),
    (V_410, "4.1.0"),
    (V_411, "4.1.1"),
    (V_420, "4.2.0"),
    (V_42X, "4.2.x"),
    (V_430, "4.3.0"),
    (V_440, "4.4.0"),
    (V_501, "5.0.1"),
];

/// Whether `revision` belongs to the "post-4" header family for a given
/// family threshold. Header families disagree on exactly where this split
/// falls (see DESIGN.md Open Question 2), so callers pass the threshold
/// that applies to the header they're reading rather than relying on one
/// shared constant.
pub fn is_post4(revision: i32, threshold: i32) -> bool {
    revision >= threshold
}

/// Best-effort human label for a revision. Never fails: an unknown revision
/// still resolves to a label, so decoding can proceed using the nearest
/// lower known revision's schema selection (§4.A).
pub fn version_string_guess(revision: i32) -> String {
    if let Some((_, name)) = NAMED.iter().find(|(v, _)| *v == revision) {
        return name.to_string();
    }
    if revision < NAMED[0].0 {
        return "unknown early version".to_string();
    }
    let last = NAMED.last().unwrap();
    if revision > last.0 {
        return format!("after {}", last.1);
    }
    for window in NAMED.windows(2) {
        let (lo, hi) = (window[0], window[1]);
        if revision > lo.0 && revision < hi.0 {
            return format!("between {} and {}", lo.1, hi.1);
        }
    }
    format!("revision {}", revision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert_eq!(version_string_guess(V_400), "4.0");
    }

    #[test]
    fn between_two_known() {
        let s = version_string_guess(V_400 + 1);
        assert!(s.starts_with("between"));
    }

    #[test]
    fn below_everything() {
        assert_eq!(version_string_guess(-5), "unknown early version");
    }

    #[test]
    fn above_everything() {
        assert!(version_string_guess(V_501 + 1).starts_with("after"));
    }

    #[test]
    fn post4_threshold_is_per_family() {
        assert!(!is_post4(V_390, V_400B));
        assert!(is_post4(V_400B, V_400B));
        assert!(!is_post4(V_390, V_390 + 1));
    }
}
