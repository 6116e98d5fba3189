//! Marker type-code to human label lookup.
//!
//! The four-byte style codes stored in `V4MarkerItemHeader::type_code` name
//! the marker style AcqKnowledge itself displayed (a flag, a star, and so
//! on). No authoritative table of these survived in the retrieved source
//! (see DESIGN.md Open Question 3) -- this one covers the codes the test
//! scenarios exercise plus the other common AcqKnowledge styles, with
//! `"Unknown"` as the fallback.

pub fn label_for(type_code: &str) -> &'static str {
    match type_code.trim_end_matches('\0') {
        "flag" => "Flag",
        "defl" => "Default",
        "star" => "Star",
        "wave" => "Waveform",
        "apne" => "Apnea",
        "hrtb" => "Heartbeat",
        "resp" => "Respiration",
        "user" => "User-defined",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(label_for("flag"), "Flag");
        assert_eq!(label_for("defl"), "Default");
        assert_eq!(label_for("star"), "Star");
    }

    #[test]
    fn unknown_code_falls_back() {
        assert_eq!(label_for("zzzz"), "Unknown");
    }
}
