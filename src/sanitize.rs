//! Turn free-form product labels into file stems.

use crate::barcode::Gtin;
use crate::consts::MAX_FILENAME_CHARS;

const FORBIDDEN: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make a label safe to use as a file name.
///
/// Forbidden path characters become `_`, surrounding whitespace is
/// trimmed, inner spaces become `_`, and the result is cut to 150
/// characters.
pub fn sanitize(label: &str) -> String {
    let replaced: String = label
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    replaced
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .take(MAX_FILENAME_CHARS)
        .collect()
}

/// File stem for a row: the sanitized label, or the GTIN when the label
/// is empty or sanitizes to nothing.
pub fn artifact_stem(label: &str, gtin: &Gtin) -> String {
    let stem = sanitize(label);
    if stem.is_empty() {
        gtin.to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::normalize;

    #[test]
    fn replaces_forbidden_characters() {
        assert_eq!(sanitize(r#"a/b\c:d*e?f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn trims_then_replaces_spaces() {
        assert_eq!(sanitize("  Pistachio Paste 200g \t"), "Pistachio_Paste_200g");
    }

    #[test]
    fn forbidden_characters_at_edges_survive_trim() {
        // replacement happens before trimming, as in "?name " -> "_name"
        assert_eq!(sanitize("?name "), "_name");
    }

    #[test]
    fn truncates_to_limit() {
        let long = "x".repeat(300);
        assert_eq!(sanitize(&long).chars().count(), 150);
        let multibyte = "ü".repeat(200);
        assert_eq!(sanitize(&multibyte).chars().count(), 150);
    }

    #[test]
    fn never_emits_forbidden_characters() {
        let samples = ["", "   ", "a|b", "<<<>>>", "C:\\temp\\x.png", "\"quoted\" / path", "ok"];
        for s in samples {
            let out = sanitize(s);
            assert!(!out.contains(&FORBIDDEN[..]), "{s:?} -> {out:?}");
            assert!(!out.contains(' '));
        }
    }

    #[test]
    fn empty_label_falls_back_to_gtin() {
        let gtin = normalize("400638133393").unwrap();
        assert_eq!(artifact_stem("", &gtin), "4006381333931");
        assert_eq!(artifact_stem("   ", &gtin), "4006381333931");
        assert_eq!(artifact_stem("Widget", &gtin), "Widget");
    }
}
