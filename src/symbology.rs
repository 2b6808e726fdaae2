//! EAN-13 module patterns.
//!
//! A symbol is 95 modules wide: start guard, six left-hand digits, centre
//! guard, six right-hand digits, end guard. Encoding is delegated to
//! `barcoders`; this module only turns its output into bar runs.

use barcoders::sym::ean13::EAN13;

use crate::barcode::Gtin;
use crate::error::{Error, Result};

pub const MODULES: usize = 95;

/// Dark (`true`) / light module sequence for a GTIN, without quiet zones.
pub fn encode(gtin: &Gtin) -> Result<[bool; MODULES]> {
    // the encoder takes the 12-digit payload and appends its own check digit
    let symbol = EAN13::new(gtin.payload().to_string()).map_err(|e| Error::Render(format!("{gtin}: {e}")))?;
    let encoded = symbol.encode();
    if encoded.len() != MODULES {
        return Err(Error::Render(format!(
            "{gtin}: encoder returned {} modules, expected {MODULES}",
            encoded.len()
        )));
    }

    let mut modules = [false; MODULES];
    for (m, &bit) in modules.iter_mut().zip(&encoded) {
        *m = bit == 1;
    }
    Ok(modules)
}

/// Runs of consecutive dark modules as `(start_module, width_in_modules)`.
pub fn bar_runs(modules: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &dark) in modules.iter().enumerate() {
        match (dark, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, modules.len() - s));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::normalize;

    fn as_string(modules: &[bool]) -> String {
        modules.iter().map(|&m| if m { '1' } else { '0' }).collect()
    }

    #[test]
    fn encodes_guards_and_length() {
        let m = encode(&normalize("400638133393").unwrap()).unwrap();
        let s = as_string(&m);
        assert_eq!(s.len(), MODULES);
        assert!(s.starts_with("101"));
        assert!(s.ends_with("101"));
        assert_eq!(&s[45..50], "01010");
    }

    #[test]
    fn encodes_known_symbol() {
        // 5901234123457: first digit 5 -> LGGLLG
        let m = encode(&normalize("590123412345").unwrap()).unwrap();
        let expected = concat!(
            "101",
            "0001011", "0100111", "0110011", "0010011", "0111101", "0011101",
            "01010",
            "1100110", "1101100", "1000010", "1011100", "1001110", "1000100",
            "101",
        );
        assert_eq!(as_string(&m), expected);
    }

    #[test]
    fn symbol_has_thirty_bars() {
        let m = encode(&normalize("8684771191031").unwrap()).unwrap();
        // three guards of two bars plus two bars per digit
        assert_eq!(bar_runs(&m).len(), 30);
    }

    #[test]
    fn bar_runs_merges_dark_modules() {
        let m = [true, true, false, true, false, false, true];
        assert_eq!(bar_runs(&m), vec![(0, 2), (3, 1), (6, 1)]);
        assert!(bar_runs(&[false, false]).is_empty());
    }
}
