use colored::{ColoredString, Colorize};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Columns whose numeric cells are shaded by sign.
const HIGHLIGHT_COLUMNS: [&str; 9] = [
    "PnL ($)",
    "PnL (%)",
    "R-Multiple",
    "pnl_currency",
    "pnl_percent",
    "r_multiple",
    "pnl",
    "cumulative_pnl",
    "total_pnl",
];

/// Display hint for a signed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Gain,
    /// Anything not strictly positive, breakeven included
    Loss,
}

pub fn tone(value: Decimal) -> Tone {
    if value > Decimal::ZERO {
        Tone::Gain
    } else {
        Tone::Loss
    }
}

pub fn is_highlighted(column: &str) -> bool {
    HIGHLIGHT_COLUMNS.contains(&column)
}

pub fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Gain => text.black().on_truecolor(212, 237, 218),
        Tone::Loss => text.black().on_truecolor(248, 215, 218),
    }
}

/// Shade `text` when it is a number in a PnL-like column; anything else is
/// returned unchanged.
pub fn paint_cell(column: &str, text: &str) -> String {
    if !is_highlighted(column) {
        return text.to_string();
    }
    match Decimal::from_str(text.trim()) {
        Ok(value) => paint(text, tone(value)).to_string(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tone_is_strict() {
        assert_eq!(tone(dec!(0.01)), Tone::Gain);
        assert_eq!(tone(Decimal::ZERO), Tone::Loss);
        assert_eq!(tone(dec!(-3)), Tone::Loss);
    }

    #[test]
    fn test_plain_columns_pass_through() {
        assert_eq!(paint_cell("Pair", "BTC/USDT"), "BTC/USDT");
        assert_eq!(paint_cell("Entry Price", "100"), "100");
    }

    #[test]
    fn test_non_numeric_pnl_cell_passes_through() {
        assert_eq!(paint_cell("PnL ($)", "n/a"), "n/a");
    }

    #[test]
    fn test_highlighted_cell_keeps_text() {
        let painted = paint_cell("R-Multiple", "0.95");
        assert!(painted.contains("0.95"));
    }
}
