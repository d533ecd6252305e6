use rust_decimal::Decimal;
use trade_journal_core::journal::metrics::PortfolioSummary;
use trade_journal_core::Currency;

/// One-line dashboard: net PnL, win rate, average R and trade count.
pub fn headline(summary: &PortfolioSummary, currency: &Currency) -> String {
    format!(
        "Net PnL {} | Win rate {}% | Avg R {}R | Trades {}",
        format_money(summary.total_pnl, currency.symbol()),
        format_fixed(summary.win_rate, 1),
        format_fixed(summary.average_r_multiple, 2),
        summary.record_count
    )
}

/// Two decimals with thousands separators, sign before the symbol.
pub fn format_money(value: Decimal, symbol: &str) -> String {
    let fixed = format_fixed(value.abs(), 2);
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value.round_dp(2) < Decimal::ZERO { "-" } else { "" };
    format!("{}{}{}.{}", sign, symbol, group_thousands(int_part), frac)
}

/// Round to `dp` places and pad with zeros so the width is stable.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let text = value.round_dp(dp).to_string();
    if dp == 0 {
        return text;
    }
    let (int_part, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    format!("{}.{:0<width$}", int_part, frac, width = dp as usize)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(1234.5), "$"), "$1,234.50");
        assert_eq!(format_money(dec!(-5), "$"), "-$5.00");
        assert_eq!(format_money(dec!(1234567.891), "€"), "€1,234,567.89");
        assert_eq!(format_money(dec!(999), "$"), "$999.00");
        assert_eq!(format_money(Decimal::ZERO, "$"), "$0.00");
    }

    #[test]
    fn test_format_fixed_pads() {
        assert_eq!(format_fixed(dec!(66.6666), 1), "66.7");
        assert_eq!(format_fixed(Decimal::ZERO, 1), "0.0");
        assert_eq!(format_fixed(dec!(0.9), 2), "0.90");
        assert_eq!(format_fixed(dec!(-1.005), 2), "-1.00");
    }
}
