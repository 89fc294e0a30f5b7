use chrono::NaiveDate;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Prefixes a symbol and renders two decimals with thousands separators,
/// e.g. `-$1,234.50`.
#[derive(Debug, Clone)]
pub struct SymbolFormatter {
    symbol: String,
}

impl SymbolFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl Default for SymbolFormatter {
    fn default() -> Self {
        Self::new("$")
    }
}

impl CurrencyFormatter for SymbolFormatter {
    fn format_amount(&self, amount: f64) -> String {
        let cents = (amount.abs() * 100.0).round() as u64;
        let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
        format!(
            "{sign}{}{}.{:02}",
            self.symbol,
            group_thousands(cents / 100),
            cents % 100
        )
    }
}

/// One decimal place, as shown next to category totals.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_separators_and_sign() {
        let fmt = SymbolFormatter::default();
        assert_eq!(fmt.format_amount(0.0), "$0.00");
        assert_eq!(fmt.format_amount(2800.0), "$2,800.00");
        assert_eq!(fmt.format_amount(1234567.891), "$1,234,567.89");
        assert_eq!(fmt.format_amount(-50.5), "-$50.50");
        assert_eq!(fmt.format_amount(-0.001), "$0.00");
    }

    #[test]
    fn custom_symbol_and_percent() {
        assert_eq!(SymbolFormatter::new("€").format_amount(999.999), "€1,000.00");
        assert_eq!(format_percent(93.3333), "93.3%");
    }
}
