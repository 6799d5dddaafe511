//! Currency formatting for every displayed amount.

/// Whole-unit currency formatter (en-AU, AUD by default)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    pub code: &'static str,
    pub symbol: &'static str,
    pub group_separator: char,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self {
            code: "AUD",
            symbol: "$",
            group_separator: ',',
        }
    }
}

impl CurrencyFormatter {
    /// Format with zero fraction digits, rounding half away from zero.
    ///
    /// NaN and infinite values format as zero, as does negative zero.
    pub fn format(&self, value: f64) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        let negative = value < 0.0;
        let whole = value.abs().round();

        // Shortest round-trip digits, not the exact binary expansion
        let digits = format!("{}", whole);
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.group_separator);
            }
            grouped.push(ch);
        }

        if negative {
            format!("-{}{}", self.symbol, grouped)
        } else {
            format!("{}{}", self.symbol, grouped)
        }
    }
}

/// Format with the default AUD formatter.
pub fn format_currency(value: f64) -> String {
    CurrencyFormatter::default().format(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1800.0), "$1,800");
        assert_eq!(format_currency(1234567.0), "$1,234,567");
        assert_eq!(format_currency(100000.0), "$100,000");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(format_currency(0.5), "$1");
        assert_eq!(format_currency(4400.000000000001), "$4,400");
        assert_eq!(format_currency(1499.49), "$1,499");
        assert_eq!(format_currency(-2500.5), "-$2,501");
    }

    #[test]
    fn test_non_numbers_format_as_zero() {
        assert_eq!(format_currency(f64::NAN), "$0");
        assert_eq!(format_currency(f64::INFINITY), "$0");
        assert_eq!(format_currency(-0.0), "$0");
    }

    #[test]
    fn test_large_values_use_shortest_digits() {
        assert_eq!(format_currency(1e21), "$1,000,000,000,000,000,000,000");
        assert_eq!(format_currency(1e300), format!("$1{}", ",000".repeat(100)));
        assert_eq!(format_currency(-1e300), format!("-$1{}", ",000".repeat(100)));
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_currency(-1234.0), "-$1,234");
    }
}
