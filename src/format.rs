use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

// ---------------------------------------------------------------------------
// Brazilian display formats
// ---------------------------------------------------------------------------

/// Shown in place of an empty city or product name.
pub const EMPTY_LABEL: &str = "(vazio)";

/// Format an amount as Brazilian reais: `R$ 1.234,56`.
///
/// Two decimals (half away from zero), "." between thousands, "," before
/// the cents.
pub fn brl(value: Decimal) -> String {
    let mut rounded = value
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    let fixed = rounded.to_string();
    let (int_part, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let sign = if value.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("R$ {sign}{},{cents}", group_thousands(int_part))
}

/// [`brl`] for plot coordinates, which arrive as `f64`.
pub fn brl_f64(value: f64) -> String {
    Decimal::from_f64(value).map(brl).unwrap_or_default()
}

/// Insert "." every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `dd/mm/yyyy`, as shown in the period header.
pub fn date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// City or product name as displayed in lists, tables and charts.
pub fn display_label(label: &str) -> &str {
    if label.is_empty() {
        EMPTY_LABEL
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn formats_reais() {
        assert_eq!(brl(money("1234.56")), "R$ 1.234,56");
        assert_eq!(brl(Decimal::ZERO), "R$ 0,00");
        assert_eq!(brl(money("5")), "R$ 5,00");
        assert_eq!(brl(money("999.999")), "R$ 1.000,00");
        assert_eq!(brl(money("1234567.891")), "R$ 1.234.567,89");
        assert_eq!(brl(money("100000")), "R$ 100.000,00");
        assert_eq!(brl(money("0.005")), "R$ 0,01");
    }

    #[test]
    fn formats_negative_reais() {
        assert_eq!(brl(money("-1234.5")), "R$ -1.234,50");
        assert_eq!(brl(money("-0.001")), "R$ 0,00");
    }

    #[test]
    fn average_of_example_scenario() {
        assert_eq!(brl(Decimal::from(25) / Decimal::from(3)), "R$ 8,33");
    }

    #[test]
    fn plot_values_use_the_same_format() {
        assert_eq!(brl_f64(1500.0), "R$ 1.500,00");
        assert_eq!(brl_f64(f64::NAN), "");
    }

    #[test]
    fn formats_dates_day_first() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(date_br(d), "05/01/2024");
    }

    #[test]
    fn empty_labels_get_a_placeholder() {
        assert_eq!(display_label(""), "(vazio)");
        assert_eq!(display_label("SP"), "SP");
    }
}
