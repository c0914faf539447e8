// src/analytics/format.rs

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;

use crate::{analytics::period::month_abbrev, middleware::i18n::Language};

/// "S/ 1,234.50": duas casas, separador de milhar com vírgula.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp(2);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{} {}{}.{}", symbol, sign, grouped, frac_part)
}

/// "10-Ene-2024" (DD-Mon-YYYY).
pub fn format_date(date: NaiveDateTime, lang: Language) -> String {
    format!("{:02}-{}-{}", date.day(), month_abbrev(date.month(), lang), date.year())
}
