//! Number formatting for tables and interpretation text.

/// Two decimals with thousands separators: `1234.5` → `1,234.50`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0.00" reads as a loss that isn't there
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Dollar amount: `1234567.891` → `$1,234,567.89`.
pub fn format_currency(value: f64) -> String {
    let amount = format_amount(value);
    match amount.strip_prefix('-') {
        Some(abs) => format!("-${}", abs),
        None => format!("${}", amount),
    }
}
