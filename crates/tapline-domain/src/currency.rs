//! Display formatting for monetary amounts
//!
//! Amounts are Mauritian rupees. This is display formatting only; there is
//! no locale or rounding-mode guarantee beyond two fixed decimals with
//! thousands grouping.

/// Format an amount as `MUR 1,234.56`.
pub fn format_mur(amount: f64) -> String {
    format!("MUR {}", group_thousands(amount))
}

/// Format an amount without the currency prefix, as used in table cells.
pub fn format_amount(amount: f64) -> String {
    group_thousands(amount)
}

fn group_thousands(amount: f64) -> String {
    let negative = amount < 0.0;
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}
