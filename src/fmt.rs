/// Format a float as pounds with thousands separators: £1,234.56
pub fn money(val: f64) -> String {
    let pence = format!("{:.2}", val.abs());
    let (whole, fraction) = pence.split_once('.').unwrap_or((pence.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    // "-£0.00" is never useful
    let sign = if val < 0.0 && pence != "0.00" { "-" } else { "" };
    format!("{sign}£{grouped}.{fraction}")
}

/// Blank for zero, as summary tables leave empty cells rather than £0.00.
pub fn money_or_blank(val: f64) -> String {
    if val.abs() < 0.005 {
        String::new()
    } else {
        money(val)
    }
}

/// `2024-03` -> `March 2024`. Keys that do not parse are returned as-is.
pub fn month_label(month_key: &str) -> String {
    chrono::NaiveDate::parse_from_str(&format!("{month_key}-01"), "%Y-%m-%d")
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|_| month_key.to_string())
}
