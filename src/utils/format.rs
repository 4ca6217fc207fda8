//! Display helpers shared by the recommendation text and the CLI.

/// Rupee amount rounded to whole units with Indian digit grouping,
/// e.g. `150000.4` -> `"₹1,50,000"`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{}₹{}", sign, group_indian(&digits))
}

/// Last three digits form one group, everything above is grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// `12.34` -> `"+12.3%"`, `-4.0` -> `"-4.0%"`.
pub fn format_signed_pct(pct: f64) -> String {
    let sign = if pct >= 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, pct)
}
