//! Display helpers for report consumers: USD amounts and signed percentages.

/// `1234.5` → `"$1,234.50"`, `-20.0` → `"-$20.00"`.
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${amount}");
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${dollars}.{:02}", cents % 100)
}

/// `21.0` → `"+21.00%"`, `-50.0` → `"-50.00%"`, `0.0` → `"+0.00%"`.
pub fn format_signed_pct(pct: f64) -> String {
    let rounded = (pct * 100.0).round() / 100.0;
    // Avoid "-0.00%" for tiny negatives.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:+.2}%")
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}
