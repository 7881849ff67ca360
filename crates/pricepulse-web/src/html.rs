use pricepulse_core::format_amount;
use rust_decimal::Decimal;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Price label in Pakistani rupees, e.g. `Rs. 1,250`.
pub fn rupees(amount: Decimal) -> String {
    format!("Rs. {}", format_amount(amount))
}
