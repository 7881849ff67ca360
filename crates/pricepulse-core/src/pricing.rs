//! Display values derived from a product's store prices.
//!
//! Nothing here mutates a [`StorePrice`] list; every function borrows the
//! catalog snapshot and recomputes on each render.

use rust_decimal::Decimal;

use crate::products::StorePrice;

/// Number of store prices shown inline on a search result card.
pub const INLINE_PRICE_LIMIT: usize = 3;

/// Spread between the most and least expensive store.
///
/// Returns `None` unless at least two prices are known.
#[must_use]
pub fn savings(prices: &[StorePrice]) -> Option<Decimal> {
    if prices.len() < 2 {
        return None;
    }
    let max = prices.iter().map(|p| p.price).max()?;
    let min = prices.iter().map(|p| p.price).min()?;
    Some(max - min)
}

/// One row of the detail view's store comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonRow<'a> {
    pub price: &'a StorePrice,
    /// Set on the cheapest row only.
    pub best_value: bool,
}

/// Prices sorted ascending, cheapest flagged as best value.
///
/// The sort is stable, so stores with equal prices keep catalog order.
#[must_use]
pub fn price_comparison(prices: &[StorePrice]) -> Vec<ComparisonRow<'_>> {
    let mut sorted: Vec<&StorePrice> = prices.iter().collect();
    sorted.sort_by(|a, b| a.price.cmp(&b.price));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, price)| ComparisonRow {
            price,
            best_value: i == 0,
        })
        .collect()
}

/// The truncated price list shown on a search result card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlinePreview<'a> {
    /// Up to [`INLINE_PRICE_LIMIT`] entries, in catalog order.
    pub rows: &'a [StorePrice],
    /// Stores left out of `rows`.
    pub remaining: usize,
}

/// First [`INLINE_PRICE_LIMIT`] prices as the catalog ordered them.
///
/// The catalog ranks prices before sending them; this does not re-sort.
#[must_use]
pub fn inline_preview(prices: &[StorePrice]) -> InlinePreview<'_> {
    let shown = prices.len().min(INLINE_PRICE_LIMIT);
    InlinePreview {
        rows: &prices[..shown],
        remaining: prices.len() - shown,
    }
}

/// Formats an amount with thousands separators and at most two decimals,
/// e.g. `1234.50` becomes `"1,234.5"`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let text = amount.round_dp(2).normalize().to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
