use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Shown on cards when the catalog has no usable image for a product.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/400x400?text=PricePulse";

/// Shown on cards when the catalog has no brand for a product.
pub const UNBRANDED_LABEL: &str = "Local Brand";

/// A grocery product as returned by the Catalog Service, grouped across
/// retailers.
///
/// Values are immutable snapshots of one catalog response. Everything shown
/// on screen beyond these fields (savings, sort order) is derived on render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// One entry per retailer stocking the product. The catalog sends
    /// `null` when no price is known; that is read as an empty list.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub all_prices: Vec<StorePrice>,
}

impl Product {
    /// Brand for display, falling back to [`UNBRANDED_LABEL`].
    #[must_use]
    pub fn brand_label(&self) -> &str {
        self.brand
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(UNBRANDED_LABEL)
    }

    /// Image URL for display, falling back to [`PLACEHOLDER_IMAGE_URL`] when
    /// the reference is missing or blank.
    #[must_use]
    pub fn image_or_placeholder(&self) -> &str {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE_URL)
    }

    /// Pack size such as `"1 L"` or `"500 g"`. Whole quantities drop the
    /// fractional part.
    #[must_use]
    pub fn size_label(&self) -> Option<String> {
        let quantity = self.quantity.map(|q| {
            if q.fract().abs() < f64::EPSILON {
                format!("{q:.0}")
            } else {
                q.to_string()
            }
        });
        let unit = self
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        match (quantity, unit) {
            (Some(q), Some(u)) => Some(format!("{q} {u}")),
            (Some(q), None) => Some(q),
            (None, Some(u)) => Some(u.to_owned()),
            (None, None) => None,
        }
    }
}

/// One retailer's price for a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePrice {
    pub store_name: String,
    pub price: Decimal,
    /// Product page on the retailer's site.
    pub url: String,
}

/// A product suggested by the catalog's recommender for some other product.
///
/// The catalog sends the reasons as one `|`-delimited string; it is split
/// here, once, so views only ever see the ordered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub product: Product,
    /// Flat price of the recommended listing (not a per-store list).
    pub price: Decimal,
    #[serde(
        rename = "recommendation_reasons",
        default,
        deserialize_with = "split_reasons",
        serialize_with = "join_reasons"
    )]
    pub reasons: Vec<String>,
}

impl Recommendation {
    /// The reason surfaced on the recommendation card.
    #[must_use]
    pub fn headline_reason(&self) -> Option<&str> {
        self.reasons.first().map(String::as_str)
    }
}

/// Splits a `|`-delimited reasons string into trimmed, non-empty segments.
#[must_use]
pub fn parse_reasons(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn split_reasons<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(parse_reasons).unwrap_or_default())
}

fn join_reasons<S>(reasons: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&reasons.join("|"))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
