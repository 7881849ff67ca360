use axum::{
    extract::{Path, State},
    response::Html,
    Extension,
};
use pricepulse_core::{price_comparison, Product, Recommendation};

use crate::flows::detail::{load_product, DetailState};
use crate::html::{escape, rupees};
use crate::middleware::SessionId;
use crate::shell::{Page, Route};

use super::{not_found_body, AppState};

/// `GET /product/{id}`.
pub(super) async fn product(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(raw_id): Path<String>,
) -> Html<String> {
    let route = Route::Product(raw_id.clone());

    let Ok(id) = raw_id.parse::<i64>() else {
        tracing::debug!(raw_id, "non-numeric product id");
        return Page::new(route, None, not_found_body()).render();
    };

    let cache = state.sessions.cache(session);
    let carried = cache.carried(id);
    let page_title_source = carried.clone();

    let detail = load_product(&state.catalog, id, carried).await;

    cache.carry(detail.recommendations.iter().map(|rec| &rec.product));

    let body = match &detail.product {
        Some(product) => render_detail(product, &detail),
        None => not_found_body(),
    };
    Page::new(route, page_title_source.as_ref(), body).render()
}

fn render_detail(product: &Product, detail: &DetailState) -> String {
    let size = product
        .size_label()
        .map(|label| format!("<span class=\"size-tag\">{}</span>", escape(&label)))
        .unwrap_or_default();
    let category = product
        .category
        .as_deref()
        .map(|c| format!("<span class=\"category-tag\">{}</span>", escape(c)))
        .unwrap_or_default();
    let brand = product.brand.as_deref().unwrap_or_default();

    let rows: String = price_comparison(&product.all_prices)
        .iter()
        .map(|row| {
            let flag = if row.best_value {
                "<span class=\"best-value\">⭐ BEST VALUE</span>"
            } else {
                ""
            };
            let class = if row.best_value { "store-row best" } else { "store-row" };
            format!(
                "<div class=\"{class}\">\n<div class=\"store-info\">{flag}<h4>{store}</h4></div>\n\
                 <div class=\"store-price\">{amount}</div>\n\
                 <a class=\"visit-btn\" href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">Visit Store</a>\n</div>\n",
                store = escape(&row.price.store_name),
                amount = rupees(row.price.price),
                url = escape(&row.price.url),
            )
        })
        .collect();

    format!(
        "<div class=\"container detail-page\">\n\
         <a class=\"back-link\" href=\"/\">&larr; Back to Search</a>\n\
         <div class=\"detail-grid\">\n\
         <div class=\"detail-image\"><img src=\"{image}\" alt=\"{name}\"></div>\n\
         <div class=\"detail-info\">\n<div class=\"brand-tag\">{brand}</div>\n\
         <h1>{name}</h1>\n<div class=\"tags\">{category}{size}</div>\n\
         <h3>Price Comparison</h3>\n<div class=\"comparison-list\">\n{rows}</div>\n\
         </div>\n</div>\n{recommendations}</div>\n",
        image = escape(product.image_or_placeholder()),
        name = escape(&product.name),
        brand = escape(brand),
        recommendations = render_recommendations(detail),
    )
}

fn render_recommendations(detail: &DetailState) -> String {
    if detail.recommendations_failed {
        return "<section class=\"recommendations\">\n<h2>Smart Recommendations</h2>\n\
                <div class=\"notice\" role=\"status\">Recommendations are unavailable right now.</div>\n\
                </section>\n"
            .to_owned();
    }
    if detail.recommendations.is_empty() {
        return String::new();
    }

    let cards: String = detail.recommendations.iter().map(recommendation_card).collect();
    format!(
        "<section class=\"recommendations\">\n<h2>Smart Recommendations</h2>\n\
         <div class=\"results-grid\">\n{cards}</div>\n</section>\n"
    )
}

fn recommendation_card(rec: &Recommendation) -> String {
    let reason = rec
        .headline_reason()
        .map(|r| format!("<div class=\"rec-reason\">{}</div>", escape(r)))
        .unwrap_or_default();
    format!(
        "<a class=\"product-card rec-card\" href=\"/product/{id}\">\n{reason}\
         <div class=\"product-image-box\"><img src=\"{image}\" alt=\"\"></div>\n\
         <div class=\"card-info\">\n<div class=\"brand-tag\">{brand}</div>\n\
         <div class=\"product-title\">{name}</div>\n\
         <div class=\"rec-price\">{price}</div>\n</div>\n</a>\n",
        id = rec.product.id,
        image = escape(rec.product.image_or_placeholder()),
        brand = escape(rec.product.brand_label()),
        name = escape(&rec.product.name),
        price = rupees(rec.price),
    )
}
