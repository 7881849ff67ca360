use axum::{
    extract::{Query, State},
    response::Html,
    Extension,
};
use pricepulse_core::{inline_preview, savings, Product};
use serde::Deserialize;

use crate::flows::search::{restore, submit_query, SearchPhase, SearchState};
use crate::html::{escape, rupees};
use crate::middleware::SessionId;
use crate::shell::{Page, Route};

use super::AppState;

/// Placeholder cards shown while a search is pending.
pub(super) const PLACEHOLDER_CARDS: usize = 6;

/// Seconds before a loading view re-checks the session.
const LOADING_REFRESH_SECS: u32 = 1;

#[derive(Debug, Deserialize)]
pub(super) struct HomeQuery {
    pub query: Option<String>,
}

/// `GET /` renders the session's search; `GET /?query=…` submits a new one
/// and renders the loading state.
pub(super) async fn home(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Query(params): Query<HomeQuery>,
) -> Html<String> {
    let cache = state.sessions.cache(session);
    let search = match params.query.as_deref() {
        Some(query) => submit_query(&state.catalog, &cache, query),
        None => restore(&cache),
    };

    // A loading view offers no cards, so the last grid's stay selectable.
    if search.phase != SearchPhase::Loading {
        cache.carry(&search.results);
    }

    let mut page = Page::new(Route::Home, None, render_home(&search));
    if search.phase == SearchPhase::Loading {
        page.refresh_home_after_secs = Some(LOADING_REFRESH_SECS);
    }
    page.render()
}

fn render_home(search: &SearchState) -> String {
    let mut out = format!(
        "<section class=\"hero-section\">\n<div class=\"container\">\n\
         <h1>Compare Grocery Prices <span>Instantly</span></h1>\n\
         <p>Find the pulse of 1,000+ products across Pakistan's top retailers in seconds.</p>\n\
         <form class=\"search-wrapper\" method=\"get\" action=\"/\">\n\
         <input type=\"text\" name=\"query\" placeholder=\"Search (e.g. Milk, Coke, Shampoo)...\" value=\"{query}\">\n\
         <button type=\"submit\" class=\"search-btn\">Compare</button>\n</form>\n\
         <div class=\"stats\">\
         <div class=\"stat-box\"><h3>6</h3><p>Stores</p></div>\
         <div class=\"stat-box\"><h3>47K+</h3><p>Products</p></div>\
         <div class=\"stat-box\"><h3>Live</h3><p>Pulse</p></div>\
         </div>\n</div>\n</section>\n<div class=\"container results\">\n",
        query = escape(&search.query),
    );

    if search.phase == SearchPhase::Failed {
        out.push_str(
            "<div class=\"notice\" role=\"status\">We couldn't reach the price catalog. \
             Showing your previous results; please try again.</div>\n",
        );
    }

    if search.phase == SearchPhase::Loading {
        out.push_str("<div class=\"results-grid\" aria-busy=\"true\">\n");
        for _ in 0..PLACEHOLDER_CARDS {
            out.push_str("<div class=\"product-card shimmer\"></div>\n");
        }
        out.push_str("</div>\n</div>\n");
        return out;
    }

    if !search.results.is_empty() {
        out.push_str(&format!(
            "<div class=\"results-header\"><h2>Pulse Results ({})</h2></div>\n",
            search.results.len()
        ));
    }

    out.push_str("<div class=\"results-grid\">\n");
    for product in &search.results {
        out.push_str(&product_card(product));
    }
    out.push_str("</div>\n</div>\n");
    out
}

fn product_card(product: &Product) -> String {
    let badge = savings(&product.all_prices)
        .map(|amount| format!("<div class=\"savings-badge\">Save {}</div>", rupees(amount)))
        .unwrap_or_default();

    let preview = inline_preview(&product.all_prices);
    let rows: String = preview
        .rows
        .iter()
        .enumerate()
        .map(|(i, price)| {
            let class = if i == 0 { "pulse-row cheapest" } else { "pulse-row" };
            format!(
                "<div class=\"{class}\"><span>{store}</span><span>{amount}</span></div>",
                store = escape(&price.store_name),
                amount = rupees(price.price),
            )
        })
        .collect();
    let more = if preview.remaining > 0 {
        format!(
            "<div class=\"more-stores\">+{} more stores...</div>",
            preview.remaining
        )
    } else {
        String::new()
    };

    format!(
        "<a class=\"product-card\" href=\"/product/{id}\">\n{badge}\
         <div class=\"product-image-box\"><img src=\"{image}\" alt=\"\"></div>\n\
         <div class=\"card-info\">\n<div class=\"brand-tag\">{brand}</div>\n\
         <div class=\"product-title\">{name}</div>\n\
         <div class=\"price-pulse\">{rows}{more}</div>\n</div>\n</a>\n",
        id = product.id,
        image = escape(product.image_or_placeholder()),
        brand = escape(product.brand_label()),
        name = escape(&product.name),
    )
}
