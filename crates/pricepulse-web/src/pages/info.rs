use axum::{extract::State, response::Html};
use pricepulse_core::StoresFile;

use crate::html::escape;
use crate::shell::{Page, Route};

use super::AppState;

const INSIGHTS: [(&str, &str); 3] = [
    (
        "Fuzzy Grouping",
        "Our algorithm intelligently identifies the same product even if different stores use different names or spellings.",
    ),
    (
        "Best Value Ranking",
        "We don't just show prices; we rank them based on unit costs to ensure you truly get the most for your money.",
    ),
    (
        "Real-time Pulse",
        "Our scrapers work around the clock to ensure the pulse you see reflects the exact shelf price right now.",
    ),
];

pub(super) async fn stores(State(state): State<AppState>) -> Html<String> {
    Page::new(Route::Stores, None, render_stores(&state.stores)).render()
}

pub(super) async fn insights() -> Html<String> {
    Page::new(Route::Insights, None, render_insights()).render()
}

pub(super) async fn contact() -> Html<String> {
    Page::new(Route::Contact, None, render_contact()).render()
}

fn render_stores(directory: &StoresFile) -> String {
    let cards: String = directory
        .stores
        .iter()
        .map(|store| {
            format!(
                "<div class=\"store-card\">\n\
                 <div class=\"store-logo-placeholder\" style=\"color: {color}\">&#x1F3EA;</div>\n\
                 <h2>{name}</h2>\n<p>{description}</p>\n\
                 <div class=\"store-tags\"><span>4,000+ Items</span><span>Live Data</span></div>\n\
                 </div>\n",
                color = escape(&store.color),
                name = escape(&store.name),
                description = escape(&store.description),
            )
        })
        .collect();

    format!(
        "<div class=\"container page\">\n<div class=\"page-heading\">\n\
         <h1>Our Partner <span>Stores</span></h1>\n\
         <p>We track {count} of Pakistan's biggest retailers to find you the best deals.</p>\n\
         </div>\n<div class=\"store-grid\">\n{cards}</div>\n</div>\n",
        count = directory.stores.len(),
    )
}

fn render_insights() -> String {
    let cards: String = INSIGHTS
        .iter()
        .map(|(title, text)| {
            format!("<div class=\"insight-card\">\n<h3>{title}</h3>\n<p>{text}</p>\n</div>\n")
        })
        .collect();

    format!(
        "<div class=\"container page\">\n<div class=\"page-heading\">\n\
         <h1>Smart <span>Insights</span></h1>\n\
         <p>How we help you save thousands on every grocery run.</p>\n\
         </div>\n<div class=\"insight-grid\">\n{cards}</div>\n</div>\n"
    )
}

// The form posts nowhere; the button is inert.
fn render_contact() -> String {
    "<div class=\"container page contact-page\">\n<div class=\"contact-card\">\n\
     <h1>Get in <span>Touch</span></h1>\n\
     <p>Have a suggestion or want to list your store? Drop us a line!</p>\n\
     <form class=\"contact-form\" onsubmit=\"return false;\">\n\
     <label>Name<input type=\"text\" name=\"name\" placeholder=\"Your Name\"></label>\n\
     <label>Email<input type=\"email\" name=\"email\" placeholder=\"hello@pulse.pk\"></label>\n\
     <label>Message<textarea name=\"message\" rows=\"4\" placeholder=\"Type your pulse...\"></textarea></label>\n\
     <button type=\"button\" class=\"search-btn\">Send Message</button>\n\
     </form>\n</div>\n</div>\n"
        .to_owned()
}
