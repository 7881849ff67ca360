//! Route table, per-route document titles, and the page layout every view
//! renders inside.
//!
//! Each navigation is a full page load, so the response always starts at
//! the top of the document and there is no outgoing view to animate out.
//! Scroll reset and transition sequencing need no code here.

use axum::response::Html;
use pricepulse_core::Product;

use crate::html::escape;

const SITE_NAME: &str = "PricePulse PK";

/// Every navigable view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// `/product/{id}`; the raw segment, which may not be numeric.
    Product(String),
    Stores,
    Insights,
    Contact,
    NotFound,
}

/// Computes a document title from the product carried into the view, if any.
pub type TitleResolver = fn(Option<&Product>) -> String;

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Route::Home,
            "/stores" => Route::Stores,
            "/insights" => Route::Insights,
            "/contact" => Route::Contact,
            _ => match path.strip_prefix("/product/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Route::Product(id.to_owned()),
                _ => Route::NotFound,
            },
        }
    }

    /// Title resolver for this route's pattern.
    pub fn title_resolver(&self) -> TitleResolver {
        match self {
            Route::Home => |_| format!("Compare Grocery Prices | {SITE_NAME}"),
            Route::Product(_) => |carried| {
                let name = carried.map_or("Product Detail", |p| p.name.as_str());
                format!("{name} | {SITE_NAME}")
            },
            Route::Stores => |_| format!("Our Partner Stores | {SITE_NAME}"),
            Route::Insights => |_| format!("Smart Grocery Insights | {SITE_NAME}"),
            Route::Contact => |_| format!("Contact Us | {SITE_NAME}"),
            Route::NotFound => |_| SITE_NAME.to_owned(),
        }
    }

    pub fn title(&self, carried: Option<&Product>) -> String {
        (self.title_resolver())(carried)
    }
}

/// A fully resolved view, ready to be wrapped in the layout.
pub struct Page {
    pub route: Route,
    pub title: String,
    pub body: String,
    /// Reload the home view after this many seconds.
    pub refresh_home_after_secs: Option<u32>,
}

impl Page {
    pub fn new(route: Route, carried: Option<&Product>, body: String) -> Self {
        let title = route.title(carried);
        Self {
            route,
            title,
            body,
            refresh_home_after_secs: None,
        }
    }

    pub fn render(&self) -> Html<String> {
        let refresh = self
            .refresh_home_after_secs
            .map(|secs| format!("<meta http-equiv=\"refresh\" content=\"{secs};url=/\">"))
            .unwrap_or_default();

        Html(format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             {refresh}<title>{title}</title>\n</head>\n<body>\n<div class=\"app-layout\">\n\
             {header}<main>\n{body}\n</main>\n{footer}</div>\n</body>\n</html>\n",
            title = escape(&self.title),
            header = navbar(&self.route),
            body = self.body,
            footer = footer(),
        ))
    }
}

fn navbar(active: &Route) -> String {
    let links = [
        ("/", "Home", Route::Home),
        ("/stores", "Stores", Route::Stores),
        ("/insights", "Insights", Route::Insights),
        ("/contact", "Contact", Route::Contact),
    ];
    let nav: String = links
        .iter()
        .map(|(href, label, route)| {
            let class = if route == active { " class=\"active\"" } else { "" };
            format!("<a href=\"{href}\"{class}>{label}</a>")
        })
        .collect();

    format!(
        "<header class=\"main-header\">\n<div class=\"container nav-content\">\n\
         <a href=\"/\" class=\"brand\"><span>{SITE_NAME}</span></a>\n\
         <nav class=\"nav-links\">{nav}</nav>\n\
         <div class=\"nav-actions\"><a class=\"search-btn\" href=\"/\">Compare Now</a></div>\n\
         </div>\n</header>\n"
    )
}

fn footer() -> String {
    format!(
        "<footer class=\"main-footer\">\n<div class=\"container\">\n\
         <div class=\"brand\"><span>{SITE_NAME}</span></div>\n\
         <p>Feel the Pulse of Grocery Prices Across Pakistan</p>\n\
         <div class=\"footer-nav\"><a href=\"/\">Explore</a><a href=\"/stores\">Retailers</a>\
         <a href=\"/insights\">How it Works</a><a href=\"/contact\">Support</a></div>\n\
         <div class=\"copyright\">&copy; 2026 PricePulse Pakistan. Built for the modern Pakistani shopper.</div>\n\
         </div>\n</footer>\n"
    )
}
