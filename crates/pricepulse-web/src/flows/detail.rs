use futures::future::join;
use pricepulse_catalog::CatalogClient;
use pricepulse_core::{Product, Recommendation};

/// Settled outcome of a product detail load.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailState {
    /// `None` renders the not-found message.
    pub product: Option<Product>,
    pub recommendations: Vec<Recommendation>,
    /// The recommendation request failed (as opposed to returning none).
    pub recommendations_failed: bool,
}

/// Resolves a product and its recommendations.
///
/// A carried payload is used as-is and suppresses the product request;
/// otherwise `GET /product/{id}` is issued. `GET /recommend/{id}` is always
/// issued. Both requests run concurrently and this returns only once both
/// have settled; a failure of one never prevents the other from completing.
///
/// Dropping the returned future (the client went away) drops both requests,
/// so a late response never reaches a discarded view.
pub async fn load_product(
    catalog: &CatalogClient,
    id: i64,
    carried: Option<Product>,
) -> DetailState {
    let product = async {
        if let Some(product) = carried {
            return Some(product);
        }
        match catalog.product(id).await {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(error = %e, product_id = id, "product lookup failed");
                None
            }
        }
    };

    let recommendations = async {
        catalog.recommendations(id).await.map_err(|e| {
            tracing::warn!(error = %e, product_id = id, "recommendation lookup failed");
        })
    };

    let (product, recommendations) = join(product, recommendations).await;
    let recommendations_failed = recommendations.is_err();

    DetailState {
        product,
        recommendations: recommendations.unwrap_or_default(),
        recommendations_failed,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn catalog(server: &MockServer) -> CatalogClient {
        CatalogClient::new(&server.uri(), 5, "pricepulse-test/0.1", 0, 0).expect("client")
    }

    fn product_json(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "all_prices": [
                { "store_name": "A", "price": 100, "url": "https://a.example" },
                { "store_name": "B", "price": 150, "url": "https://b.example" }
            ]
        })
    }

    fn rec_json(id: i64, name: &str) -> serde_json::Value {
        let mut rec = product_json(id, name);
        rec["price"] = json!(95);
        rec["recommendation_reasons"] = json!("Cheaper option|Same brand");
        rec
    }

    async fn mount(server: &MockServer, route: &str, template: ResponseTemplate, times: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .expect(times)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn uncarried_product_fetches_both() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/product/42",
            ResponseTemplate::new(200).set_body_json(product_json(42, "Milk Pak")),
            1,
        )
        .await;
        mount(
            &server,
            "/recommend/42",
            ResponseTemplate::new(200).set_body_json(json!([rec_json(7, "Olpers")])),
            1,
        )
        .await;

        let state = load_product(&catalog(&server), 42, None).await;

        assert_eq!(state.product.map(|p| p.name), Some("Milk Pak".to_owned()));
        assert_eq!(state.recommendations.len(), 1);
        assert!(!state.recommendations_failed);
    }

    #[tokio::test]
    async fn carried_product_skips_product_fetch() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/product/42",
            ResponseTemplate::new(200).set_body_json(product_json(42, "Fetched")),
            0,
        )
        .await;
        mount(
            &server,
            "/recommend/42",
            ResponseTemplate::new(200).set_body_json(json!([])),
            1,
        )
        .await;

        let carried: Product = serde_json::from_value(product_json(42, "Carried")).unwrap();
        let state = load_product(&catalog(&server), 42, Some(carried.clone())).await;

        assert_eq!(state.product, Some(carried));
        assert!(state.recommendations.is_empty());
    }

    #[tokio::test]
    async fn both_failures_settle_without_product() {
        let server = MockServer::start().await;
        mount(&server, "/product/42", ResponseTemplate::new(500), 1).await;
        mount(&server, "/recommend/42", ResponseTemplate::new(500), 1).await;

        let state = load_product(&catalog(&server), 42, None).await;

        assert!(state.product.is_none());
        assert!(state.recommendations.is_empty());
        assert!(state.recommendations_failed);
    }

    #[tokio::test]
    async fn recommendation_failure_does_not_block_product() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/product/42",
            ResponseTemplate::new(200).set_body_json(product_json(42, "Milk Pak")),
            1,
        )
        .await;
        mount(&server, "/recommend/42", ResponseTemplate::new(404), 1).await;

        let state = load_product(&catalog(&server), 42, None).await;

        assert!(state.product.is_some());
        assert!(state.recommendations_failed);
    }
}
