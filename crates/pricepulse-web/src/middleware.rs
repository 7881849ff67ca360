use axum::{
    extract::Request,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Cookie carrying the session id. Set without `Max-Age`, so the browser
/// drops it when the session ends.
pub const SESSION_COOKIE: &str = "pp_session";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Session id from the `pp_session` cookie, stored as a request extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Axum middleware that resolves the browser session.
///
/// A valid `pp_session` cookie is reused; otherwise a new random id is
/// issued and set on the response. Either way the id is inserted into
/// request extensions as [`SessionId`].
pub async fn session_cookie(mut req: Request, next: Next) -> Response {
    let existing = session_from_headers(req.headers());
    let id = existing.unwrap_or_else(|| SessionId(Uuid::new_v4()));

    req.extensions_mut().insert(id);

    let mut res = next.run(req).await;

    if existing.is_none() {
        let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", id.0);
        if let Ok(val) = HeaderValue::from_str(&cookie) {
            res.headers_mut().append(SET_COOKIE, val);
        }
    }

    res
}

fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|header| cookie_value(header, SESSION_COOKIE))
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .map(SessionId)
}

fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
