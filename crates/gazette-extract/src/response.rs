//! Response builders.
//!
//! | Builder | Content-Type | Use |
//! |---------|--------------|-----|
//! | [`json`] | `application/json` | API payloads |
//! | [`html`] | `text/html` | rendered pages |
//! | [`redirect`] | N/A | 302 to another page |
//! | [`error`] | `application/json` | the uniform error envelope |

use bytes::Bytes;
use gazette_core::AppError;
use http::{header, Response, StatusCode};
use serde::Serialize;

use crate::cookie::SetCookie;

/// Builds a 200 JSON response.
///
/// # Panics
///
/// Panics if the value fails to serialize.
#[must_use]
pub fn json<T: Serialize>(data: &T) -> Response<Bytes> {
    json_with_status(StatusCode::OK, data)
}

/// Builds a JSON response with the given status.
///
/// # Panics
///
/// Panics if the value fails to serialize.
#[must_use]
pub fn json_with_status<T: Serialize>(status: StatusCode, data: &T) -> Response<Bytes> {
    let body = serde_json::to_vec(data).expect("JSON serialization failed");
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Bytes::from(body))
        .expect("failed to build response")
}

/// Builds the uniform JSON error response for an [`AppError`].
#[must_use]
pub fn error(err: &AppError) -> Response<Bytes> {
    json_with_status(err.status_code(), &err.body())
}

/// Builds a 200 HTML response.
#[must_use]
pub fn html(body: impl Into<String>) -> Response<Bytes> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Bytes::from(body.into()))
        .expect("failed to build response")
}

/// Builds a 302 redirect.
#[must_use]
pub fn redirect(location: &str) -> Response<Bytes> {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .body(Bytes::new())
        .expect("failed to build response")
}

/// Appends a `Set-Cookie` header to a response.
#[must_use]
pub fn with_cookie(mut response: Response<Bytes>, cookie: &SetCookie) -> Response<Bytes> {
    if let Ok(value) = cookie.to_header_value().parse() {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
