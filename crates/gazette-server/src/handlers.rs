//! Route handlers.
//!
//! Every handler declares the fields it needs as an ordered
//! [`FieldSpec`] list per source and runs only after extraction
//! succeeds. API routes report failures as the uniform JSON envelope;
//! page routes redirect to `/` with an `error` query parameter.

use bytes::Bytes;
use constant_time_eq::constant_time_eq;
use gazette_core::{AppError, Article, FieldSpec, MAX_CONTENT_LEN};
use gazette_extract::{extract_fields, response, Cookies, ExtractionContext, SetCookie};
use http::Response;
use serde_json::json;
use tracing::info;

use crate::app::App;
use crate::pages;
use crate::session::{SESSION_COOKIE, SESSION_MAX_AGE_SECS};

/// GET `/health` — liveness probe.
pub fn health() -> Response<Bytes> {
    response::json(&json!({"status": "ok"}))
}

/// GET `/` — the article listing.
///
/// An `error` query parameter (set by redirects from other routes) is
/// rendered as a banner above the list.
pub fn articles(app: &App, ctx: &ExtractionContext) -> Result<Response<Bytes>, AppError> {
    let articles = app.store().list()?;
    let error = query_param(ctx, "error");
    Ok(response::html(pages::articles(&articles, error.as_deref())))
}

/// GET `/{slug}` — a single article.
///
/// Failures redirect home rather than answering with JSON: a slug that
/// fails validation carries its validator code, a miss carries
/// `no_article`. Lookup is case-insensitive.
pub fn article(app: &App, slug: &str) -> Response<Bytes> {
    let raw = serde_json::Value::String(slug.to_string());
    let slug = match FieldSpec::new("slug").validate(Some(&raw)) {
        Ok(Some(value)) => value.to_lowercase(),
        Ok(None) => return response::redirect("/?error=invalid_slug"),
        Err(err) => return response::redirect(&format!("/?error={}", err.error_code())),
    };

    match app.store().get(&slug) {
        Ok(Some(article)) => response::html(pages::article(&article)),
        Ok(None) => response::redirect("/?error=no_article"),
        Err(err) => response::error(&AppError::from(err)),
    }
}

/// GET `/post` — the authoring form.
///
/// Guarded by the session god password: extraction failures answer with
/// the JSON envelope, a mismatch redirects home with `unauthorized`.
pub fn authoring(app: &App, ctx: &ExtractionContext) -> Result<Response<Bytes>, AppError> {
    let cookies = Cookies::from_request(ctx);
    let session = app.session_object(&cookies);
    let fields = extract_fields(session.as_ref(), &[FieldSpec::new("god_password")])?;

    if !secret_matches(app, fields.require("god_password")?) {
        return Ok(response::redirect("/?error=unauthorized"));
    }

    Ok(response::html(pages::authoring()))
}

/// POST `/api/post` — publish an article.
///
/// Guards, in order: session god password extraction, JSON field
/// extraction, secret comparison, then the insert (whose duplicate-slug
/// rejection the store enforces transactionally).
pub fn create_article(app: &App, ctx: &ExtractionContext) -> Result<Response<Bytes>, AppError> {
    let cookies = Cookies::from_request(ctx);
    let session = app.session_object(&cookies);
    let session_fields = extract_fields(session.as_ref(), &[FieldSpec::new("god_password")])?;

    let body = ctx.json_object();
    let fields = extract_fields(
        body.as_ref(),
        &[
            FieldSpec::new("title"),
            FieldSpec::new("slug"),
            FieldSpec::new("description"),
            FieldSpec::new("content").max_len(MAX_CONTENT_LEN),
        ],
    )?;

    if !secret_matches(app, session_fields.require("god_password")?) {
        return Err(AppError::Unauthorized);
    }

    let article = Article::new(
        fields.require("title")?,
        fields.require("slug")?,
        fields.require("description")?,
        fields.require("content")?,
    );
    app.store().insert(&article)?;

    info!(slug = %article.slug, "article published");
    Ok(response::json(&json!({
        "text": "Posted article.",
        "article": article,
    })))
}

/// POST `/api/set-god-password` — store the supplied password in session
/// state and echo it back.
///
/// The value is not compared against the configured secret here; guarded
/// handlers re-check it on every request.
pub fn set_god_password(app: &App, ctx: &ExtractionContext) -> Result<Response<Bytes>, AppError> {
    let body = ctx.json_object();
    let fields = extract_fields(body.as_ref(), &[FieldSpec::new("god_password")])?;
    let value = fields.require("god_password")?;

    let cookies = Cookies::from_request(ctx);
    // Reuse the caller's session when the cookie verifies; otherwise
    // issue a fresh one.
    let id = cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| app.sessions().verify(cookie))
        .unwrap_or_else(|| app.sessions().issue().0);
    app.sessions().set_god_password(&id, value);

    let cookie = SetCookie::new(SESSION_COOKIE, app.sessions().cookie_value(&id))
        .path("/")
        .max_age_secs(SESSION_MAX_AGE_SECS)
        .http_only(true)
        .same_site_lax();

    let response = response::json(&json!({
        "text": "Set your session's god password.",
        "god_password": value,
    }));
    Ok(response::with_cookie(response, &cookie))
}

fn secret_matches(app: &App, supplied: &str) -> bool {
    constant_time_eq(
        supplied.as_bytes(),
        app.config().god_password.as_bytes(),
    )
}

fn query_param(ctx: &ExtractionContext, name: &str) -> Option<String> {
    ctx.query_string()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
