//! Object responses.
//!
//! # Responsibilities
//! - Copy store metadata onto response headers
//! - Guess a content type from the key when the store reports none
//! - Stream the body, or send none for HEAD

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, StatusCode},
    response::Response,
};

use crate::routing::key::extension;
use crate::storage::ObjectMeta;

/// Build the response for a fetched object.
pub fn object_response(
    method: &Method,
    status: StatusCode,
    key: &str,
    meta: &ObjectMeta,
    body: Body,
) -> Response {
    let content_type = meta
        .content_type
        .clone()
        .unwrap_or_else(|| guess_content_type(key).to_string());

    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        body
    };
    let mut response = Response::new(body);
    *response.status_mut() = status;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Some(len) = meta.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }
    for (name, value) in [
        (header::ETAG, &meta.etag),
        (header::LAST_MODIFIED, &meta.last_modified),
        (header::CACHE_CONTROL, &meta.cache_control),
    ] {
        if let Some(value) = value.as_deref().and_then(|v| HeaderValue::from_str(v).ok()) {
            headers.insert(name, value);
        }
    }

    response
}

/// Content type for a key, by its file extension.
pub fn guess_content_type(key: &str) -> &'static str {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    let ext = extension(file_name).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json" | "map") => "application/json",
        Some("webmanifest") => "application/manifest+json",
        Some("wasm") => "application/wasm",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
