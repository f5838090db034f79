use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use mime_guess::mime;
use rust_embed::RustEmbed;
use std::borrow::Cow;

/// API description files are embedded into the binary.
#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "*.json"]
pub struct ApiAssets;

pub const OPENAPI_DOCUMENT: &str = "openapi.json";

/// Provides (Bytes, Content-Type) for an embedded asset.
pub fn load(path: &str) -> Option<(Cow<'static, [u8]>, String)> {
    let norm = path.trim_start_matches('/').trim();
    ApiAssets::get(norm).map(|file| (file.data, content_type(norm)))
}

fn content_type(path: &str) -> String {
    let guess = mime_guess::from_path(path).first_or(mime::APPLICATION_OCTET_STREAM);
    if guess.subtype() == mime::JSON {
        "application/json; charset=utf-8".into()
    } else {
        guess.essence_str().to_string()
    }
}

/// `GET /openapi.json`
pub async fn openapi_schema() -> Response {
    match load(OPENAPI_DOCUMENT) {
        Some((data, content_type)) => {
            ([(header::CONTENT_TYPE, content_type)], data.into_owned()).into_response()
        }
        None => {
            tracing::error!("Embedded {} is missing", OPENAPI_DOCUMENT);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
