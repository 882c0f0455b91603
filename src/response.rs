use http::header::{CACHE_CONTROL, CONTENT_TYPE};
use http::{Response, StatusCode};
use log::error;
use serde_json::json;

use crate::listing::{self, FileEntry, ListingError};

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const NO_CACHE: &str = "no-store, no-cache, must-revalidate, max-age=0";

fn json_response(status: StatusCode, body: String) -> Result<Response<String>, http::Error> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
        .header(CACHE_CONTROL, NO_CACHE)
        .body(body)
}

fn error_body(err: &ListingError) -> String {
    let body = match err {
        ListingError::Serialization(e) => json!({
            "error": "failed to encode listing",
            "message": e.to_string(),
        }),
        e => json!({ "error": e.to_string() }),
    };
    body.to_string()
}

/// Shape a listing outcome into the response served to the client.
pub fn listing_response(
    listing: Result<Vec<FileEntry>, ListingError>,
    pretty: bool,
) -> Result<Response<String>, http::Error> {
    let encoded = listing.and_then(|entries| Ok(listing::to_json(&entries, pretty)?));

    match encoded {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => {
            error!("listing failed: {}", e);
            json_response(StatusCode::INTERNAL_SERVER_ERROR, error_body(&e))
        }
    }
}

/// CGI/1.1 rendering: a `Status` header, the response headers, a blank line
/// and the body.
pub fn render_cgi(resp: &Response<String>) -> String {
    let status = resp.status();
    let mut out = format!(
        "Status: {} {}\r\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );
    for (name, value) in resp.headers() {
        out.push_str(&format!("{}: {}\r\n", name, String::from_utf8_lossy(value.as_bytes())));
    }
    out.push_str("\r\n");
    out.push_str(resp.body());
    out
}
