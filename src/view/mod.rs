//! Rendering to JSON.
//!
//! > View is the only module that knows anything about HTML, or JSON, or other "renderings" of
//! > the response. I'm happy to call this "view" in common with traditional stateless MVC,
//! > because it's role is largely the same.
//!
//! Every response this system produces, success or failure, is JSON.

use failure::{Error, Fallible};
use serde::Serialize;
use serde_json::json;
use warp::http::{header::CONTENT_TYPE, Response, StatusCode};

/// Renders a value as a JSON response with the given status.
pub fn render_json<T: Serialize>(status: StatusCode, data: &T) -> Fallible<Response<String>> {
    let body = serde_json::to_string(data)?;
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .map_err(Error::from)
}

/// Renders an error message in the `{"error": ...}` envelope every failure response uses.
pub fn render_error(status: StatusCode, message: &str) -> Fallible<Response<String>> {
    render_json(status, &json!({ "error": message }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_json_sets_status_and_content_type() {
        let resp = render_json(StatusCode::CREATED, &vec![1, 2, 3]).unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(resp.body().as_str(), "[1,2,3]");
    }

    #[test]
    fn render_error_uses_the_error_envelope() {
        let resp = render_error(StatusCode::NOT_FOUND, "User not found").unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.body().as_str(), r#"{"error":"User not found"}"#);
    }
}
