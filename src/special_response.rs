use crate::vars::CONTENT_TYPE_VALUE_TEXT_HTML;
use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use http::{header, StatusCode};
use log::error;

const REJECTION_PAGE: &str = "\
<html>
  <head>
    <title>Leave us alone!</title>
  </head>

  <h1 style=\"color:#11111\">Unauthorized origin.</h1><br>
  <h2>You shall not pass!</h2>
  <img src=\"https://media.tenor.com/VOdWjm2zbEAAAAAC/gandalf-sax-guy.gif\" width=\"50%\" />
</html>
";

/// The fixed non-proxy response for callers whose declared origin is not
/// on the allowlist.
pub fn rejection() -> Response {
    let resp = Response::builder()
        .status(StatusCode::IM_A_TEAPOT)
        .header(header::CONTENT_TYPE, CONTENT_TYPE_VALUE_TEXT_HTML)
        .body(Body::from(REJECTION_PAGE));

    match resp {
        Ok(resp) => resp,
        Err(e) => {
            error!("{}", e);
            build_resp_with_fallback(StatusCode::IM_A_TEAPOT)
        }
    }
}

pub fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

pub fn build_resp(status_code: StatusCode) -> Result<Response, http::Error> {
    Response::builder()
        .status(status_code)
        .body(Body::from(status_code.to_string()))
}

pub fn build_resp_with_fallback(status_code: StatusCode) -> Response {
    match build_resp(status_code) {
        Ok(resp) => resp,
        Err(e) => {
            error!("{}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                StatusCode::INTERNAL_SERVER_ERROR.to_string(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_is_a_fixed_teapot_page() {
        let resp = rejection();
        assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            CONTENT_TYPE_VALUE_TEXT_HTML
        );
    }

    #[test]
    fn gateway_errors_render_the_status_line() {
        let resp = build_resp_with_fallback(StatusCode::BAD_GATEWAY);
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
