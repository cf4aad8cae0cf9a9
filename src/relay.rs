use crate::headers;
use crate::query::RequestControl;
use crate::request::{self, RequestError};
use crate::special_response;
use axum::body::Body;
use axum::response::Response;
use http::{header, HeaderMap, StatusCode};
use log::error;
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Forwards the request described by `control` and relays the upstream
/// answer: either a (possibly rewritten) redirect or the streamed body.
pub async fn run(
    control: &RequestControl,
    incoming: &HeaderMap,
    raw_query: &BTreeMap<String, String>,
) -> Response {
    let req_headers = headers::build_request_headers(control, incoming);

    let resp = match request::get(
        control.target_url.as_str(),
        req_headers,
        control.follow_redirect,
        control.decompress,
    )
    .await
    {
        Ok(resp) => resp,

        Err(RequestError::Timeout) => {
            return special_response::build_resp_with_fallback(StatusCode::GATEWAY_TIMEOUT);
        }

        Err(RequestError::Reqwest(e)) => {
            error!("upstream request failed: {}", e);
            return special_response::build_resp_with_fallback(StatusCode::BAD_GATEWAY);
        }
    };

    let status = resp.status();
    let res_headers = headers::build_response_headers(resp.headers(), control);

    // Redirect detection runs as its own phase, after the delete-filter and
    // before any header emission, so the outcome never depends on header
    // iteration order.
    if let Some(location) = res_headers.get(header::LOCATION) {
        let location = location.to_str().unwrap_or_default().to_owned();
        return redirect_resp(status, &location, control, raw_query);
    }

    stream_resp(status, res_headers, resp)
}

fn redirect_resp(
    status: StatusCode,
    location: &str,
    control: &RequestControl,
    raw_query: &BTreeMap<String, String>,
) -> Response {
    let target = if control.redirect_with_proxy {
        proxied_redirect_url(location, raw_query)
    } else {
        location.to_owned()
    };

    let resp = Response::builder()
        .status(status)
        .header(header::LOCATION, target.as_str())
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, "*")
        .body(Body::empty());

    match resp {
        Ok(resp) => resp,
        Err(e) => {
            error!("illegal redirect target {:?}: {}", target, e);
            special_response::build_resp_with_fallback(StatusCode::BAD_GATEWAY)
        }
    }
}

// Sends the caller back through the relay itself: the new target goes into
// `url` and every other original parameter is re-serialized verbatim, so
// the control flags survive the hop.
fn proxied_redirect_url(location: &str, raw_query: &BTreeMap<String, String>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("url", location);
    for (name, value) in raw_query {
        if name != "url" {
            serializer.append_pair(name, value);
        }
    }

    format!("/proxy?{}", serializer.finish())
}

// The body is piped through chunk by chunk; dropping the response (caller
// hangup) drops the upstream stream with it.
fn stream_resp(status: StatusCode, res_headers: HeaderMap, resp: reqwest::Response) -> Response {
    let mut forwarded = Response::new(Body::from_stream(resp.bytes_stream()));
    *forwarded.status_mut() = status;
    *forwarded.headers_mut() = res_headers;

    forwarded
}
