use crate::query::RequestControl;
use http::{header, HeaderMap, HeaderValue};

/// Folds header sources left to right into a fresh map; a later source
/// overwrites an earlier one per name. Names are case-insensitive.
pub fn concat(sources: &[&HeaderMap]) -> HeaderMap {
    let mut total = HeaderMap::new();
    for source in sources {
        for (name, value) in source.iter() {
            total.insert(name, value.clone());
        }
    }

    total
}

/// Removes every header whose name appears in `names`, case-insensitively.
pub fn strip(mut headers: HeaderMap, names: &[String]) -> HeaderMap {
    for name in names {
        headers.remove(name.as_str());
    }

    headers
}

/// Outbound request headers: host and the append list first, the caller's
/// own headers on top (unless suppressed), the delete list as a post-filter.
pub fn build_request_headers(control: &RequestControl, incoming: &HeaderMap) -> HeaderMap {
    let mut base = HeaderMap::new();
    if let Some(host) = target_host(control) {
        if let Ok(host) = HeaderValue::try_from(host) {
            base.insert(header::HOST, host);
        }
    }
    let base = concat(&[&base, &control.append_req_headers]);

    let merged = if control.ignore_req_headers {
        base
    } else {
        concat(&[&base, incoming])
    };

    strip(merged, &control.delete_req_headers)
}

/// Returned response headers: upstream first, the unconditional CORS pair,
/// the append list last (highest precedence), then the delete post-filter.
pub fn build_response_headers(upstream: &HeaderMap, control: &RequestControl) -> HeaderMap {
    let mut cors = HeaderMap::new();
    cors.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    cors.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("*"),
    );

    let merged = concat(&[upstream, &cors, &control.append_res_headers]);

    strip(merged, &control.delete_res_headers)
}

fn target_host(control: &RequestControl) -> Option<String> {
    let url = &control.target_url;
    let host = url.host_str()?;

    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_owned()),
    }
}
