use crate::vars;
use http::{header, HeaderMap};
use log::info;

pub fn is_allowed(req_headers: &HeaderMap) -> bool {
    check(req_headers, vars::allowed_origins())
}

// A request without a declared origin is a same-origin or non-browser
// caller and passes; anything else must be on the allowlist.
fn check(req_headers: &HeaderMap, allowlist: &[String]) -> bool {
    let Some(origin) = req_headers.get(header::ORIGIN) else {
        return true;
    };
    let origin = origin.to_str().unwrap_or_default();

    info!("origin: {}", origin);

    allowlist.iter().any(|allowed| allowed == origin)
}
