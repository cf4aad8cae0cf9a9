use crate::vars;
use http::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::Response;
use std::time::Duration;

// Bound on transport-level following, to keep a misbehaving upstream from
// redirecting in a loop.
const MAX_REDIRECTS: usize = 5;

pub enum RequestError {
    Timeout,
    Reqwest(reqwest::Error),
}

pub async fn get(
    url: &str,
    headers: HeaderMap,
    follow_redirect: bool,
    decompress: bool,
) -> Result<Response, RequestError> {
    // Redirect chasing stays under the relay's control: the transport
    // either surfaces the 3xx untouched or follows a bounded chain.
    let policy = if follow_redirect {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(vars::connect_timeout_secs()))
        .redirect(policy)
        .gzip(decompress)
        .brotli(decompress)
        .deflate(decompress)
        .default_headers(headers)
        .build()
        .map_err(RequestError::Reqwest)?;

    match client.get(url).send().await {
        Ok(resp) => Ok(resp),
        Err(e) => Err(map_error(e)),
    }
}

fn map_error(e: reqwest::Error) -> RequestError {
    if e.is_timeout() {
        return RequestError::Timeout;
    }

    RequestError::Reqwest(e)
}
