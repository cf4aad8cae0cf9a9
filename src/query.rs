use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Per-request control structure, built fresh from the query parameters.
pub struct RequestControl {
    pub target_url: Url,
    pub ignore_req_headers: bool,
    pub follow_redirect: bool,
    pub redirect_with_proxy: bool,
    pub decompress: bool,
    pub append_req_headers: HeaderMap,
    pub append_res_headers: HeaderMap,
    pub delete_req_headers: Vec<String>,
    pub delete_res_headers: Vec<String>,
}

#[derive(Debug)]
pub enum ComposeError {
    MissingUrl,
    InvalidUrl(url::ParseError),
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::MissingUrl => write!(f, "Missing url"),
            ComposeError::InvalidUrl(e) => write!(f, "Invalid url: {}", e),
        }
    }
}

pub fn compose(params: &BTreeMap<String, String>) -> Result<RequestControl, ComposeError> {
    let url = params.get("url").ok_or(ComposeError::MissingUrl)?;
    let target_url = Url::parse(url).map_err(ComposeError::InvalidUrl)?;

    Ok(RequestControl {
        target_url,
        ignore_req_headers: parse_bool(params.get("ignoreReqHeaders")),
        follow_redirect: parse_bool(params.get("followRedirect")),
        redirect_with_proxy: parse_bool(params.get("redirectWithProxy")),
        decompress: parse_bool(params.get("decompress")),
        append_req_headers: compose_headers(parse_pairs(params.get("appendReqHeaders"))),
        append_res_headers: compose_headers(parse_pairs(params.get("appendResHeaders"))),
        delete_req_headers: parse_names(params.get("deleteReqHeaders")),
        delete_res_headers: parse_names(params.get("deleteResHeaders")),
    })
}

// Only the literal string "true" enables a flag.
fn parse_bool(value: Option<&String>) -> bool {
    value.map(|v| v == "true").unwrap_or(false)
}

// Hand-written query strings tend to carry single-quoted JSON. Parse
// attempts run in order: strict JSON, then with single quotes normalized
// to double quotes, then give up to the default instead of failing the
// request.
fn lenient_json<T: serde::de::DeserializeOwned>(value: &str) -> Option<T> {
    serde_json::from_str(value)
        .or_else(|_| serde_json::from_str(&value.replace('\'', "\"")))
        .ok()
}

fn parse_pairs(value: Option<&String>) -> Vec<(String, String)> {
    let Some(value) = value else {
        return vec![];
    };

    lenient_json(value).unwrap_or_default()
}

// The delete lists arrive either as the same [name, value] pairs as the
// append lists or as a flat array of names.
#[derive(Deserialize)]
#[serde(untagged)]
enum NameEntry {
    Pair(String, String),
    Name(String),
}

fn parse_names(value: Option<&String>) -> Vec<String> {
    let Some(value) = value else {
        return vec![];
    };
    let entries: Vec<NameEntry> = lenient_json(value).unwrap_or_default();

    entries
        .into_iter()
        .map(|entry| match entry {
            NameEntry::Pair(name, _) | NameEntry::Name(name) => name.to_lowercase(),
        })
        .collect()
}

fn compose_headers(pairs: Vec<(String, String)>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let Ok(name) = HeaderName::try_from(name.to_lowercase()) else {
            continue;
        };
        let Ok(value) = HeaderValue::try_from(value) else {
            continue;
        };

        headers.insert(name, value);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_url_is_terminal() {
        assert!(matches!(
            compose(&params(&[("followRedirect", "true")])),
            Err(ComposeError::MissingUrl)
        ));
    }

    #[test]
    fn malformed_url_is_terminal() {
        assert!(matches!(
            compose(&params(&[("url", "not a url")])),
            Err(ComposeError::InvalidUrl(_))
        ));
    }

    #[test]
    fn only_literal_true_enables_flags() {
        for value in ["false", "1", "True", "yes", ""] {
            let control = compose(&params(&[
                ("url", "https://example.org/"),
                ("followRedirect", value),
            ]))
            .unwrap();
            assert!(!control.follow_redirect, "{:?} coerced to true", value);
        }

        let control = compose(&params(&[
            ("url", "https://example.org/"),
            ("followRedirect", "true"),
        ]))
        .unwrap();
        assert!(control.follow_redirect);
    }

    #[test]
    fn absent_flags_default_to_false() {
        let control = compose(&params(&[("url", "https://example.org/")])).unwrap();
        assert!(!control.ignore_req_headers);
        assert!(!control.follow_redirect);
        assert!(!control.redirect_with_proxy);
        assert!(!control.decompress);
    }

    #[test]
    fn flags_are_coerced_independently() {
        let control = compose(&params(&[
            ("url", "https://example.org/"),
            ("decompress", "true"),
            ("redirectWithProxy", "true"),
        ]))
        .unwrap();
        assert!(control.decompress);
        assert!(control.redirect_with_proxy);
        assert!(!control.ignore_req_headers);
    }

    #[test]
    fn append_headers_parse_strict_json() {
        let control = compose(&params(&[
            ("url", "https://example.org/"),
            ("appendReqHeaders", r#"[["Cookie", "a=b"], ["X-Foo", "bar"]]"#),
        ]))
        .unwrap();
        assert_eq!(control.append_req_headers["cookie"], "a=b");
        assert_eq!(control.append_req_headers["x-foo"], "bar");
    }

    #[test]
    fn append_headers_tolerate_single_quotes() {
        let control = compose(&params(&[
            ("url", "https://example.org/"),
            ("appendResHeaders", "[['cache-control', 'no-store']]"),
        ]))
        .unwrap();
        assert_eq!(control.append_res_headers["cache-control"], "no-store");
    }

    #[test]
    fn unparsable_header_lists_fall_back_to_empty() {
        let control = compose(&params(&[
            ("url", "https://example.org/"),
            ("appendReqHeaders", "[[broken"),
            ("deleteResHeaders", "{nonsense"),
        ]))
        .unwrap();
        assert!(control.append_req_headers.is_empty());
        assert!(control.delete_res_headers.is_empty());
    }

    #[test]
    fn delete_lists_accept_names_or_pairs() {
        let control = compose(&params(&[
            ("url", "https://example.org/"),
            ("deleteReqHeaders", r#"["Cookie", "x-trace"]"#),
            ("deleteResHeaders", r#"[["Set-Cookie", "ignored"]]"#),
        ]))
        .unwrap();
        assert_eq!(control.delete_req_headers, vec!["cookie", "x-trace"]);
        assert_eq!(control.delete_res_headers, vec!["set-cookie"]);
    }

    #[test]
    fn invalid_header_names_are_skipped() {
        let control = compose(&params(&[
            ("url", "https://example.org/"),
            ("appendReqHeaders", r#"[["bad name", "v"], ["x-ok", "v"]]"#),
        ]))
        .unwrap();
        assert_eq!(control.append_req_headers.len(), 1);
        assert_eq!(control.append_req_headers["x-ok"], "v");
    }
}
