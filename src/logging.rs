use http::{header, HeaderMap, StatusCode};
use log::info;
use std::net::SocketAddr;

pub struct RelayedInfo<'a> {
    pub status_code: StatusCode,
    pub url: &'a str,
    pub user_agent: &'a str,
    pub client_ip: String,
}

impl<'a> RelayedInfo<'a> {
    pub fn new(
        status_code: StatusCode,
        url: &'a str,
        req_headers: &'a HeaderMap,
        conn_addr: SocketAddr,
    ) -> Self {
        let user_agent = req_headers
            .get(header::USER_AGENT)
            .map(|v| v.to_str().unwrap_or_default())
            .unwrap_or_default();

        // Behind another proxy the socket address is meaningless; prefer
        // the first forwarded hop.
        let from_header = req_headers
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next());

        let client_ip = if let Some(client_ip) = from_header {
            client_ip.to_owned()
        } else {
            conn_addr.ip().to_string()
        };

        RelayedInfo {
            status_code,
            url,
            user_agent,
            client_ip,
        }
    }

    pub fn print_log(&self) {
        info!(
            "{} => \"{}\" [Client {}] \"{}\"",
            self.status_code, self.url, self.client_ip, self.user_agent
        );
    }
}
