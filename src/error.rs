use std::fmt;

#[derive(Debug)]
pub enum SearchError {
    Timeout,
    ConnectionFailed(String),
    DnsResolution(String),
    ProxyError(String),
    RateLimited,
    HttpStatus(u16),
    TlsError(String),
    Api(String),
    InvalidAirport(String),
    InvalidDate(String),
    Validation(String),
    Persistence(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(
                f,
                "request timed out: the flight data service may be slow or unreachable. \
                 Try increasing --timeout or check your connection"
            ),
            Self::ConnectionFailed(detail) => write!(
                f,
                "connection failed: check your internet connection ({detail})"
            ),
            Self::DnsResolution(host) => write!(
                f,
                "DNS resolution failed for {host}: check your internet connection"
            ),
            Self::ProxyError(detail) => write!(
                f,
                "proxy error: check your --proxy URL is correct ({detail})"
            ),
            Self::RateLimited => write!(
                f,
                "rate limited by the flight data service (HTTP 429): wait a few minutes \
                 before retrying, or use --proxy to route through a different IP"
            ),
            Self::HttpStatus(status) => write!(
                f,
                "unexpected HTTP status {status} from the flight data service"
            ),
            Self::TlsError(detail) => write!(
                f,
                "TLS/SSL error: connection to the flight data service failed ({detail})"
            ),
            Self::Api(detail) => write!(
                f,
                "flight data service returned an unusable response: {detail}"
            ),
            Self::InvalidAirport(code) => write!(
                f,
                "invalid airport code \"{code}\": must be exactly 3 letters (e.g. JFK, HEL, NRT)"
            ),
            Self::InvalidDate(date) => write!(
                f,
                "invalid date \"{date}\": must be YYYY-MM-DD format (e.g. 2026-03-01)"
            ),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::Persistence(detail) => write!(
                f,
                "search history storage is unavailable ({detail})"
            ),
        }
    }
}

impl std::error::Error for SearchError {}

pub fn from_http_error(err: wreq::Error) -> SearchError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if err.is_timeout() {
        return SearchError::Timeout;
    }

    if err.is_connect() {
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("getaddrinfo") {
            return SearchError::DnsResolution(msg);
        }
        return SearchError::ConnectionFailed(msg);
    }

    if lower.contains("proxy") || lower.contains("socks") {
        return SearchError::ProxyError(msg);
    }

    if lower.contains("tls") || lower.contains("ssl") || lower.contains("certificate") {
        return SearchError::TlsError(msg);
    }

    if lower.contains("builder error") && lower.contains("uri") {
        return SearchError::ProxyError(msg);
    }

    SearchError::ConnectionFailed(msg)
}
