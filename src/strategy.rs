use crate::digest::DigestSession;
use crate::Result;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use http::header::AUTHORIZATION;
use http::{HeaderValue, Request};

/// HTTP Basic credentials.
///
/// Stateless sibling of [`DigestSession`]; applying it base64-encodes
/// `username:password` on the spot.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: &str, password: &str) -> BasicAuth {
        BasicAuth {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// The `Authorization` header value for these credentials.
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64_STANDARD.encode(credentials))
    }
}

/// The authentication capability a client holds, selected when the client
/// is configured.
///
/// A client owns at most one strategy; [`None`](AuthStrategy::None) lets
/// requests pass through unauthenticated.
#[derive(Debug)]
pub enum AuthStrategy {
    None,
    Basic(BasicAuth),
    Digest(DigestSession),
}

impl Default for AuthStrategy {
    fn default() -> Self {
        AuthStrategy::None
    }
}

impl AuthStrategy {
    /// Basic strategy from plain credentials.
    pub fn basic(username: &str, password: &str) -> AuthStrategy {
        AuthStrategy::Basic(BasicAuth::new(username, password))
    }

    /// Pre-shared digest strategy; see [`DigestSession::new`].
    pub fn digest(realm: &str, username: &str, password: &str) -> Result<AuthStrategy> {
        Ok(AuthStrategy::Digest(DigestSession::new(
            realm, username, password,
        )?))
    }

    /// Add or overwrite the request's `Authorization` header.
    ///
    /// The owning client calls this exactly once per outgoing request,
    /// before transmission. The digest variant consumes the next nonce
    /// count; the other variants leave no state behind.
    pub fn apply<B>(&self, request: &mut Request<B>) -> Result<()> {
        let value = match self {
            AuthStrategy::None => return Ok(()),
            AuthStrategy::Basic(basic) => basic.header_value(),
            AuthStrategy::Digest(session) => {
                session.authorize(request.method(), request_uri(request))?
            }
        };

        let value = HeaderValue::from_str(&value)?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Path plus query string as sent on the wire, never the absolute URL.
fn request_uri<B>(request: &Request<B>) -> &str {
    request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| request.uri().path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
    }

    #[test]
    fn test_basic_header() {
        let mut req = request(Method::GET, "/profile");
        AuthStrategy::basic("bob", "pw").apply(&mut req).unwrap();

        // base64("bob:pw")
        assert_eq!(req.headers()[AUTHORIZATION], "Basic Ym9iOnB3");
    }

    #[test]
    fn test_no_strategy_is_noop() {
        let mut req = request(Method::GET, "/profile");
        AuthStrategy::default().apply(&mut req).unwrap();

        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_digest_header_shape() {
        let auth = AuthStrategy::digest("test", "alice", "secret").unwrap();

        for (method, uri) in &[
            (Method::GET, "/a"),
            (Method::POST, "/submit"),
            (Method::GET, "/search?q=rust&page=2"),
        ] {
            let mut req = request(method.clone(), *uri);
            auth.apply(&mut req).unwrap();

            let value = req.headers()[AUTHORIZATION].to_str().unwrap().to_string();
            assert!(value.starts_with("Digest username=\"alice\", realm=\"test\", nonce=\""));
            assert!(value.contains(&format!("\", uri=\"{}\", cnonce=\"", uri)));
            assert!(value.contains(", qop=auth, response=\""));
            assert!(value.contains(", opaque=\""));
        }
    }

    #[test]
    fn test_digest_uri_keeps_query_and_drops_authority() {
        let auth = AuthStrategy::digest("test", "alice", "secret").unwrap();

        let mut req = request(Method::GET, "http://server.example/a?b=c");
        auth.apply(&mut req).unwrap();

        let value = req.headers()[AUTHORIZATION].to_str().unwrap();
        assert!(value.contains("uri=\"/a?b=c\""));
    }

    #[test]
    fn test_apply_overwrites_existing_header() {
        let mut req = request(Method::GET, "/a");
        req.headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));

        AuthStrategy::basic("bob", "pw").apply(&mut req).unwrap();

        assert_eq!(req.headers()[AUTHORIZATION], "Basic Ym9iOnB3");
        assert_eq!(req.headers().get_all(AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn test_digest_counter_advances_through_apply() {
        let auth = AuthStrategy::digest("test", "alice", "secret").unwrap();

        for expected in &["nc=00000001", "nc=00000002", "nc=00000003"] {
            let mut req = request(Method::GET, "/a");
            auth.apply(&mut req).unwrap();
            let value = req.headers()[AUTHORIZATION].to_str().unwrap();
            assert!(value.contains(expected));
        }
    }
}
