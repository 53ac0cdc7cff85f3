//! Pluggable `Authorization` header generation for HTTP clients: Basic Auth
//! and Digest Auth in the RFC 2617 style with `qop=auth`.
//!
//! A client is configured with one [`AuthStrategy`] and applies it to every
//! outgoing request before transmission. The digest variant owns a
//! [`DigestSession`] that keeps the per-session nonce counter; the counter
//! advances by exactly one per signed request, also under concurrent use.
//!
//! A session can mint its own nonce material ([`DigestSession::new`], for
//! servers that accept client-initiated digest parameters) or answer a
//! parsed `WWW-Authenticate` challenge ([`DigestSession::from_challenge`]).
//!
//! # Examples
//!
//! Answering a server challenge:
//!
//! ```
//! use request_auth::{AuthStrategy, DigestSession};
//!
//! // Value from the WWW-Authenticate HTTP header (usually in a HTTP 401 response)
//! let www_authenticate = r#"Digest realm="testrealm@host.com", qop="auth,auth-int", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;
//!
//! let challenge = request_auth::parse_challenge(www_authenticate).unwrap();
//!
//! // The cnonce is injected here to keep the example reproducible; use
//! // `DigestSession::from_challenge` to have one generated for you.
//! let session = DigestSession::from_challenge_with_cnonce(
//!     &challenge, "Mufasa", "Circle Of Life", "0a4f113b",
//! ).unwrap();
//! let auth = AuthStrategy::Digest(session);
//!
//! let mut request = http::Request::builder()
//!     .method(http::Method::GET)
//!     .uri("/dir/index.html")
//!     .body(())
//!     .unwrap();
//! auth.apply(&mut request).unwrap();
//!
//! assert_eq!(
//!     request.headers()[http::header::AUTHORIZATION],
//!     r#"Digest username="Mufasa", realm="testrealm@host.com", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", uri="/dir/index.html", cnonce="0a4f113b", nc=00000001, qop=auth, response="6629fae49393a05397450978507c4ef1", opaque="5ccc069c403ebaf9f0171e9517f40e41""#
//! );
//!
//! // The counter advances on every request and is part of the hash,
//! // so the response changes even for the same URI.
//! let mut second = http::Request::builder()
//!     .method(http::Method::GET)
//!     .uri("/dir/index.html")
//!     .body(())
//!     .unwrap();
//! auth.apply(&mut second).unwrap();
//! let value = second.headers()[http::header::AUTHORIZATION].to_str().unwrap();
//! assert!(value.contains("nc=00000002"));
//! ```
//!
//! Basic Auth:
//!
//! ```
//! use request_auth::AuthStrategy;
//!
//! let auth = AuthStrategy::basic("bob", "pw");
//! let mut request = http::Request::builder().uri("/profile").body(()).unwrap();
//! auth.apply(&mut request).unwrap();
//!
//! assert_eq!(request.headers()[http::header::AUTHORIZATION], "Basic Ym9iOnB3");
//! ```

mod digest;
mod enums;
mod error;
mod strategy;
mod token;
mod utils;

pub use error::{Error, Result};

pub use crate::digest::{ChallengeHeader, DigestSession, NonceOrigin};
pub use crate::strategy::{AuthStrategy, BasicAuth};
pub use crate::token::secure_token;

pub use crate::enums::*;

/// Parse a `WWW-Authenticate` header value.
/// It's just a convenience method to call [`ChallengeHeader::parse()`].
pub fn parse_challenge(www_authenticate: &str) -> Result<ChallengeHeader> {
    ChallengeHeader::parse(www_authenticate)
}

#[test]
fn test_parse_challenge_respond() {
    let src = r#"
    Digest
       realm="http-auth@example.org",
       qop="auth, auth-int",
       algorithm=MD5,
       nonce="7ypf/xlj9XXwfDPEoM4URrv/xwf94BcCAzFZH4GiTo0v",
       opaque="FQhe/qaU925kfnzjCev0ciny7QMkPqMAFRtzCUYo5tdS"
    "#;

    let challenge = crate::parse_challenge(src).unwrap();
    let session = DigestSession::from_challenge_with_cnonce(
        &challenge,
        "Mufasa",
        "Circle of Life",
        "f2/wE4q74E6zIJEtWaHKaf5wv/H5QzzpXusqGemxURZJ",
    )
    .unwrap();

    let header = session
        .authorize(&http::Method::GET, "/dir/index.html")
        .unwrap();
    let str = header.replace(", ", ",\n  ");

    assert_eq!(
        str,
        r#"
Digest username="Mufasa",
  realm="http-auth@example.org",
  nonce="7ypf/xlj9XXwfDPEoM4URrv/xwf94BcCAzFZH4GiTo0v",
  uri="/dir/index.html",
  cnonce="f2/wE4q74E6zIJEtWaHKaf5wv/H5QzzpXusqGemxURZJ",
  nc=00000001,
  qop=auth,
  response="8ca523f5e9506fed4657c9700eebdbec",
  opaque="FQhe/qaU925kfnzjCev0ciny7QMkPqMAFRtzCUYo5tdS"
"#
        .trim()
    );
}
