use crate::enums::{Algorithm, Qop};
use crate::token::{secure_token, TOKEN_LEN};
use crate::utils::QuoteForDigest;
use crate::{Error, Error::*, Result};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;

use http::Method;

/// Where a session's nonce material came from.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum NonceOrigin {
    /// Nonce, opaque and cnonce were minted locally at construction.
    SelfIssued,
    /// Nonce and opaque were taken from a server `WWW-Authenticate` challenge.
    ServerIssued,
}

/// `WWW-Authenticate: Digest` challenge parsed from a HTTP header value.
#[derive(Debug, PartialEq)]
pub struct ChallengeHeader {
    /// Authorization realm (i.e. hostname, serial number...)
    pub realm: String,
    /// Server nonce
    pub nonce: String,
    /// Server opaque string, echoed back unchanged when present
    pub opaque: Option<String>,
    /// True if the server rejected an older digest as expired.
    /// The credentials are still good; retry with a session built from
    /// this challenge.
    pub stale: bool,
    /// Hashing algorithm
    pub algorithm: Algorithm,
    /// Qop variants offered by the server. None on pre-qop (RFC 2069) servers.
    pub qop: Option<Vec<Qop>>,
}

impl ChallengeHeader {
    /// Construct from the `WWW-Authenticate` header string.
    ///
    /// # Errors
    /// If the header is malformed (e.g. missing 'realm', missing a closing
    /// quote, unknown algorithm etc.)
    pub fn parse(input: &str) -> Result<Self> {
        let mut input = input.trim();
        if input.starts_with("Digest") {
            input = &input["Digest".len()..];
        }

        let mut kv = parse_param_list(input)?;

        Ok(Self {
            realm: kv
                .remove("realm")
                .ok_or_else(|| MissingRequired("realm", input.into()))?,
            nonce: kv
                .remove("nonce")
                .ok_or_else(|| MissingRequired("nonce", input.into()))?,
            opaque: kv.remove("opaque"),
            stale: kv
                .get("stale")
                .map_or(false, |v| v.eq_ignore_ascii_case("true")),
            algorithm: match kv.get("algorithm") {
                Some(a) => Algorithm::from_str(a)?,
                None => Algorithm::default(),
            },
            qop: match kv.get("qop") {
                Some(list) => {
                    let mut qops = vec![];
                    for q in list.split(',') {
                        qops.push(Qop::from_str(q.trim())?);
                    }
                    Some(qops)
                }
                None => None,
            },
        })
    }
}

impl FromStr for ChallengeHeader {
    type Err = Error;

    /// Parse HTTP header
    fn from_str(input: &str) -> Result<Self> {
        Self::parse(input)
    }
}

/// Parse the comma separated `key=value` parameter list of a Digest header.
/// Values may be quoted with backslash escapes, or bare.
fn parse_param_list(input: &str) -> Result<HashMap<String, String>> {
    #[derive(Debug)]
    enum State {
        Between,
        Name(usize),
        ValueStart,
        Quoted,
        QuotedEscape,
        Bare,
    }

    let mut state = State::Between;
    let mut parsed = HashMap::new();
    let mut name: &str = "";
    let mut value = String::new();

    for (i, c) in input.char_indices() {
        match state {
            State::Between => {
                if c.is_alphabetic() {
                    state = State::Name(i);
                }
            }
            State::Name(start) => {
                if c == '=' {
                    name = &input[start..i];
                    state = State::ValueStart;
                }
            }
            State::ValueStart => {
                value.clear();
                state = if c == '"' {
                    State::Quoted
                } else {
                    value.push(c);
                    State::Bare
                };
            }
            State::Quoted => match c {
                '"' => {
                    parsed.insert(name.to_string(), value.clone());
                    state = State::Between;
                }
                '\\' => state = State::QuotedEscape,
                _ => value.push(c),
            },
            State::QuotedEscape => {
                value.push(c);
                state = State::Quoted;
            }
            State::Bare => {
                if c == ',' || c.is_ascii_whitespace() {
                    parsed.insert(name.to_string(), value.clone());
                    state = State::Between;
                } else {
                    value.push(c);
                }
            }
        }
    }

    match state {
        State::Bare => {
            parsed.insert(name.to_string(), value);
        }
        State::Between => {}
        _ => return Err(InvalidHeaderSyntax(input.into())),
    }

    Ok(parsed)
}

/// One digest credential binding and its counter state.
///
/// A session is created once when the owning client is configured and is
/// shared by every request sent through that client. Signing takes `&self`;
/// the nonce counter is serialized internally, so concurrent callers see a
/// gapless, strictly increasing `nc` sequence on the wire.
#[derive(Debug)]
pub struct DigestSession {
    realm: String,
    username: String,
    qop: Qop,
    algorithm: Algorithm,
    nonce: String,
    opaque: Option<String>,
    cnonce: String,
    ha1: String,
    origin: NonceOrigin,
    nonce_count: Mutex<u32>,
}

impl DigestSession {
    /// Create a pre-shared session that mints its own nonce, opaque and
    /// cnonce, using the default MD5 algorithm.
    ///
    /// # Errors
    /// Empty realm, username or password, or the OS random source failing
    /// to supply bytes, abort construction.
    pub fn new(realm: &str, username: &str, password: &str) -> Result<DigestSession> {
        Self::with_algorithm(realm, username, password, Algorithm::default())
    }

    /// Like [`new`](DigestSession::new), with a caller-selected hash algorithm.
    pub fn with_algorithm(
        realm: &str,
        username: &str,
        password: &str,
        algorithm: Algorithm,
    ) -> Result<DigestSession> {
        let nonce = secure_token(TOKEN_LEN)?;
        let opaque = secure_token(TOKEN_LEN)?;
        let cnonce = secure_token(TOKEN_LEN)?;

        Self::build(
            realm,
            username,
            password,
            algorithm,
            nonce,
            Some(opaque),
            cnonce,
            NonceOrigin::SelfIssued,
        )
    }

    /// Create a session answering a parsed server challenge. Realm, nonce,
    /// opaque and algorithm come from the challenge; only the cnonce is
    /// minted locally.
    ///
    /// # Errors
    /// The challenge must offer `qop=auth` - pre-qop (RFC 2069) and
    /// auth-int-only challenges are rejected.
    pub fn from_challenge(
        challenge: &ChallengeHeader,
        username: &str,
        password: &str,
    ) -> Result<DigestSession> {
        let cnonce = secure_token(TOKEN_LEN)?;
        Self::from_challenge_with_cnonce(challenge, username, password, &cnonce)
    }

    /// Like [`from_challenge`](DigestSession::from_challenge) with a caller
    /// supplied cnonce, so responses can be checked against reference
    /// vectors. Prefer [`from_challenge`](DigestSession::from_challenge)
    /// outside of tests.
    pub fn from_challenge_with_cnonce(
        challenge: &ChallengeHeader,
        username: &str,
        password: &str,
        cnonce: &str,
    ) -> Result<DigestSession> {
        match &challenge.qop {
            Some(offered) if offered.contains(&Qop::AUTH) => {}
            other => return Err(BadQopOptions(format!("{:?}", other))),
        }

        Self::build(
            &challenge.realm,
            username,
            password,
            challenge.algorithm,
            challenge.nonce.clone(),
            challenge.opaque.clone(),
            cnonce.to_string(),
            NonceOrigin::ServerIssued,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        realm: &str,
        username: &str,
        password: &str,
        algorithm: Algorithm,
        nonce: String,
        opaque: Option<String>,
        cnonce: String,
        origin: NonceOrigin,
    ) -> Result<DigestSession> {
        if realm.is_empty() {
            return Err(EmptyField("realm"));
        }
        if username.is_empty() {
            return Err(EmptyField("username"));
        }
        if password.is_empty() {
            return Err(EmptyField("password"));
        }

        // HA1 is derived here once; the password is not retained.
        let a1 = format!("{}:{}:{}", username, realm, password);
        let ha1 = if algorithm.sess {
            let inner = algorithm.hash_str(&a1);
            algorithm.hash_str(&format!("{}:{}:{}", inner, nonce, cnonce))
        } else {
            algorithm.hash_str(&a1)
        };

        Ok(DigestSession {
            realm: realm.to_string(),
            username: username.to_string(),
            qop: Qop::AUTH,
            algorithm,
            nonce,
            opaque,
            cnonce,
            ha1,
            origin,
            nonce_count: Mutex::new(0),
        })
    }

    /// Sign one outgoing request and return the `Authorization` header value.
    ///
    /// `request_uri` is the path plus query string exactly as sent on the
    /// wire, not the absolute URL. Every call consumes the next nonce count,
    /// also under concurrent use.
    ///
    /// # Errors
    /// Once all 2^32 - 1 counter values are spent, this and every further
    /// call fail; the session must be replaced.
    pub fn authorize(&self, method: &Method, request_uri: &str) -> Result<String> {
        let nc = self.next_nonce_count()?;

        let ha2 = self
            .algorithm
            .hash_str(&format!("{}:{}", method, request_uri));
        let response = self.algorithm.hash_str(&format!(
            "{}:{}:{:08x}:{}:{}:{}",
            self.ha1, self.nonce, nc, self.cnonce, self.qop, ha2
        ));

        let mut header = format!(
            "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\", cnonce=\"{}\", nc={:08x}, qop={}, response=\"{}\"",
            self.username.quote_for_digest(),
            self.realm.quote_for_digest(),
            self.nonce.quote_for_digest(),
            request_uri,
            self.cnonce.quote_for_digest(),
            nc,
            self.qop,
            response,
        );

        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(", opaque=\"{}\"", opaque.quote_for_digest()));
        }

        Ok(header)
    }

    fn next_nonce_count(&self) -> Result<u32> {
        let mut nc = self
            .nonce_count
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *nc = nc.checked_add(1).ok_or(NonceCounterExhausted)?;
        Ok(*nc)
    }

    /// Number of requests signed so far.
    pub fn nonce_count(&self) -> u32 {
        *self
            .nonce_count
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn origin(&self) -> NonceOrigin {
        self.origin
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
