use std::fmt::{self, Display, Formatter};
use std::result;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// A constructor argument that must not be empty was empty.
    EmptyField(&'static str),
    /// The OS random source could not supply bytes for a token.
    EntropyFailure(String),
    /// The nonce counter ran out of 8-hex-digit values; the session
    /// cannot sign further requests.
    NonceCounterExhausted,
    UnknownAlgorithm(String),
    BadQop(String),
    /// The server challenge offered no usable qop (only `auth` is supported).
    BadQopOptions(String),
    MissingRequired(&'static str, String),
    InvalidHeaderSyntax(String),
    /// The computed credential is not a valid HTTP header value.
    InvalidHeaderValue,
}

pub type Result<T> = result::Result<T, Error>;

use Error::*;

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EmptyField(what) => write!(f, "\"{}\" must not be empty", what),
            EntropyFailure(ctx) => write!(f, "Secure random source failed: {}", ctx),
            NonceCounterExhausted => write!(f, "Nonce counter exhausted, session must be replaced."),
            UnknownAlgorithm(ctx) => write!(f, "Unknown algorithm: {}", ctx),
            BadQop(ctx) => write!(f, "Bad Qop option: {}", ctx),
            BadQopOptions(ctx) => write!(f, "Unusable Qop options in challenge: {}", ctx),
            MissingRequired(what, ctx) => write!(f, "Missing \"{}\" in header: {}", what, ctx),
            InvalidHeaderSyntax(ctx) => write!(f, "Invalid header syntax: {}", ctx),
            InvalidHeaderValue => write!(f, "Credential is not a valid header value."),
        }
    }
}

impl From<rand::Error> for Error {
    fn from(e: rand::Error) -> Self {
        EntropyFailure(e.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(_: http::header::InvalidHeaderValue) -> Self {
        InvalidHeaderValue
    }
}

impl std::error::Error for Error {}
