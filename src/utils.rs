/// Slash quoting for values placed inside quoted Digest header fields.
pub(crate) trait QuoteForDigest {
    fn quote_for_digest(&self) -> String;
}

impl<T: AsRef<str>> QuoteForDigest for T {
    fn quote_for_digest(&self) -> String {
        self.as_ref().replace('\\', "\\\\").replace('"', "\\\"")
    }
}
