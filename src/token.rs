use crate::Result;

use rand::rngs::OsRng;
use rand::RngCore;

const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Token length used for self-issued nonce, opaque and cnonce values.
pub(crate) const TOKEN_LEN: usize = 32;

/// Generate a random alphanumeric token of the given length.
///
/// Bytes come from the OS random source and are reduced modulo the
/// 62-character alphabet; callers must not assume more than per-call
/// randomness. Fails with [`Error::EntropyFailure`](crate::Error) if the
/// OS source cannot supply bytes - there is no fallback generator.
pub fn secure_token(length: usize) -> Result<String> {
    let mut bytes = vec![0u8; length];
    OsRng.try_fill_bytes(&mut bytes)?;

    Ok(bytes
        .iter()
        .map(|&b| ALPHABET[(b as usize) % ALPHABET.len()] as char)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length() {
        for &len in &[0usize, 1, 8, 32, 62, 255] {
            assert_eq!(secure_token(len).unwrap().chars().count(), len);
        }
    }

    #[test]
    fn test_token_alphabet() {
        let token = secure_token(512).unwrap();
        assert!(token.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(secure_token(32).unwrap(), secure_token(32).unwrap());
    }
}
