//! Check-in link tokens.

use base64::Engine;
use rand::RngCore;
use rand::rngs::OsRng;

/// Random bytes behind every token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Generate an unguessable, URL-safe check-in token.
///
/// 32 bytes from the operating system CSPRNG, base64url without padding
/// (43 characters).
pub fn generate_token() -> String {
    let mut random_bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut random_bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tokens_are_url_safe_and_43_chars() {
        let t = generate_token();
        assert_eq!(t.len(), 43);
        assert!(
            t.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn tokens_do_not_repeat() {
        let seen: HashSet<String> = (0..500).map(|_| generate_token()).collect();
        assert_eq!(seen.len(), 500);
    }
}
