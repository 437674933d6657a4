/// Session token utilities
///
/// Session tokens are opaque random strings handed to the browser in a
/// cookie. The database stores only the SHA-256 digest, so a leaked table
/// dump does not yield usable sessions.
///
/// # Token Format
///
/// 32 random base62 characters ([A-Za-z0-9]), roughly 190 bits of entropy.
///
/// # Example
///
/// ```
/// use taskr_shared::auth::token::{generate_session_token, hash_session_token};
///
/// let (token, hash) = generate_session_token();
/// assert_eq!(token.len(), 32);
/// assert_eq!(hash, hash_session_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a session token in characters
pub const TOKEN_LENGTH: usize = 32;

/// Generates a new session token
///
/// Returns (plaintext_token, sha256_hash). The plaintext goes into the
/// Set-Cookie header; the hash goes into the sessions table.
pub fn generate_session_token() -> (String, String) {
    let token = generate_random_string(TOKEN_LENGTH);
    let hash = hash_session_token(&token);

    (token, hash)
}

/// Generates a random alphanumeric string
///
/// Base62 (A-Z, a-z, 0-9) keeps tokens cookie-safe without escaping.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a session token using SHA-256
///
/// Hex-encoded, 64 characters, deterministic. Session resolution looks the
/// digest up by exact match; there is no separate verification step.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
