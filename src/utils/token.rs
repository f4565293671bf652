use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub fn generate_access_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Hex HMAC-SHA256 of an access token. Only this digest is persisted.
pub fn digest_token(secret: &str, token: &str) -> String {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("hmac key of any size is valid"));
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn digests_match(expected: &str, presented: &str) -> bool {
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}
