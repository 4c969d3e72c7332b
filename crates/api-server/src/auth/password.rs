use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Salted SHA-256 hash encoded as `v1$<salt>$<digest>`
pub fn hash_password(password: &str) -> String {
    let mut salt = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);

    format!(
        "v1${}${}",
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(digest(&salt, password))
    )
}

pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    let mut parts = stored_hash.split('$');
    let (Some("v1"), Some(encoded_salt), Some(encoded_digest), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let Ok(salt) = URL_SAFE_NO_PAD.decode(encoded_salt) else {
        return false;
    };
    let Ok(expected_digest) = URL_SAFE_NO_PAD.decode(encoded_digest) else {
        return false;
    };

    constant_time_eq(&expected_digest, &digest(&salt, password))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}
