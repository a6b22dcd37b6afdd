use md5::{Digest, Md5};

/// Length of a rendered token in hex characters.
pub const TOKEN_LEN: usize = 32;

/// The digest a client prefixes to its command to prove it knows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthToken({}..)", &self.0[..4])
    }
}

/// Derives the token for a greeting seed: lowercase hex of `md5(seed + secret)`.
pub fn derive(seed: &str, secret: &str) -> AuthToken {
    let mut hasher = Md5::new();
    hasher.update(seed.as_bytes());
    hasher.update(secret.as_bytes());
    AuthToken(hex::encode(hasher.finalize()))
}
