use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

const DEFAULT_SALT_LEN: usize = 16;

#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The stored hash is missing its salt/digest separator or is otherwise
    /// not in the `"<salt> <digest>"` form.
    #[error("malformed encoded hash")]
    Malformed,
    #[error("failed to create HMAC instance")]
    Hmac,
}

/// Salts and hashes passwords. The encoded form is `"<salt> <digest>"`, both
/// base64, so a stored hash carries everything [`Hasher::check`] needs to
/// recompute it.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    salt_len: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self {
            salt_len: DEFAULT_SALT_LEN,
        }
    }
}

impl Hasher {
    pub fn new(salt_len: usize) -> Self {
        Self { salt_len }
    }

    fn salt(&self) -> String {
        let mut buf = vec![0u8; self.salt_len];
        rand::thread_rng().fill_bytes(&mut buf);
        BASE64.encode(buf)
    }

    /// Hash a password under a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        self.hash_with_salt(password, &self.salt())
    }

    /// Deterministic variant keyed by an explicit salt; `check` uses it to
    /// recompute a stored hash.
    pub fn hash_with_salt(&self, password: &str, salt: &str) -> Result<String, HashError> {
        let mut mac = HmacSha512::new_from_slice(salt.as_bytes()).map_err(|_| HashError::Hmac)?;
        mac.update(password.as_bytes());
        let digest = mac.finalize().into_bytes();
        Ok(format!("{} {}", salt, BASE64.encode(digest)))
    }

    /// True iff `plain` hashes to `encoded` under the salt `encoded` carries.
    /// A hash without the separator fails explicitly rather than reading as
    /// a mismatch.
    pub fn check(&self, plain: &str, encoded: &str) -> Result<bool, HashError> {
        let (salt, _) = encoded.split_once(' ').ok_or(HashError::Malformed)?;
        Ok(self.hash_with_salt(plain, salt)? == encoded)
    }
}


impl From<HashError> for crate::domain::error::ApiError {
    fn from(e: HashError) -> Self {
        crate::domain::error::ApiError::Auth(e.to_string())
    }
}
