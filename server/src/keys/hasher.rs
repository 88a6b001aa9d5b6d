//! Argon2id hashing for issued credentials.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::Deserialize;

use super::KeyStoreError;

/// Argon2id cost parameters, read from the `[hashing]` config section.
#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    /// Memory cost in KiB (default 19456, the OWASP baseline).
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes (default 2).
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism (default 1).
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    19456
}
fn default_iterations() -> u32 {
    2
}
fn default_parallelism() -> u32 {
    1
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

/// Salted one-way hasher. Each [`hash`](Self::hash) call draws a fresh salt,
/// so the same plaintext never hashes to the same string twice.
#[derive(Clone)]
pub struct KeyHasher {
    argon2: Argon2<'static>,
}

impl KeyHasher {
    /// Build a hasher, rejecting cost parameters Argon2 will not accept.
    pub fn new(config: &HashConfig) -> Result<Self, KeyStoreError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| KeyStoreError::InvalidHashParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `plaintext` into a PHC string (`$argon2id$v=19$...`).
    pub fn hash(&self, plaintext: &str) -> Result<String, KeyStoreError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| KeyStoreError::Hashing(e.to_string()))
    }

    /// Check `plaintext` against a stored PHC string. A malformed stored
    /// hash never matches.
    pub fn verify(&self, plaintext: &str, phc: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(phc) else {
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> HashConfig {
        HashConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = KeyHasher::new(&cheap()).unwrap();
        let h1 = hasher.hash("secret").unwrap();
        let h2 = hasher.hash("secret").unwrap();
        assert_ne!(h1, h2);
        assert!(h1.starts_with("$argon2id$"));
        assert!(!h1.contains("secret"));
    }

    #[test]
    fn test_verify() {
        let hasher = KeyHasher::new(&cheap()).unwrap();
        let h = hasher.hash("secret").unwrap();
        assert!(hasher.verify("secret", &h));
        assert!(!hasher.verify("Secret", &h));
        assert!(!hasher.verify("", &h));
    }

    #[test]
    fn test_verify_malformed_hash() {
        let hasher = KeyHasher::new(&cheap()).unwrap();
        assert!(!hasher.verify("secret", "not-a-phc-string"));
    }

    #[test]
    fn test_rejects_bad_params() {
        let config = HashConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        };
        assert!(matches!(
            KeyHasher::new(&config),
            Err(KeyStoreError::InvalidHashParams(_))
        ));
    }
}
