//! Argon2id password hashing, verification, and the registration password
//! policy.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::config::env_or;

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Password policy
// ---------------------------------------------------------------------------

/// Default minimum password length in characters.
const DEFAULT_MIN_LENGTH: usize = 8;

/// Longest password accepted at registration, in characters.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Similarity ratio at or above which a password is considered derived from
/// a user attribute.
const MAX_SIMILARITY: f64 = 0.7;

/// Frequently used passwords, lowercase. Matching is case-insensitive.
const COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "12345678", "qwerty", "123456789", "12345", "1234", "111111",
    "1234567", "dragon", "123123", "baseball", "abc123", "football", "monkey", "letmein",
    "696969", "shadow", "master", "666666", "qwertyuiop", "123321", "mustang", "1234567890",
    "michael", "654321", "superman", "1qaz2wsx", "7777777", "121212", "000000", "qazwsx",
    "123qwe", "killer", "trustno1", "jordan", "jennifer", "zxcvbnm", "asdfgh", "hunter",
    "buster", "soccer", "harley", "batman", "andrew", "tigger", "sunshine", "iloveyou",
    "2000", "charlie", "robert", "thomas", "hockey", "ranger", "daniel", "starwars",
    "klaster", "112233", "george", "computer", "michelle", "jessica", "pepper", "1111",
    "zxcvbn", "555555", "11111111", "131313", "freedom", "777777", "pass", "maggie",
    "159753", "aaaaaa", "ginger", "princess", "joshua", "cheese", "amanda", "summer",
    "love", "ashley", "nicole", "chelsea", "biteme", "matthew", "access", "yankees",
    "987654321", "dallas", "austin", "thunder", "taylor", "matrix", "passw0rd",
    "password1", "password123", "welcome", "welcome1", "admin", "admin123", "login",
    "qwerty123", "1q2w3e4r", "abcd1234", "letmein1", "changeme", "fitness", "workout",
    "gym12345", "iloveyou1", "secret", "whatever", "trustme", "00000000",
];

/// Rules a new account's password must satisfy.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum length in characters (default: 8).
    pub min_length: usize,
    /// Reject passwords made only of digits (default: true).
    pub reject_numeric: bool,
    /// Reject passwords from the common-password list (default: true).
    pub reject_common: bool,
    /// Reject passwords too similar to the username or email (default: true).
    pub reject_similar: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            reject_numeric: true,
            reject_common: true,
            reject_similar: true,
        }
    }
}

impl PasswordPolicy {
    /// Load the policy from environment variables.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `PASSWORD_MIN_LENGTH`     | `8`     |
    /// | `PASSWORD_REJECT_NUMERIC` | `true`  |
    /// | `PASSWORD_REJECT_COMMON`  | `true`  |
    /// | `PASSWORD_REJECT_SIMILAR` | `true`  |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_length: env_or("PASSWORD_MIN_LENGTH", defaults.min_length),
            reject_numeric: env_flag("PASSWORD_REJECT_NUMERIC", defaults.reject_numeric),
            reject_common: env_flag("PASSWORD_REJECT_COMMON", defaults.reject_common),
            reject_similar: env_flag("PASSWORD_REJECT_SIMILAR", defaults.reject_similar),
        }
    }

    /// Check `password` against every enabled rule.
    ///
    /// Returns one message per violated rule; an empty vector means the
    /// password is acceptable. `attributes` are the user's own values
    /// (username, email) that the password must not resemble.
    ///
    /// A password over [`MAX_PASSWORD_LENGTH`] is reported on its own and the
    /// other rules are not evaluated.
    pub fn check(&self, password: &str, attributes: &[(&str, &str)]) -> Vec<String> {
        let length = password.chars().count();
        if length > MAX_PASSWORD_LENGTH {
            return vec![format!(
                "This password is too long. It must contain at most {MAX_PASSWORD_LENGTH} characters."
            )];
        }

        let mut problems = Vec::new();

        if self.reject_similar {
            if let Some(label) = similar_attribute(password, attributes) {
                problems.push(format!("The password is too similar to the {label}."));
            }
        }

        if length < self.min_length {
            problems.push(format!(
                "This password is too short. It must contain at least {} characters.",
                self.min_length
            ));
        }

        if self.reject_common && COMMON_PASSWORDS.contains(&password.trim().to_lowercase().as_str())
        {
            problems.push("This password is too common.".to_string());
        }

        if self.reject_numeric && !password.is_empty() && password.chars().all(|c| c.is_ascii_digit())
        {
            problems.push("This password is entirely numeric.".to_string());
        }

        problems
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Label of the first attribute the password resembles, if any.
///
/// Each attribute is compared whole and split into its word parts (so an
/// email's local part and domain are checked separately).
fn similar_attribute<'a>(password: &str, attributes: &[(&'a str, &str)]) -> Option<&'a str> {
    let password = password.to_lowercase();
    attributes.iter().find_map(|&(label, value)| {
        let value = value.to_lowercase();
        let resembles = std::iter::once(value.as_str())
            .chain(value.split(|c: char| !c.is_alphanumeric()))
            .filter(|part| !part.is_empty())
            .any(|part| similarity(&password, part) >= MAX_SIMILARITY);
        resembles.then_some(label)
    })
}

/// `2 * LCS / (len(a) + len(b))` over characters, in `0.0..=1.0`.
///
/// Returns `0.0` without running the LCS when the lengths alone rule out
/// reaching [`MAX_SIMILARITY`].
fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    // LCS is at most the shorter length.
    let bound = (2 * a.len().min(b.len())) as f64 / total as f64;
    if bound < MAX_SIMILARITY {
        return 0.0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in &a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }

    (2 * prev[b.len()]) as f64 / total as f64
}
