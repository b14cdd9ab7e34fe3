//! Password hashing and session token generation

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of a session token in characters.
///
/// 48 alphanumerics is ~285 bits of randomness; tokens are opaque and
/// only ever compared against the sessions table.
const SESSION_TOKEN_LEN: usize = 48;

/// Hash a password with bcrypt at the default cost.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Verify a password against a stored bcrypt hash.
///
/// Takes the raw submitted string: sign-in must not length-filter the
/// guess before the comparison decides.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

/// Generate a fresh session token from the thread RNG.
pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hashing_round_trip() {
        let hash = hash_password("my_secure_password").unwrap();
        assert!(verify_password("my_secure_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn tokens_are_long_and_distinct() {
        let a = generate_session_token();
        let b = generate_session_token();

        assert_eq!(a.len(), SESSION_TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
