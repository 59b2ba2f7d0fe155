//! Session codes shared out-of-band to pair two peers.

use crate::error::ProtocolError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Characters in a session code.
pub const CODE_LENGTH: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A 6-character `[A-Z0-9]` code identifying the inviting peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionCode(String);

impl SessionCode {
    /// Draws each character uniformly from `[A-Z0-9]`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..CODE_LENGTH)
            .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// Generates a code from the thread-local RNG.
    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    /// Accepts a code typed by a joining player: surrounding whitespace is
    /// dropped and letters are upper-cased.
    pub fn parse(input: &str) -> Result<Self, ProtocolError> {
        let code = input.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(ProtocolError::EmptyCode);
        }
        if code.len() != CODE_LENGTH || !code.bytes().all(|b| ALPHABET.contains(&b)) {
            return Err(ProtocolError::InvalidCode(code));
        }
        Ok(Self(code))
    }

    /// The code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SessionCode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generated_codes_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let code = SessionCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), CODE_LENGTH);
            assert!(code.as_str().bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
            assert_eq!(SessionCode::parse(code.as_str()), Ok(code));
        }
    }

    #[test]
    fn test_parse_normalizes_input() {
        assert_eq!(
            SessionCode::parse("  ab12cd \n").unwrap().as_str(),
            "AB12CD"
        );
    }

    #[test]
    fn test_parse_rejects_bad_codes() {
        assert_eq!(SessionCode::parse("   "), Err(ProtocolError::EmptyCode));
        assert!(matches!(SessionCode::parse("ABC"), Err(ProtocolError::InvalidCode(_))));
        assert!(matches!(SessionCode::parse("ABC-12"), Err(ProtocolError::InvalidCode(_))));
    }
}
