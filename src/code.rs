//! Invitation codes.
//!
//! A code is the capability token embedded in `/i/{code}`, so it is drawn
//! from URL-safe characters only and never handed out twice.

use rand::{distributions::Alphanumeric, Rng};

pub const CODE_LEN: usize = 8;

/// Draws codes from `rng` until one is not `taken`.
pub fn generate<R, F>(rng: &mut R, taken: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    loop {
        let code: String = (0..CODE_LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
            .collect();

        if !taken(&code) {
            return code;
        }
        tracing::debug!(%code, "invitation code collision, drawing again");
    }
}

/// Whether `code` could have been produced by [`generate`].
#[must_use]
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
