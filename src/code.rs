//! One-time verification code generation

use rand::Rng;

/// Alphabet for verification codes
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Code length; 36^8 combinations
pub const CODE_LEN: usize = 8;

/// Generate a fresh one-time verification code
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
