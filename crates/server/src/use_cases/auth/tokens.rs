//! Raw token material for setup and reset links.
//!
//! The raw value goes into the emailed link; only its SHA-256 digest is
//! stored.

use rand::RngCore;
use sha2::{Digest, Sha256};

pub struct TokenMaterial {
    pub raw: String,
    pub hash: String,
}

pub fn mint_token() -> TokenMaterial {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = sha256_hex(&raw);
    TokenMaterial { raw, hash }
}

pub fn sha256_hex(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
