use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::task::Kwargs;

/// Registry name of the bitcoin address callable.
pub const NAME: &str = "bitcoin_address";

const BASE58: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[13][a-km-zA-HJ-NP-Z1-9]{25,34}\b")
        .expect("bitcoin candidate pattern should compile")
});

/// Legacy (P2PKH) and P2SH addresses with a valid Base58Check checksum.
pub fn find(text: &str, _kwargs: &Kwargs) -> Vec<String> {
    CANDIDATE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|s| base58check_valid(s))
        .map(String::from)
        .collect()
}

/// Decode a 25-byte Base58Check payload and verify its 4-byte checksum
/// (first bytes of a double SHA-256 over the version and hash).
pub fn base58check_valid(address: &str) -> bool {
    let mut bytes = [0u8; 25];
    for c in address.chars() {
        let Some(mut carry) = BASE58.find(c).map(|v| v as u32) else {
            return false;
        };
        for b in bytes.iter_mut().rev() {
            carry += 58 * u32::from(*b);
            *b = (carry & 0xff) as u8;
            carry >>= 8;
        }
        if carry != 0 {
            return false;
        }
    }
    let checksum = Sha256::digest(Sha256::digest(&bytes[..21]));
    checksum[..4] == bytes[21..]
}
