use sha2::{Digest, Sha256};

/// Predicate deciding whether a string is a well-formed payout address
pub trait AddressValidator: Send + Sync {
    fn is_valid(&self, address: &str) -> bool;
}

impl<F> AddressValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid(&self, address: &str) -> bool {
        self(address)
    }
}

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const MAINNET_P2PKH: u8 = 0x00;
const MAINNET_P2SH: u8 = 0x05;
const TESTNET_P2PKH: u8 = 0x6f;
const TESTNET_P2SH: u8 = 0xc4;

/// Version byte + 20-byte hash + 4-byte checksum
const PAYLOAD_LEN: usize = 25;

/// Legacy (base58check) bitcoin address rules
///
/// Accepts P2PKH and P2SH addresses whose double-SHA-256 checksum matches.
/// Bech32 addresses are not payout addresses on this network.
#[derive(Debug, Clone, Copy)]
pub struct BtcAddressValidator {
    allow_testnet: bool,
}

impl BtcAddressValidator {
    pub fn mainnet() -> Self {
        Self {
            allow_testnet: false,
        }
    }

    /// Also accept testnet version bytes
    pub fn with_testnet() -> Self {
        Self {
            allow_testnet: true,
        }
    }

    fn version_allowed(&self, version: u8) -> bool {
        match version {
            MAINNET_P2PKH | MAINNET_P2SH => true,
            TESTNET_P2PKH | TESTNET_P2SH => self.allow_testnet,
            _ => false,
        }
    }
}

impl Default for BtcAddressValidator {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl AddressValidator for BtcAddressValidator {
    fn is_valid(&self, address: &str) -> bool {
        if !(26..=35).contains(&address.len()) {
            return false;
        }
        let Some(payload) = base58_decode(address) else {
            return false;
        };
        if payload.len() != PAYLOAD_LEN || !self.version_allowed(payload[0]) {
            return false;
        }
        let (body, checksum) = payload.split_at(PAYLOAD_LEN - 4);
        let first = Sha256::digest(body);
        let second = Sha256::digest(first);
        second[..4] == *checksum
    }
}

/// Decode a base58 string into big-endian bytes; `None` on foreign characters
fn base58_decode(input: &str) -> Option<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::with_capacity(input.len());
    for c in input.bytes() {
        let mut carry = BASE58_ALPHABET.iter().position(|&a| a == c)? as u32;
        for byte in bytes.iter_mut().rev() {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }
    let leading_zeros = input.bytes().take_while(|&c| c == b'1').count();
    let mut out = vec![0u8; leading_zeros];
    out.extend(bytes.into_iter().skip_while(|&b| b == 0));
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_mainnet_addresses() {
        let validator = BtcAddressValidator::mainnet();
        assert!(validator.is_valid("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"));
        assert!(validator.is_valid("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"));
        assert!(validator.is_valid("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"));
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let validator = BtcAddressValidator::mainnet();
        assert!(!validator.is_valid("1BoatSLRHtKNngkdXEeobR76b53LETtpyU"));
    }

    #[test]
    fn test_rejects_malformed_input() {
        let validator = BtcAddressValidator::mainnet();
        assert!(!validator.is_valid(""));
        assert!(!validator.is_valid("not-an-address"));
        // '0', 'O', 'I', 'l' are outside the alphabet
        assert!(!validator.is_valid("1BoatSLRHtKNngkdXEeobR76b53LETtp0T"));
        assert!(!validator.is_valid("1BoatSLRHtKNngkdXEeobR76b53LETtpyT1234567"));
    }

    #[test]
    fn test_testnet_gated() {
        let testnet_addr = "mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn";
        assert!(!BtcAddressValidator::mainnet().is_valid(testnet_addr));
        assert!(BtcAddressValidator::with_testnet().is_valid(testnet_addr));
    }

    #[test]
    fn test_leading_ones_are_zero_bytes() {
        // Hash160 of all zeros
        assert!(BtcAddressValidator::mainnet().is_valid("1111111111111111111114oLvT2"));
    }

    #[test]
    fn test_closure_validator() {
        let validator = |a: &str| a.starts_with('1');
        assert!(validator.is_valid("1abc"));
        assert!(!AddressValidator::is_valid(&validator, "xyz"));
    }
}
