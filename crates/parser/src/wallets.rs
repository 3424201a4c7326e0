use std::collections::BTreeSet;

use bitcoin::address::{Address, NetworkUnchecked};
use bitcoin::Network;
use once_cell::sync::Lazy;
use regex::Regex;

/// The four textual shapes a mainnet wallet address can take:
/// P2PKH (leading 1), P2SH (leading 3), bech32 (bc1q) and bech32m (bc1p).
static WALLET_SHAPES: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        Regex::new(r"\b1[a-km-zA-HJ-NP-Z1-9]{25,34}\b").unwrap(),
        Regex::new(r"\b3[a-km-zA-HJ-NP-Z1-9]{25,34}\b").unwrap(),
        Regex::new(r"\bbc1q[ac-hj-np-z02-9]{39,59}\b").unwrap(),
        Regex::new(r"\bbc1p[ac-hj-np-z02-9]{39,59}\b").unwrap(),
    ]
});

/// Scan arbitrary text for wallet addresses.
///
/// A substring is reported only if it matches one of the shape patterns
/// AND survives checksum validation. A candidate with a broken checksum is
/// simply not a wallet; it is dropped without comment. Pure and
/// deterministic; the result is an ordered set.
pub fn find_wallets(text: &str) -> BTreeSet<String> {
    let mut wallets = BTreeSet::new();
    for shape in WALLET_SHAPES.iter() {
        for candidate in shape.find_iter(text) {
            let candidate = candidate.as_str();
            if checksum_valid(candidate) {
                wallets.insert(candidate.to_string());
            }
        }
    }
    wallets
}

/// Structural validation via the address parser: base58check for legacy
/// shapes, bech32/bech32m for segwit, pinned to mainnet.
fn checksum_valid(candidate: &str) -> bool {
    candidate
        .parse::<Address<NetworkUnchecked>>()
        .map(|addr| addr.is_valid_for_network(Network::Bitcoin))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_valid_legacy_address_in_text() {
        let text = "send donations to 1BoatSLRHtKNngkdXEeobR76b53LETtpyT thanks";
        let wallets = find_wallets(text);
        assert_eq!(wallets.len(), 1);
        assert!(wallets.contains("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"));
    }

    #[test]
    fn rejects_corrupted_checksum() {
        // Same shape as above with the last character flipped
        let wallets = find_wallets("pay 1BoatSLRHtKNngkdXEeobR76b53LETtpyX now");
        assert!(wallets.is_empty());
    }

    #[test]
    fn recognizes_all_four_shapes() {
        let text = "\
            legacy 1BoatSLRHtKNngkdXEeobR76b53LETtpyT \
            script 3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy \
            segwit bc1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3qccfmv3 \
            taproot bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr";
        let wallets = find_wallets(text);
        assert_eq!(wallets.len(), 4);
    }

    #[test]
    fn base58_lookalike_is_not_reported() {
        // Matches the P2PKH shape pattern but is not a real address
        let wallets = find_wallets("1AAAAAAAAAAAAAAAAAAAAAAAAAAAAA is fake");
        assert!(wallets.is_empty());
    }

    #[test]
    fn is_idempotent_and_order_independent() {
        let a = "wallets: 1BoatSLRHtKNngkdXEeobR76b53LETtpyT 3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy";
        let b = "wallets: 3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy 1BoatSLRHtKNngkdXEeobR76b53LETtpyT";
        assert_eq!(find_wallets(a), find_wallets(a));
        assert_eq!(find_wallets(a), find_wallets(b));
    }

    #[test]
    fn empty_text_yields_empty_set() {
        assert!(find_wallets("").is_empty());
        assert!(find_wallets("no wallets here, just prose").is_empty());
    }
}
