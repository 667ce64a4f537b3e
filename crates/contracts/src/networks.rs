//! Chain ids of the networks deployments are commonly made to.

pub const MAINNET: u64 = 1;
pub const GNOSIS: u64 = 100;
pub const SEPOLIA: u64 = 11155111;
pub const ARBITRUM_ONE: u64 = 42161;
pub const BASE: u64 = 8453;
pub const POLYGON: u64 = 137;
pub const OPTIMISM: u64 = 10;
/// Local development nodes (Hardhat, Anvil).
pub const HARDHAT: u64 = 31337;

/// Returns the chain id for a well known network name.
pub fn chain_id(name: &str) -> Option<u64> {
    let id = match name.to_ascii_lowercase().as_str() {
        "mainnet" | "ethereum" => MAINNET,
        "gnosis" | "xdai" => GNOSIS,
        "sepolia" => SEPOLIA,
        "arbitrum" | "arbitrum-one" => ARBITRUM_ONE,
        "base" => BASE,
        "polygon" => POLYGON,
        "optimism" => OPTIMISM,
        "hardhat" | "localhost" | "anvil" => HARDHAT,
        _ => return None,
    };
    Some(id)
}

/// Whether the network is a local development node.
pub fn is_local(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "hardhat" | "localhost" | "anvil"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names() {
        assert_eq!(chain_id("sepolia"), Some(SEPOLIA));
        assert_eq!(chain_id("Hardhat"), Some(HARDHAT));
        assert_eq!(chain_id("localhost"), Some(HARDHAT));
        assert_eq!(chain_id("moonbase"), None);
        assert!(is_local("anvil"));
        assert!(!is_local("sepolia"));
    }
}
