//! Well-known public Ethereum chains

/// Chain ids of public networks, which private networks must not reuse
const PUBLIC_CHAINS: &[(u64, &str)] = &[
    (1, "mainnet"),
    (3, "ropsten"),
    (4, "rinkeby"),
    (5, "goerli"),
    (6, "kotti"),
    (42, "kovan"),
    (61, "classic"),
    (63, "mordor"),
    (17000, "holesky"),
    (11155111, "sepolia"),
];

pub const MAINNET: &str = "mainnet";

/// Name of the public network using `chain_id`
pub fn public_chain_name(chain_id: u64) -> Option<&'static str> {
    PUBLIC_CHAINS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| *name)
}
