//! Genesis files of private networks, in each client's own format

use super::spec::{Account, Consensus, Forks, Genesis, NetworkSpec};
use serde_json::{Map, Value, json};

pub const GENESIS_FILE: &str = "genesis.json";

/// Client-specific genesis flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenesisFormat {
    Besu,
    Geth,
    Parity,
}

/// Rendered genesis file; `None` for networks joined by name
pub fn render(network: &NetworkSpec, format: GenesisFormat) -> Option<String> {
    let genesis = network.genesis.as_ref()?;
    let network_id = network.id.unwrap_or(genesis.chain_id);
    let value = match format {
        GenesisFormat::Besu | GenesisFormat::Geth => {
            geth_style(genesis, network.consensus, format)
        }
        GenesisFormat::Parity => chainspec(genesis, network.consensus, network_id),
    };
    serde_json::to_string_pretty(&value).ok()
}

/// `extraData` of the genesis block, which seeds the initial signer set
pub fn extra_data(genesis: &Genesis, consensus: Option<Consensus>) -> String {
    match consensus {
        Some(Consensus::Poa) => clique_extra_data(
            genesis
                .clique
                .as_ref()
                .map(|clique| clique.signers.as_slice())
                .unwrap_or_default(),
        ),
        Some(Consensus::Ibft2) => ibft2_extra_data(
            genesis
                .ibft2
                .as_ref()
                .map(|ibft2| ibft2.validators.as_slice())
                .unwrap_or_default(),
        ),
        _ => "0x00".to_string(),
    }
}

/// 32 bytes vanity, signer addresses, 65 bytes of empty seal
pub fn clique_extra_data(signers: &[String]) -> String {
    let mut data = format!("0x{}", "00".repeat(32));
    for signer in signers {
        data.push_str(&strip_hex(signer).to_ascii_lowercase());
    }
    data.push_str(&"00".repeat(65));
    data
}

/// RLP of `[vanity, validators, vote, round, seals]`
pub fn ibft2_extra_data(validators: &[String]) -> String {
    let addresses: Vec<Vec<u8>> = validators
        .iter()
        .filter_map(|address| hex::decode(strip_hex(address)).ok())
        .collect();

    let mut stream = rlp::RlpStream::new_list(5);
    stream.append(&vec![0u8; 32]);
    stream.begin_list(addresses.len());
    for address in &addresses {
        stream.append(address);
    }
    stream.append_empty_data();
    stream.append(&vec![0u8; 4]);
    stream.begin_list(0);

    format!("0x{}", hex::encode(stream.out()))
}

fn strip_hex(value: &str) -> &str {
    value.strip_prefix("0x").unwrap_or(value)
}

fn fork_blocks(forks: &Forks) -> Vec<(&'static str, Option<u64>)> {
    vec![
        ("homesteadBlock", Some(forks.homestead)),
        ("daoForkBlock", forks.dao),
        ("eip150Block", Some(forks.eip150)),
        ("eip155Block", Some(forks.eip155)),
        ("eip158Block", Some(forks.eip158)),
        ("byzantiumBlock", Some(forks.byzantium)),
        ("constantinopleBlock", Some(forks.constantinople)),
        ("petersburgBlock", Some(forks.petersburg)),
        ("istanbulBlock", Some(forks.istanbul)),
        ("muirGlacierBlock", Some(forks.muir_glacier)),
        ("berlinBlock", Some(forks.berlin)),
        ("londonBlock", Some(forks.london)),
    ]
}

fn geth_style(genesis: &Genesis, consensus: Option<Consensus>, format: GenesisFormat) -> Value {
    let mut config = Map::new();
    config.insert("chainId".into(), json!(genesis.chain_id));

    let forks = genesis.forks.clone().unwrap_or_default();
    for (name, block) in fork_blocks(&forks) {
        if let Some(block) = block {
            config.insert(name.into(), json!(block));
        }
    }
    if forks.dao.is_some() {
        config.insert("daoForkSupport".into(), json!(true));
    }

    match (consensus, format) {
        (Some(Consensus::Pow), GenesisFormat::Besu) => {
            let mut ethash = Map::new();
            if let Some(difficulty) = genesis.ethash.as_ref().and_then(|e| e.fixed_difficulty) {
                ethash.insert("fixeddifficulty".into(), json!(difficulty));
            }
            config.insert("ethash".into(), Value::Object(ethash));
        }
        (Some(Consensus::Pow), _) => {
            config.insert("ethash".into(), json!({}));
        }
        (Some(Consensus::Poa), GenesisFormat::Besu) => {
            let clique = genesis.clique.clone().unwrap_or_default();
            config.insert(
                "clique".into(),
                json!({
                    "blockperiodseconds": clique.block_period,
                    "epochlength": clique.epoch_length,
                }),
            );
        }
        (Some(Consensus::Poa), _) => {
            let clique = genesis.clique.clone().unwrap_or_default();
            config.insert(
                "clique".into(),
                json!({
                    "period": clique.block_period,
                    "epoch": clique.epoch_length,
                }),
            );
        }
        (Some(Consensus::Ibft2), _) => {
            let ibft2 = genesis.ibft2.clone().unwrap_or_default();
            config.insert(
                "ibft2".into(),
                json!({
                    "blockperiodseconds": ibft2.block_period,
                    "epochlength": ibft2.epoch_length,
                    "requesttimeoutseconds": ibft2.request_timeout,
                    "messagequeuelimit": ibft2.message_queue_limit,
                    "duplicatemessagelimit": ibft2.duplicate_message_limit,
                    "futuremessageslimit": ibft2.future_messages_limit,
                    "futuremessagesmaxdistance": ibft2.future_messages_max_distance,
                }),
            );
        }
        (None, _) => {}
    }

    json!({
        "config": config,
        "nonce": genesis.nonce,
        "timestamp": genesis.timestamp,
        "gasLimit": genesis.gas_limit,
        "difficulty": genesis.difficulty,
        "mixHash": genesis.mix_hash,
        "coinbase": genesis.coinbase,
        "extraData": extra_data(genesis, consensus),
        "alloc": alloc(&genesis.accounts),
    })
}

fn alloc(accounts: &[Account]) -> Value {
    let mut alloc = Map::new();
    for account in accounts {
        let mut entry = Map::new();
        entry.insert(
            "balance".into(),
            json!(account.balance.as_deref().unwrap_or("0x0")),
        );
        if let Some(code) = &account.code {
            entry.insert("code".into(), json!(code));
        }
        if !account.storage.is_empty() {
            entry.insert("storage".into(), json!(account.storage));
        }
        alloc.insert(account.address.to_ascii_lowercase(), Value::Object(entry));
    }
    Value::Object(alloc)
}

fn hex(value: u64) -> String {
    format!("{value:#x}")
}

/// Parity seals need an 8 bytes nonce
fn seal_nonce(nonce: Option<&str>) -> String {
    let parsed = nonce
        .map(strip_hex)
        .and_then(|digits| u64::from_str_radix(digits, 16).ok())
        .unwrap_or_default();
    format!("0x{parsed:016x}")
}

fn chainspec(genesis: &Genesis, consensus: Option<Consensus>, network_id: u64) -> Value {
    let forks = genesis.forks.clone().unwrap_or_default();

    let engine = match consensus {
        Some(Consensus::Poa) => {
            let clique = genesis.clique.clone().unwrap_or_default();
            json!({
                "clique": {
                    "params": {
                        "period": clique.block_period,
                        "epoch": clique.epoch_length,
                    }
                }
            })
        }
        _ => json!({
            "Ethash": {
                "params": {
                    "minimumDifficulty": "0x20000",
                    "difficultyBoundDivisor": "0x800",
                    "durationLimit": "0xd",
                    "blockReward": "0x1bc16d674ec80000",
                    "homesteadTransition": hex(forks.homestead),
                    "eip100bTransition": hex(forks.byzantium),
                }
            }
        }),
    };

    let mut params = Map::new();
    for (key, value) in [
        ("accountStartNonce", "0x0".to_string()),
        ("chainID", hex(genesis.chain_id)),
        ("networkID", hex(network_id)),
        ("gasLimitBoundDivisor", "0x400".to_string()),
        ("maximumExtraDataSize", "0xffff".to_string()),
        ("minGasLimit", "0x1388".to_string()),
        ("eip150Transition", hex(forks.eip150)),
        ("eip155Transition", hex(forks.eip155)),
        ("eip160Transition", hex(forks.eip158)),
        ("eip161abcTransition", hex(forks.eip158)),
        ("eip161dTransition", hex(forks.eip158)),
        ("eip140Transition", hex(forks.byzantium)),
        ("eip211Transition", hex(forks.byzantium)),
        ("eip214Transition", hex(forks.byzantium)),
        ("eip658Transition", hex(forks.byzantium)),
        ("eip145Transition", hex(forks.constantinople)),
        ("eip1014Transition", hex(forks.constantinople)),
        ("eip1052Transition", hex(forks.constantinople)),
        ("eip1283Transition", hex(forks.constantinople)),
        ("eip1283DisableTransition", hex(forks.petersburg)),
        ("eip1344Transition", hex(forks.istanbul)),
        ("eip1884Transition", hex(forks.istanbul)),
        ("eip2028Transition", hex(forks.istanbul)),
        ("eip2929Transition", hex(forks.berlin)),
        ("eip2930Transition", hex(forks.berlin)),
        ("eip1559Transition", hex(forks.london)),
        ("eip3198Transition", hex(forks.london)),
        ("eip3529Transition", hex(forks.london)),
        ("eip3541Transition", hex(forks.london)),
    ] {
        params.insert(key.into(), json!(value));
    }
    if let Some(dao) = forks.dao {
        params.insert("daoHardforkTransition".into(), json!(hex(dao)));
    }

    json!({
        "name": format!("private-{}", genesis.chain_id),
        "engine": engine,
        "params": params,
        "genesis": {
            "seal": {
                "ethereum": {
                    "nonce": seal_nonce(genesis.nonce.as_deref()),
                    "mixHash": genesis.mix_hash,
                }
            },
            "difficulty": genesis.difficulty,
            "author": genesis.coinbase,
            "timestamp": genesis.timestamp,
            "extraData": extra_data(genesis, consensus),
            "gasLimit": genesis.gas_limit,
        },
        "accounts": alloc(&genesis.accounts),
    })
}
