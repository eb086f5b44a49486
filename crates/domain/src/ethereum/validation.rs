//! Ethereum network validation

use super::chains::public_chain_name;
use super::spec::{Consensus, Genesis, NetworkSpec, Node, SyncMode};
use crate::capabilities::{Feature, check_feature, check_log_level, check_network, not_supported};
use crate::clients::{ClientKey, EthereumClient};
use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use crate::validation::{
    Validate, check_address, check_immutable, check_named_list_growth, check_unique_names,
    is_hex_number,
};

impl Validate for NetworkSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();

        self.validate_network(&mut errors, &spec);
        if let Some(genesis) = &self.genesis {
            validate_genesis(&mut errors, genesis, self.consensus, &spec.child("genesis"));
        }
        self.validate_clients(&mut errors, &spec);
        self.validate_nodes(&mut errors, &spec);

        if let Some(old) = old {
            self.validate_update(&mut errors, old, &spec);
        }

        errors
    }
}

impl NetworkSpec {
    fn validate_network(&self, errors: &mut FieldErrors, spec: &FieldPath) {
        match (&self.join, &self.genesis) {
            (None, None) => errors.push(FieldError::required(
                spec.child("genesis"),
                "must be specified if spec.join is not provided",
            )),
            (Some(_), Some(genesis)) => errors.push(FieldError::forbidden(
                spec.child("genesis"),
                genesis,
                "must be none if spec.join is provided",
            )),
            _ => {}
        }

        match (&self.join, self.consensus) {
            (Some(_), Some(consensus)) => errors.push(FieldError::forbidden(
                spec.child("consensus"),
                consensus,
                "must be none if spec.join is provided",
            )),
            (None, None) => errors.push(FieldError::required(
                spec.child("consensus"),
                "must be specified if spec.join is not provided",
            )),
            _ => {}
        }

        if let (Some(_), Some(id)) = (&self.join, self.id) {
            errors.push(FieldError::forbidden(
                spec.child("id"),
                id,
                "must be none if spec.join is provided",
            ));
        }
    }

    /// Network-level support checks, reported once per distinct client
    fn validate_clients(&self, errors: &mut FieldErrors, spec: &FieldPath) {
        let mut clients: Vec<EthereumClient> = Vec::new();
        for node in &self.nodes {
            if !clients.contains(&node.client()) {
                clients.push(node.client());
            }
        }

        for client in clients {
            let key = ClientKey::Ethereum(client);

            if let Some(join) = &self.join {
                check_network(errors, key, join, spec.child("join"));
            }

            if let Some(consensus) = self.consensus {
                check_feature(
                    errors,
                    key,
                    consensus_feature(consensus),
                    true,
                    spec.child("consensus"),
                    consensus,
                );
            }

            let fixed_difficulty = self
                .genesis
                .as_ref()
                .and_then(|genesis| genesis.ethash.as_ref())
                .and_then(|ethash| ethash.fixed_difficulty);
            if let Some(difficulty) = fixed_difficulty {
                check_feature(
                    errors,
                    key,
                    Feature::FixedDifficulty,
                    true,
                    spec.child("genesis").child("ethash").child("fixedDifficulty"),
                    difficulty,
                );
            }
        }
    }

    fn validate_nodes(&self, errors: &mut FieldErrors, spec: &FieldPath) {
        let nodes = spec.child("nodes");
        check_unique_names(errors, &nodes, "name", self.nodes.iter().map(|n| n.name.as_str()));

        for (i, node) in self.nodes.iter().enumerate() {
            node.validate(errors, self.consensus, &nodes.index(i));
        }
    }

    fn validate_update(&self, errors: &mut FieldErrors, old: &NetworkSpec, spec: &FieldPath) {
        check_immutable(errors, spec.child("join"), &self.join, &old.join);
        check_immutable(errors, spec.child("consensus"), &self.consensus, &old.consensus);
        check_immutable(errors, spec.child("id"), &self.id, &old.id);
        check_immutable(errors, spec.child("genesis"), &self.genesis, &old.genesis);

        let nodes = spec.child("nodes");
        let new_names: Vec<&str> = self.nodes.iter().map(|n| n.name.as_str()).collect();
        let old_names: Vec<&str> = old.nodes.iter().map(|n| n.name.as_str()).collect();
        check_named_list_growth(errors, &nodes, "name", &new_names, &old_names);

        for (i, node) in self.nodes.iter().enumerate() {
            let Some(previous) = old.node(&node.name) else {
                continue;
            };
            let path = nodes.index(i);
            check_immutable(errors, path.child("client"), &node.client(), &previous.client());
            if let (Some(resources), Some(old_resources)) = (&node.resources, &previous.resources) {
                errors.extend(resources.validate_update(old_resources, &path.child("resources")));
            }
        }
    }
}

impl Node {
    fn validate(&self, errors: &mut FieldErrors, consensus: Option<Consensus>, path: &FieldPath) {
        let client = self.client();
        let key = ClientKey::Ethereum(client);

        if self.bootnode && self.node_private_key_secret_name.is_none() {
            errors.push(FieldError::required(
                path.child("nodePrivateKeySecretName"),
                "must provide nodePrivateKeySecretName if bootnode is true",
            ));
        }

        if self.miner && self.coinbase.is_none() {
            errors.push(FieldError::required(
                path.child("coinbase"),
                "must provide coinbase if miner is true",
            ));
        }

        if let Some(coinbase) = &self.coinbase {
            if !self.miner {
                errors.push(FieldError::invalid(
                    path.child("miner"),
                    self.miner,
                    "must be true if coinbase is provided",
                ));
            }
            check_address(errors, path.child("coinbase"), coinbase);
        }

        if self.miner {
            match client {
                EthereumClient::Geth | EthereumClient::Parity if self.import.is_none() => {
                    errors.push(FieldError::required(
                        path.child("import"),
                        "must import coinbase account if miner is true",
                    ));
                }
                EthereumClient::Besu
                    if matches!(consensus, Some(Consensus::Poa | Consensus::Ibft2))
                        && self.node_private_key_secret_name.is_none() =>
                {
                    errors.push(FieldError::required(
                        path.child("nodePrivateKeySecretName"),
                        "must provide nodePrivateKeySecretName if miner is true and consensus is poa or ibft2",
                    ));
                }
                _ => {}
            }
        }

        check_feature(errors, key, Feature::GraphQl, self.graphql, path.child("graphql"), self.graphql);
        if client == EthereumClient::Geth && self.graphql && !self.rpc {
            errors.push(FieldError::invalid(
                path.child("rpc"),
                self.rpc,
                "must be true if graphql is enabled in geth client",
            ));
        }

        if let Some(mode) = self.sync_mode {
            if !crate::capabilities::capabilities(key).supports(sync_feature(mode)) {
                errors.push(not_supported(key, path.child("syncMode"), mode));
            }
        }

        check_log_level(errors, key, self.logging, path.child("logging"));

        if let Some(resources) = &self.resources {
            errors.extend(resources.validate(&path.child("resources")));
        }
    }
}

fn validate_genesis(
    errors: &mut FieldErrors,
    genesis: &Genesis,
    consensus: Option<Consensus>,
    path: &FieldPath,
) {
    if let Some(name) = public_chain_name(genesis.chain_id) {
        errors.push(FieldError::invalid(
            path.child("chainId"),
            genesis.chain_id,
            format!("can't use chain id of {name} network to avoid tx replay"),
        ));
    }

    if let Some(coinbase) = &genesis.coinbase {
        check_address(errors, path.child("coinbase"), coinbase);
    }

    let hex_fields = [
        ("difficulty", &genesis.difficulty),
        ("gasLimit", &genesis.gas_limit),
        ("nonce", &genesis.nonce),
        ("timestamp", &genesis.timestamp),
    ];
    for (name, value) in hex_fields {
        if let Some(value) = value {
            if !is_hex_number(value) {
                errors.push(FieldError::invalid(
                    path.child(name),
                    value,
                    "must be a 0x prefixed hex number",
                ));
            }
        }
    }

    if let Some(mix_hash) = &genesis.mix_hash {
        let valid = mix_hash
            .strip_prefix("0x")
            .is_some_and(|hex| hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()));
        if !valid {
            errors.push(FieldError::invalid(
                path.child("mixHash"),
                mix_hash,
                "must be a 0x prefixed 32 bytes hash",
            ));
        }
    }

    for (i, account) in genesis.accounts.iter().enumerate() {
        check_address(errors, path.child("accounts").index(i).child("address"), &account.address);
    }

    check_consensus_entity(errors, path, "ethash", genesis.ethash.as_ref(), Consensus::Pow, consensus);
    check_consensus_entity(errors, path, "clique", genesis.clique.as_ref(), Consensus::Poa, consensus);
    check_consensus_entity(errors, path, "ibft2", genesis.ibft2.as_ref(), Consensus::Ibft2, consensus);

    if let Some(clique) = &genesis.clique {
        check_signers(errors, &path.child("clique").child("signers"), &clique.signers, "signer");
    }
    if let Some(ibft2) = &genesis.ibft2 {
        check_signers(errors, &path.child("ibft2").child("validators"), &ibft2.validators, "validator");
    }

    if let Some(forks) = &genesis.forks {
        let forks_path = path.child("forks");
        let mut previous: Option<(&str, u64)> = None;
        for (name, block) in forks.in_order() {
            let Some(block) = block else {
                continue;
            };
            if let Some((previous_name, previous_block)) = previous {
                if block < previous_block {
                    errors.push(FieldError::invalid(
                        forks_path.child(name),
                        block,
                        format!(
                            "Fork {name} can't be activated (at block {block}) before fork {previous_name} (at block {previous_block})"
                        ),
                    ));
                }
            }
            previous = Some((name, block));
        }
    }
}

fn check_consensus_entity<T: serde::Serialize>(
    errors: &mut FieldErrors,
    genesis: &FieldPath,
    name: &str,
    entity: Option<&T>,
    expected: Consensus,
    consensus: Option<Consensus>,
) {
    if let Some(entity) = entity {
        if consensus != Some(expected) {
            errors.push(FieldError::forbidden(
                genesis.child(name),
                entity,
                format!("must be none if consensus is not {expected}"),
            ));
        }
    }
}

fn check_signers(errors: &mut FieldErrors, path: &FieldPath, signers: &[String], what: &str) {
    if signers.is_empty() {
        errors.push(FieldError::required(
            path.clone(),
            format!("must contain at least one {what}"),
        ));
    }
    for (i, signer) in signers.iter().enumerate() {
        check_address(errors, path.index(i), signer);
    }
}

fn consensus_feature(consensus: Consensus) -> Feature {
    match consensus {
        Consensus::Pow => Feature::ProofOfWork,
        Consensus::Poa => Feature::ProofOfAuthority,
        Consensus::Ibft2 => Feature::IstanbulBft,
    }
}

fn sync_feature(mode: SyncMode) -> Feature {
    match mode {
        SyncMode::Fast => Feature::FastSync,
        SyncMode::Full => Feature::FullSync,
        SyncMode::Light => Feature::LightSync,
        SyncMode::Snap => Feature::SnapSync,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{DefaultingContext, defaulted};
    use crate::ethereum::spec::{Clique, Forks, ImportedAccount};

    const SIGNER: &str = "0xd2c21213027cbf4d46c16b55fa98e5252b048706";

    fn private(consensus: Consensus) -> NetworkSpec {
        NetworkSpec {
            consensus: Some(consensus),
            genesis: Some(Genesis {
                chain_id: 55555,
                ..Default::default()
            }),
            nodes: vec![Node::named("node-1")],
            ..Default::default()
        }
    }

    #[test]
    fn test_join_and_genesis_are_exclusive() {
        let spec = NetworkSpec {
            join: Some("goerli".to_string()),
            consensus: Some(Consensus::Poa),
            id: Some(7),
            genesis: Some(Genesis {
                chain_id: 7777,
                ..Default::default()
            }),
            ..Default::default()
        };
        let errors = spec.validate(None);

        assert_eq!(errors.len(), 3);
        assert!(errors.contains("spec.genesis", "must be none if spec.join is provided"));
        assert!(errors.contains("spec.consensus", "must be none if spec.join is provided"));
        assert!(errors.contains("spec.id", "must be none if spec.join is provided"));
    }

    #[test]
    fn test_public_chain_id_is_rejected() {
        let mut spec = private(Consensus::Pow);
        spec.genesis.as_mut().unwrap().chain_id = 4;

        let errors = spec.validate(None);
        assert!(errors.contains("spec.genesis.chainId", "chain id of rinkeby network"));
    }

    #[test]
    fn test_consensus_entity_must_match_consensus() {
        let mut spec = private(Consensus::Pow);
        spec.genesis.as_mut().unwrap().clique = Some(Clique {
            signers: vec![SIGNER.to_string()],
            ..Default::default()
        });

        let errors = spec.validate(None);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("spec.genesis.clique", "must be none if consensus is not poa"));
    }

    #[test]
    fn test_fork_order_is_enforced() {
        let mut spec = private(Consensus::Pow);
        spec.genesis.as_mut().unwrap().forks = Some(Forks {
            homestead: 10,
            eip150: 5,
            eip155: 10,
            eip158: 10,
            byzantium: 10,
            constantinople: 10,
            petersburg: 10,
            istanbul: 10,
            muir_glacier: 10,
            berlin: 10,
            london: 10,
            dao: None,
        });

        let errors = spec.validate(None);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(
            "spec.genesis.forks.eip150",
            "Fork eip150 can't be activated (at block 5) before fork homestead (at block 10)"
        ));
    }

    #[test]
    fn test_miner_rules() {
        let mut spec = private(Consensus::Poa);
        spec.genesis.as_mut().unwrap().clique = Some(Clique {
            signers: vec![SIGNER.to_string()],
            ..Default::default()
        });
        spec.nodes = vec![
            Node {
                miner: true,
                ..Node::named("besu-miner")
            },
            Node {
                coinbase: Some(SIGNER.to_string()),
                ..Node::named("not-a-miner")
            },
            Node {
                client: Some(EthereumClient::Geth),
                miner: true,
                coinbase: Some(SIGNER.to_string()),
                ..Node::named("geth-miner")
            },
        ];
        let spec = defaulted(spec, &DefaultingContext::default());
        let errors = spec.validate(None);

        assert!(errors.contains("spec.nodes[0].coinbase", "must provide coinbase if miner is true"));
        assert!(errors.contains("spec.nodes[0].nodePrivateKeySecretName", "miner is true"));
        assert!(errors.contains("spec.nodes[1].miner", "must be true if coinbase is provided"));
        assert!(errors.contains("spec.nodes[2].import", "must import coinbase account"));
        assert_eq!(errors.len(), 4, "{errors:?}");
    }

    #[test]
    fn test_geth_miner_with_import_is_valid() {
        let mut spec = private(Consensus::Poa);
        spec.genesis.as_mut().unwrap().clique = Some(Clique {
            signers: vec![SIGNER.to_string()],
            ..Default::default()
        });
        spec.nodes = vec![Node {
            client: Some(EthereumClient::Geth),
            miner: true,
            coinbase: Some(SIGNER.to_string()),
            import: Some(ImportedAccount {
                private_key_secret_name: "signer-key".to_string(),
                password_secret_name: "signer-password".to_string(),
            }),
            ..Node::named("geth-signer")
        }];
        let spec = defaulted(spec, &DefaultingContext::default());
        let errors = spec.validate(None);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_geth_graphql_requires_rpc() {
        let spec = NetworkSpec {
            join: Some("goerli".to_string()),
            nodes: vec![Node {
                client: Some(EthereumClient::Geth),
                graphql: true,
                ..Node::named("node-1")
            }],
            ..Default::default()
        };
        let errors = spec.validate(None);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("spec.nodes[0].rpc", "graphql is enabled in geth client"));
    }

    #[test]
    fn test_parity_graphql_is_not_supported() {
        let spec = NetworkSpec {
            join: Some("goerli".to_string()),
            nodes: vec![Node {
                client: Some(EthereumClient::Parity),
                graphql: true,
                ..Node::named("node-1")
            }],
            ..Default::default()
        };
        let errors = spec.validate(None);
        assert!(errors.contains("spec.nodes[0].graphql", "not supported by parity client"));
    }

    #[test]
    fn test_network_level_errors_reported_once_per_client() {
        let spec = NetworkSpec {
            join: Some("kovan".to_string()),
            nodes: vec![
                Node {
                    client: Some(EthereumClient::Geth),
                    ..Node::named("a")
                },
                Node {
                    client: Some(EthereumClient::Geth),
                    ..Node::named("b")
                },
                Node::named("c"),
            ],
            ..Default::default()
        };
        let errors = spec.validate(None);

        assert_eq!(errors.len(), 2);
        assert!(errors.contains("spec.join", "not supported by geth client"));
        assert!(errors.contains("spec.join", "not supported by besu client"));
    }

    #[test]
    fn test_node_client_is_immutable() {
        let old = NetworkSpec {
            join: Some("goerli".to_string()),
            nodes: vec![Node::named("node-1")],
            ..Default::default()
        };
        let mut new = old.clone();
        new.nodes[0].client = Some(EthereumClient::Geth);

        let errors = new.validate(Some(&old));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("spec.nodes[0].client", "immutable"));
    }
}
