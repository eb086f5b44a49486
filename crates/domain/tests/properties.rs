//! Pipeline properties checked across every protocol
//!
//! Defaulting is idempotent and never overwrites, toggles gate their
//! dependent defaults, the capability matrix drives validation, and every
//! admitted spec renders.

use nodesmith_domain::{
    aptos, bitcoin, ethereum, ethereum2, filecoin, ipfs, near, polkadot, stacks,
};
use nodesmith_domain::{
    ClientKey, Compiler, DefaultingContext, Defaulter, Eth2Client, EthereumClient, Feature,
    RenderError, RenderedLaunchConfig, StrategyRegistry, Support, Validate, Workload,
    capabilities,
};
use rstest::{fixture, rstest};
use std::fmt::Debug;

// ═══════════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

#[fixture]
fn ctx() -> DefaultingContext {
    DefaultingContext::default()
}

fn defaulted<T: Defaulter>(mut spec: T, ctx: &DefaultingContext) -> T {
    spec.apply_defaults(ctx);
    spec
}

fn assert_idempotent<T>(spec: T, ctx: &DefaultingContext)
where
    T: Defaulter + Clone + PartialEq + Debug,
{
    let once = defaulted(spec, ctx);
    let twice = defaulted(once.clone(), ctx);
    assert_eq!(once, twice);
}

fn ethereum_network(client: EthereumClient) -> ethereum::NetworkSpec {
    ethereum::NetworkSpec {
        join: Some("goerli".to_string()),
        nodes: vec![ethereum::Node {
            client: Some(client),
            rpc: true,
            ws: client != EthereumClient::Parity,
            ..ethereum::Node::named("node-1")
        }],
        ..Default::default()
    }
}

fn beacon_node(client: Eth2Client) -> ethereum2::BeaconNodeSpec {
    ethereum2::BeaconNodeSpec {
        client,
        network: "goerli".to_string(),
        eth1_endpoints: vec!["http://geth:8545".to_string()],
        rest: matches!(client, Eth2Client::Teku | Eth2Client::Lighthouse),
        ..Default::default()
    }
}

fn validator(client: Eth2Client) -> ethereum2::ValidatorSpec {
    ethereum2::ValidatorSpec {
        client,
        network: "goerli".to_string(),
        beacon_endpoints: vec!["http://beacon:5052".to_string()],
        keystores: vec![ethereum2::Keystore {
            secret_name: "validator-1".to_string(),
            public_key: Some("0x8ab7a5c1c3a4e2b9".to_string()),
        }],
        wallet_password_secret: (client == Eth2Client::Prysm)
            .then(|| "wallet-password".to_string()),
        ..Default::default()
    }
}

fn cluster_peer() -> ipfs::ClusterPeerSpec {
    ipfs::ClusterPeerSpec {
        cluster_secret_name: "cluster-secret".to_string(),
        peer_endpoint: "/dns4/kubo/tcp/5001".to_string(),
        ..Default::default()
    }
}

fn stacks_node() -> stacks::NodeSpec {
    stacks::NodeSpec {
        rpc: true,
        bitcoin_node: stacks::BitcoinNode {
            endpoint: "bitcoind".to_string(),
            rpc_username: "stacks".to_string(),
            rpc_password_secret_name: "bitcoin-rpc".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEFAULTING
// ═══════════════════════════════════════════════════════════════════════════════

#[rstest]
fn test_defaulting_is_idempotent(ctx: DefaultingContext) {
    for client in [EthereumClient::Besu, EthereumClient::Geth, EthereumClient::Parity] {
        assert_idempotent(ethereum_network(client), &ctx);
    }
    assert_idempotent(
        ethereum::NetworkSpec {
            consensus: Some(ethereum::Consensus::Ibft2),
            genesis: Some(ethereum::Genesis {
                chain_id: 2024,
                ..Default::default()
            }),
            nodes: vec![ethereum::Node::named("validator-1")],
            ..Default::default()
        },
        &ctx,
    );
    for client in [Eth2Client::Teku, Eth2Client::Prysm, Eth2Client::Lighthouse, Eth2Client::Nimbus] {
        assert_idempotent(beacon_node(client), &ctx);
        assert_idempotent(validator(client), &ctx);
    }
    assert_idempotent(bitcoin::NodeSpec { rpc: true, ..Default::default() }, &ctx);
    assert_idempotent(filecoin::NodeSpec { api: true, ..Default::default() }, &ctx);
    assert_idempotent(ipfs::PeerSpec::default(), &ctx);
    assert_idempotent(cluster_peer(), &ctx);
    assert_idempotent(near::NodeSpec { rpc: true, ..Default::default() }, &ctx);
    assert_idempotent(stacks_node(), &ctx);
    assert_idempotent(aptos::NodeSpec::default(), &ctx);
    assert_idempotent(
        polkadot::NodeSpec {
            rpc: true,
            ws: true,
            telemetry: true,
            prometheus: true,
            ..Default::default()
        },
        &ctx,
    );
}

#[rstest]
fn test_defaulting_never_overwrites_set_fields(ctx: DefaultingContext) {
    let mut network = ethereum_network(EthereumClient::Geth);
    network.topology_key = Some("kubernetes.io/hostname".to_string());
    let node = &mut network.nodes[0];
    node.p2p_port = Some(40404);
    node.rpc_port = Some(18545);
    node.rpc_api = Some(vec![ethereum::Api::Eth]);
    node.sync_mode = Some(ethereum::SyncMode::Snap);
    node.image = Some("ethereum/client-go:custom".to_string());

    let network = defaulted(network, &ctx);
    let node = &network.nodes[0];
    assert_eq!(network.topology_key.as_deref(), Some("kubernetes.io/hostname"));
    assert_eq!(node.p2p_port, Some(40404));
    assert_eq!(node.rpc_port, Some(18545));
    assert_eq!(node.rpc_api, Some(vec![ethereum::Api::Eth]));
    assert_eq!(node.sync_mode, Some(ethereum::SyncMode::Snap));
    assert_eq!(node.image.as_deref(), Some("ethereum/client-go:custom"));

    let beacon = defaulted(
        ethereum2::BeaconNodeSpec {
            rest_port: Some(6000),
            hosts: Some(vec!["beacon.local".to_string()]),
            ..beacon_node(Eth2Client::Teku)
        },
        &ctx,
    );
    assert_eq!(beacon.rest_port, Some(6000));
    assert_eq!(beacon.hosts, Some(vec!["beacon.local".to_string()]));

    let bitcoin = defaulted(
        bitcoin::NodeSpec {
            rpc: true,
            rpc_port: Some(9332),
            max_connections: Some(8),
            ..Default::default()
        },
        &ctx,
    );
    assert_eq!(bitcoin.rpc_port, Some(9332));
    assert_eq!(bitcoin.max_connections, Some(8));

    let polkadot = defaulted(
        polkadot::NodeSpec {
            validator: true,
            pruning: Some(true),
            ..Default::default()
        },
        &ctx,
    );
    assert_eq!(polkadot.pruning, Some(true));
}

#[rstest]
fn test_disabled_toggles_leave_dependent_fields_unset(ctx: DefaultingContext) {
    let network = defaulted(
        ethereum::NetworkSpec {
            join: Some("mainnet".to_string()),
            nodes: vec![ethereum::Node::named("node-1")],
            ..Default::default()
        },
        &ctx,
    );
    let node = &network.nodes[0];
    assert!(node.rpc_host.is_none() && node.rpc_port.is_none() && node.rpc_api.is_none());
    assert!(node.ws_host.is_none() && node.ws_port.is_none() && node.ws_api.is_none());
    assert!(node.graphql_host.is_none() && node.graphql_port.is_none());
    assert!(node.hosts.is_none() && node.cors_domains.is_none());

    let beacon = defaulted(
        ethereum2::BeaconNodeSpec {
            network: "mainnet".to_string(),
            ..Default::default()
        },
        &ctx,
    );
    assert!(beacon.rest_host.is_none() && beacon.rest_port.is_none());
    assert!(beacon.rpc_host.is_none() && beacon.rpc_port.is_none());
    assert!(beacon.grpc_host.is_none() && beacon.grpc_port.is_none());
    assert!(beacon.hosts.is_none() && beacon.cors_domains.is_none());

    let bitcoin = defaulted(bitcoin::NodeSpec::default(), &ctx);
    assert!(bitcoin.rpc_host.is_none() && bitcoin.rpc_port.is_none());

    let filecoin = defaulted(filecoin::NodeSpec::default(), &ctx);
    assert!(filecoin.api_host.is_none() && filecoin.api_port.is_none());

    let near = defaulted(near::NodeSpec::default(), &ctx);
    assert!(near.rpc_host.is_none() && near.rpc_port.is_none());

    let polkadot = defaulted(polkadot::NodeSpec::default(), &ctx);
    assert!(polkadot.rpc_port.is_none() && polkadot.ws_port.is_none());
    assert!(polkadot.cors_domains.is_none());
    assert!(polkadot.telemetry_url.is_none() && polkadot.prometheus_port.is_none());
}

// ═══════════════════════════════════════════════════════════════════════════════
// CAPABILITY GATING
// ═══════════════════════════════════════════════════════════════════════════════

#[rstest]
#[case(Feature::Rest, "spec.rest")]
#[case(Feature::Rpc, "spec.rpc")]
#[case(Feature::Grpc, "spec.grpc")]
fn test_beacon_node_toggles_follow_the_matrix(#[case] feature: Feature, #[case] path: &str) {
    for client in [Eth2Client::Teku, Eth2Client::Prysm, Eth2Client::Lighthouse, Eth2Client::Nimbus] {
        let key = ClientKey::BeaconNode(client);
        let support = capabilities(key).support(feature);
        let enabled = support == Support::Unsupported;

        let mut spec = ethereum2::BeaconNodeSpec {
            client,
            network: "mainnet".to_string(),
            ..Default::default()
        };
        // switch every mandatory feature on, then flip the one under test
        spec.rpc = capabilities(key).is_mandatory(Feature::Rpc);
        match feature {
            Feature::Rest => spec.rest = enabled,
            Feature::Rpc => spec.rpc = enabled,
            Feature::Grpc => spec.grpc = enabled,
            _ => unreachable!(),
        }

        let errors = spec.validate(None);
        match support {
            Support::Unsupported => {
                assert!(errors.contains(path, &format!("not supported by {} client", key.variant())));
            }
            Support::Mandatory => {
                assert!(errors.contains(path, &format!("can't be disabled in {} client", key.variant())));
            }
            Support::Optional => assert!(errors.is_empty(), "{key}: {errors:?}"),
        }
    }
}

#[rstest]
#[case(EthereumClient::Besu)]
#[case(EthereumClient::Geth)]
#[case(EthereumClient::Parity)]
fn test_ethereum_graphql_follows_the_matrix(#[case] client: EthereumClient) {
    let key = ClientKey::Ethereum(client);
    let spec = ethereum::NetworkSpec {
        join: Some("mainnet".to_string()),
        nodes: vec![ethereum::Node {
            client: Some(client),
            graphql: true,
            rpc: true,
            ..ethereum::Node::named("node-1")
        }],
        ..Default::default()
    };

    let errors = spec.validate(None);
    let rejected = errors.contains("spec.nodes[0].graphql", key.variant());
    assert_eq!(rejected, !capabilities(key).supports(Feature::GraphQl));
}

#[rstest]
#[case(ethereum::Consensus::Pow, Feature::ProofOfWork)]
#[case(ethereum::Consensus::Poa, Feature::ProofOfAuthority)]
#[case(ethereum::Consensus::Ibft2, Feature::IstanbulBft)]
fn test_consensus_follows_the_matrix(
    #[case] consensus: ethereum::Consensus,
    #[case] feature: Feature,
) {
    for client in [EthereumClient::Besu, EthereumClient::Geth, EthereumClient::Parity] {
        let key = ClientKey::Ethereum(client);
        let spec = ethereum::NetworkSpec {
            consensus: Some(consensus),
            genesis: Some(ethereum::Genesis {
                chain_id: 4242,
                ..Default::default()
            }),
            nodes: vec![ethereum::Node {
                client: Some(client),
                ..ethereum::Node::named("node-1")
            }],
            ..Default::default()
        };

        let errors = spec.validate(None);
        let rejected = errors.contains("spec.consensus", &format!("not supported by {} client", key.variant()));
        assert_eq!(rejected, !capabilities(key).supports(feature), "{key} {consensus}");
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IMMUTABILITY
// ═══════════════════════════════════════════════════════════════════════════════

#[rstest]
fn test_immutable_fields_only_fail_when_changed() {
    let old = beacon_node(Eth2Client::Teku);
    let same = ethereum2::BeaconNodeSpec {
        rest: false,
        ..old.clone()
    };
    assert!(same.validate(Some(&old)).is_empty());

    let moved = ethereum2::BeaconNodeSpec {
        network: "mainnet".to_string(),
        ..old.clone()
    };
    assert!(moved.validate(Some(&old)).contains("spec.network", "field is immutable"));

    let old = bitcoin::NodeSpec::default();
    let moved = bitcoin::NodeSpec {
        network: bitcoin::BitcoinNetwork::Testnet,
        ..Default::default()
    };
    assert!(moved.validate(Some(&old)).contains("spec.network", "field is immutable"));
    assert!(old.validate(Some(&old)).is_empty());

    let old = polkadot::NodeSpec::default();
    let moved = polkadot::NodeSpec {
        network: polkadot::PolkadotNetwork::Kusama,
        ..Default::default()
    };
    assert!(moved.validate(Some(&old)).contains("spec.network", "field is immutable"));
}

#[rstest]
fn test_private_network_identity_is_immutable(ctx: DefaultingContext) {
    let old = defaulted(
        ethereum::NetworkSpec {
            consensus: Some(ethereum::Consensus::Poa),
            genesis: Some(ethereum::Genesis {
                chain_id: 4242,
                clique: Some(ethereum::Clique {
                    signers: vec!["0x8b7f2d2d9e7e38cbd4c6a0ee9dc5eee6c1d1a0f1".to_string()],
                    ..Default::default()
                }),
                ..Default::default()
            }),
            nodes: vec![ethereum::Node::named("node-1")],
            ..Default::default()
        },
        &ctx,
    );

    let mut new = old.clone();
    new.consensus = Some(ethereum::Consensus::Ibft2);
    if let Some(genesis) = new.genesis.as_mut() {
        genesis.chain_id = 4343;
    }

    let errors = new.validate(Some(&old));
    assert!(errors.contains("spec.consensus", "field is immutable"));
    assert!(errors.contains("spec.genesis", "field is immutable"));
    assert!(old.validate(Some(&old)).is_empty());
}

#[rstest]
fn test_renamed_node_beyond_growth_allowance(ctx: DefaultingContext) {
    let old = defaulted(ethereum_network(EthereumClient::Besu), &ctx);

    let mut renamed = old.clone();
    renamed.nodes[0].name = "node-2".to_string();
    assert!(renamed.validate(Some(&old)).contains("spec.nodes[0].name", "field is immutable"));

    let mut grown = old.clone();
    grown.nodes.push(ethereum::Node {
        name: "node-2".to_string(),
        ..old.nodes[0].clone()
    });
    assert!(grown.validate(Some(&old)).is_empty());
}

fn compiler_with_storage_class(class: &str) -> Compiler {
    Compiler::with_defaults(DefaultingContext {
        storage_class: Some(class.to_string()),
        ..Default::default()
    })
}

fn storage_class(resources: Option<&nodesmith_domain::Resources>) -> Option<&str> {
    resources.and_then(|r| r.storage_class.as_deref())
}

#[rstest]
fn test_storage_class_configured_after_admission_keeps_updates_valid() {
    let old = Compiler::default()
        .admit(bitcoin::NodeSpec::default(), None)
        .unwrap();
    assert_eq!(storage_class(old.resources.as_ref()), None);

    let updated = compiler_with_storage_class("fast-ssd")
        .admit(bitcoin::NodeSpec::default(), Some(&old))
        .unwrap();

    assert_eq!(storage_class(updated.resources.as_ref()), None);
    assert_eq!(updated, old);
}

#[rstest]
fn test_update_keeps_admitted_storage_class() {
    let old = compiler_with_storage_class("standard")
        .admit(near::NodeSpec::default(), None)
        .unwrap();
    let compiler = compiler_with_storage_class("fast-ssd");

    let updated = compiler.admit(near::NodeSpec::default(), Some(&old)).unwrap();
    assert_eq!(storage_class(updated.resources.as_ref()), Some("standard"));

    let explicit = near::NodeSpec {
        resources: Some(nodesmith_domain::Resources {
            storage_class: Some("fast-ssd".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let rejection = compiler.admit(explicit, Some(&old)).unwrap_err();
    assert_eq!(rejection.errors.len(), 1);
    assert_eq!(rejection.errors[0].path.as_str(), "spec.resources.storageClass");
    assert_eq!(rejection.errors[0].message, "field is immutable");
}

#[rstest]
fn test_added_network_node_gets_configured_storage_class() {
    let old = Compiler::default()
        .admit(ethereum_network(EthereumClient::Geth), None)
        .unwrap();

    let mut grown = ethereum_network(EthereumClient::Geth);
    grown.nodes.push(ethereum::Node {
        client: Some(EthereumClient::Geth),
        ..ethereum::Node::named("node-2")
    });
    let updated = compiler_with_storage_class("fast-ssd")
        .admit(grown, Some(&old))
        .unwrap();

    assert_eq!(storage_class(updated.nodes[0].resources.as_ref()), None);
    assert_eq!(storage_class(updated.nodes[1].resources.as_ref()), Some("fast-ssd"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// RENDERING
// ═══════════════════════════════════════════════════════════════════════════════

/// Admits a spec that is valid for `key` and renders it
fn admit_and_render(compiler: &Compiler, key: ClientKey) -> Result<RenderedLaunchConfig, RenderError> {
    macro_rules! admitted {
        ($spec:expr) => {
            compiler
                .admit($spec, None)
                .unwrap_or_else(|err| panic!("{key} spec rejected: {err}"))
        };
    }

    match key {
        ClientKey::Ethereum(client) => {
            let spec = admitted!(ethereum_network(client));
            compiler.render(&Workload::Ethereum {
                network: &spec,
                node: &spec.nodes[0],
            })
        }
        ClientKey::BeaconNode(client) => compiler.render(&Workload::BeaconNode(&admitted!(beacon_node(client)))),
        ClientKey::Validator(client) => compiler.render(&Workload::Validator(&admitted!(validator(client)))),
        ClientKey::Bitcoin => compiler.render(&Workload::Bitcoin(&admitted!(bitcoin::NodeSpec {
            rpc: true,
            ..Default::default()
        }))),
        ClientKey::Filecoin => compiler.render(&Workload::Filecoin(&admitted!(filecoin::NodeSpec {
            api: true,
            ..Default::default()
        }))),
        ClientKey::IpfsPeer => compiler.render(&Workload::IpfsPeer(&admitted!(ipfs::PeerSpec::default()))),
        ClientKey::IpfsClusterPeer => compiler.render(&Workload::IpfsClusterPeer(&admitted!(cluster_peer()))),
        ClientKey::Near => compiler.render(&Workload::Near(&admitted!(near::NodeSpec {
            rpc: true,
            ..Default::default()
        }))),
        ClientKey::Stacks => compiler.render(&Workload::Stacks(&admitted!(stacks_node()))),
        ClientKey::Aptos => compiler.render(&Workload::Aptos(&admitted!(aptos::NodeSpec::default()))),
        ClientKey::Polkadot => compiler.render(&Workload::Polkadot(&admitted!(polkadot::NodeSpec {
            rpc: true,
            ws: true,
            ..Default::default()
        }))),
    }
}

#[rstest]
fn test_every_admitted_spec_renders() {
    let compiler = Compiler::default();

    for key in ClientKey::ALL {
        let config = admit_and_render(&compiler, key)
            .unwrap_or_else(|err| panic!("{key} failed to render: {err}"));

        assert!(!config.image.is_empty(), "{key} has no image");
        assert!(!config.command.is_empty(), "{key} has no command");
        assert!(!config.home_dir.is_empty(), "{key} has no home dir");
        assert!(
            config.args.iter().all(|arg| !arg.is_empty() && !arg.ends_with('=')),
            "{key} rendered a malformed argument: {:?}",
            config.args
        );
    }
}

#[rstest]
fn test_rendering_is_deterministic() {
    let compiler = Compiler::default();
    for key in ClientKey::ALL {
        let first = admit_and_render(&compiler, key).unwrap();
        let second = admit_and_render(&compiler, key).unwrap();
        assert_eq!(first, second, "{key} rendered differently twice");
    }
}

#[rstest]
fn test_empty_registry_reports_unsupported_variant(ctx: DefaultingContext) {
    let compiler = Compiler::new(StrategyRegistry::empty(), ctx);

    for key in ClientKey::ALL {
        let err = admit_and_render(&compiler, key).unwrap_err();
        assert_eq!(err, RenderError::unsupported(key));
        assert!(err.to_string().contains(key.variant()));
    }
}
