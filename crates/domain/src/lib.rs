// Nodesmith - Domain Layer
// Compiles declarative node specs into runnable client configurations.
// - shared_kernel: field paths, field errors, validation and render errors
// - clients / capabilities: client keys and the static capability matrix
// - defaults / validation: Default Resolver and Validator building blocks
// - rendering: launch config model and the client strategy registry
// - compiler: Default -> Validate -> Resolve -> Render pipeline facade
// - ethereum ... polkadot: one module per protocol (spec, defaults, validation, strategies)

pub mod shared_kernel;
pub mod clients;
pub mod verbosity;
pub mod capabilities;
pub mod resources;
pub mod defaults;
pub mod validation;
pub mod rendering;
pub mod compiler;

pub mod ethereum;
pub mod ethereum2;
pub mod bitcoin;
pub mod filecoin;
pub mod ipfs;
pub mod near;
pub mod stacks;
pub mod aptos;
pub mod polkadot;

pub use shared_kernel::*;
pub use clients::*;
pub use verbosity::Verbosity;
pub use capabilities::{ClientCapabilities, Feature, Support, capabilities};
pub use resources::Resources;
pub use defaults::{Defaulter, DefaultingContext, ImageCatalog, ImageKey};
pub use validation::Validate;
pub use rendering::{
    ClientStrategy, ConfigFile, EnvSource, EnvVar, InitStep, RenderedLaunchConfig,
    StrategyRegistry, Workload,
};
pub use compiler::Compiler;
