//! Compiler pipeline facade
//!
//! `admit` is what an admission layer calls (Default, then Validate);
//! `render` is what a reconciliation pass calls (Resolve, then Render).

use crate::defaults::{Defaulter, DefaultingContext};
use crate::rendering::{RenderedLaunchConfig, StrategyRegistry, Workload};
use crate::shared_kernel::{RenderError, ValidationError};
use crate::validation::Validate;
use tracing::{debug, trace};

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    registry: StrategyRegistry,
    defaults: DefaultingContext,
}

impl Compiler {
    pub fn new(registry: StrategyRegistry, defaults: DefaultingContext) -> Self {
        Self { registry, defaults }
    }

    /// Built-in strategies and the given defaulting context
    pub fn with_defaults(defaults: DefaultingContext) -> Self {
        Self::new(StrategyRegistry::builtin(), defaults)
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn defaults(&self) -> &DefaultingContext {
        &self.defaults
    }

    /// Defaults `spec` and validates it against `old` (present on update)
    pub fn admit<T>(&self, mut spec: T, old: Option<&T>) -> Result<T, ValidationError>
    where
        T: Defaulter + Validate,
    {
        match old {
            Some(old) => spec.apply_update_defaults(&self.defaults, old),
            None => spec.apply_defaults(&self.defaults),
        }
        let errors = spec.validate(old);
        debug!(
            update = old.is_some(),
            errors = errors.len(),
            "Spec defaulted and validated"
        );
        errors.into_result()?;
        Ok(spec)
    }

    pub fn render(&self, workload: &Workload<'_>) -> Result<RenderedLaunchConfig, RenderError> {
        let key = workload.client_key();
        let strategy = self.registry.resolve(key)?;
        trace!(client = %key, "Strategy resolved");
        strategy.render_with_images(workload, &self.defaults.images)
    }
}
