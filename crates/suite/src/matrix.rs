//! Matrix context: the validated registry and catalog that selectors read.
//!
//! ```
//! use patchmatrix_suite::{MatrixContextBuilder, Suite};
//!
//! let ctx = MatrixContextBuilder::new().build().unwrap();
//! let instances = ctx.select(Suite::AptHead);
//! assert!(!instances.is_empty());
//! ```

use patchmatrix_core::config::PatchMatrixConfig;
use patchmatrix_core::metrics as m;
use patchmatrix_core::types::TestInstance;
use tracing::info;

use crate::catalog::ImageCatalog;
use crate::error::SuiteError;
use crate::expander::{self, Binding};
use crate::script::AgentSettings;
use crate::suite::Suite;
use crate::template::TemplateRegistry;
use crate::validate;

/// Validated generator inputs, built once per process.
#[derive(Debug, Clone)]
pub struct MatrixContext {
    registry: TemplateRegistry,
    catalog: ImageCatalog,
}

impl MatrixContext {
    /// Builds the context described by `config`, loading an external catalog
    /// when one is configured.
    pub async fn from_config(config: &PatchMatrixConfig) -> Result<Self, SuiteError> {
        let agent = AgentSettings::from_config(&config.agent)?;
        let catalog = match config.catalog.external_path() {
            Some(path) => ImageCatalog::load(path).await?,
            None => ImageCatalog::builtin(),
        };
        MatrixContextBuilder::new()
            .agent(agent)
            .catalog(catalog)
            .build()
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    /// Resolves a suite's pairs against the registry and catalog.
    pub fn bindings(&self, suite: Suite) -> Vec<Binding<'_>> {
        suite
            .pairs()
            .iter()
            .map(|(template_id, key)| Binding {
                template_id: *template_id,
                template: self.registry.get(*template_id),
                images: self.catalog.entry(*key),
            })
            .collect()
    }

    /// Expands `suite` into fresh, independent test instances.
    pub fn select(&self, suite: Suite) -> Vec<TestInstance> {
        let instances = expander::expand(&self.bindings(suite));
        metrics::counter!(m::SUITE_SELECTIONS_TOTAL, m::LABEL_SUITE => suite.name()).increment(1);
        info!(suite = %suite, instances = instances.len(), "selected suite");
        instances
    }
}

/// Builder for [`MatrixContext`].
///
/// Defaults to [`AgentSettings::default`] and the built-in catalog.
#[derive(Debug, Default)]
pub struct MatrixContextBuilder {
    agent: Option<AgentSettings>,
    catalog: Option<ImageCatalog>,
}

impl MatrixContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, agent: AgentSettings) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn catalog(mut self, catalog: ImageCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Builds the registry and validates it together with the catalog.
    ///
    /// # Errors
    ///
    /// Agent settings rejected by [`AgentSettings::validate`], or any
    /// template or catalog defect found by [`validate::validate`].
    pub fn build(self) -> Result<MatrixContext, SuiteError> {
        let agent = self.agent.unwrap_or_default();
        agent.validate()?;
        let catalog = self.catalog.unwrap_or_else(ImageCatalog::builtin);
        let registry = TemplateRegistry::build(&agent);

        validate::validate(&registry, &catalog)?;
        info!(
            catalog_sets = catalog.len(),
            images = catalog.image_count(),
            agent_repo = %agent.repo,
            "matrix context ready"
        );

        Ok(MatrixContext { registry, catalog })
    }
}
