//! Batch orchestration: validate the source, fan out one unit per
//! transform, commit results, remove stored variants.

use std::sync::Arc;

use futures::future::join_all;
use indexmap::IndexMap;
use tokio::task::JoinSet;
use vf_core::{Attachment, Error, FieldShape, ProcessorConfig, VariantSet};
use vf_magick::{Dialect, ImageEngine, MagickEngine, ToolRegistry};

use crate::mime::{MagicSniffer, MimeSniffer};
use crate::storage::StorageProvider;
use crate::temp::TempPathAllocator;
use crate::unit::{TransformUnit, UnitContext};

/// Derives, stores, and removes the configured image variants of an
/// attachment.
pub struct VariantProcessor {
    config: ProcessorConfig,
    allocator: TempPathAllocator,
    engine: Arc<dyn ImageEngine>,
    sniffer: Arc<dyn MimeSniffer>,
}

impl VariantProcessor {
    /// Build a processor backed by the GraphicsMagick/ImageMagick tools
    /// found on this machine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the config is invalid or the temp
    /// directory cannot be created.
    pub fn new(config: ProcessorConfig) -> vf_core::Result<Self> {
        let tools = ToolRegistry::discover(&config.tools, Dialect::from_flag(config.image_magick));
        let engine = Arc::new(MagickEngine::new(Arc::new(tools)));
        Self::with_engine(config, engine, Arc::new(MagicSniffer))
    }

    /// Build a processor with explicit engine and sniffer implementations.
    pub fn with_engine(
        config: ProcessorConfig,
        engine: Arc<dyn ImageEngine>,
        sniffer: Arc<dyn MimeSniffer>,
    ) -> vf_core::Result<Self> {
        config.validate()?;
        for warning in config.warnings() {
            tracing::warn!("{warning}");
        }

        let tmp_dir = config.resolved_tmp_dir();
        std::fs::create_dir_all(&tmp_dir).map_err(|e| {
            Error::configuration(format!(
                "failed to create tmp_dir {}: {e}",
                tmp_dir.display()
            ))
        })?;

        Ok(Self {
            allocator: TempPathAllocator::new(tmp_dir),
            config,
            engine,
            sniffer,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Configured transform names, in configuration order.
    pub fn transform_names(&self) -> impl Iterator<Item = &str> {
        self.config.transforms.keys().map(String::as_str)
    }

    /// Produce and store every configured variant of `attachment`.
    ///
    /// Units run concurrently. Each success is written to its record in
    /// `model` as it arrives; the first failure is returned immediately and
    /// records of transforms that had not committed are left untouched.
    /// Units still in flight at that point are detached (or aborted when
    /// `abort_siblings_on_failure` is set); blobs they already stored are
    /// not removed.
    pub async fn process(
        &self,
        attachment: &Attachment,
        storage: Arc<dyn StorageProvider>,
        model: &mut VariantSet,
    ) -> vf_core::Result<()> {
        let info = self.engine.identify(&attachment.path).await.map_err(|e| {
            Error::unsupported(format!("{} could not be identified: {e}", attachment.name))
        })?;

        if !self.config.accepts_format(&info.format) {
            return Err(Error::unsupported(format!(
                "{} is {}; expected one of {}",
                attachment.name,
                info.format,
                self.config.formats.join(", ")
            )));
        }

        tracing::info!(
            "Processing {} ({} {}x{}) into {} variants",
            attachment.name,
            info.format,
            info.width,
            info.height,
            self.config.transforms.len()
        );

        let ctx = Arc::new(UnitContext {
            engine: Arc::clone(&self.engine),
            sniffer: Arc::clone(&self.sniffer),
            storage,
        });

        let mut tasks = JoinSet::new();
        for (name, spec) in &self.config.transforms {
            let mut unit = TransformUnit::new(name, attachment, spec, &self.allocator)
                .with_keep_temp_file(self.config.keep_temp_files);
            let ctx = Arc::clone(&ctx);
            tasks.spawn(async move {
                let result = unit.run(&ctx).await;
                (unit.name().to_string(), result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok((name, result)) => result.map(|record| (name, record)),
                Err(e) => Err(Error::Internal(format!("transform task failed: {e}"))),
            };

            match outcome {
                Ok((name, record)) => {
                    tracing::debug!(transform = %name, "Committed variant");
                    model.commit(&name, record);
                }
                Err(e) => {
                    let in_flight = tasks.len();
                    if self.config.abort_siblings_on_failure {
                        tasks.abort_all();
                    } else {
                        tasks.detach_all();
                    }
                    tracing::error!(
                        "Processing {} failed with {in_flight} transforms still running: {e}",
                        attachment.name
                    );
                    return Err(e);
                }
            }
        }

        tracing::info!("Processed {}", attachment.name);
        Ok(())
    }

    /// Remove every stored variant recorded in `model`.
    ///
    /// Records without a URL are skipped. All removals run to completion;
    /// the first error in configuration order is returned.
    pub async fn remove(
        &self,
        storage: &dyn StorageProvider,
        model: &VariantSet,
    ) -> vf_core::Result<()> {
        let removals = self.config.transforms.keys().filter_map(|name| {
            let record = model.get(name).filter(|r| r.has_url())?;
            Some(async move {
                storage
                    .remove(record)
                    .await
                    .map_err(|e| Error::storage(name, e))
            })
        });

        let mut first_error = None;
        for result in join_all(removals).await {
            if let Err(e) = result {
                if first_error.is_none() {
                    first_error = Some(e);
                } else {
                    tracing::warn!("Ignoring additional removal failure: {e}");
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Whether processing would replace an existing stored variant.
    ///
    /// Only the last configured transform decides: each iteration overwrites
    /// the result instead of OR-ing it.
    pub fn will_overwrite(&self, model: &VariantSet) -> bool {
        let mut result = false;
        for name in self.config.transforms.keys() {
            result = model.has_url(name);
        }
        result
    }

    /// Field shape each transform contributes to the host model's schema.
    pub fn create_field_schema(&self) -> IndexMap<String, FieldShape> {
        self.config
            .transforms
            .keys()
            .map(|name| (name.clone(), FieldShape::image_variant()))
            .collect()
    }
}
