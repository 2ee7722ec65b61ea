mod cli;

use variantforge::{config, Config, LocalStorage};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vf_core::{Attachment, ProcessorConfig, VariantSet};
use vf_magick::{Dialect, ToolRegistry};
use vf_pipeline::VariantProcessor;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "variantforge=trace,vf_pipeline=trace,vf_magick=debug,vf_core=debug".to_string()
        } else {
            "variantforge=info,vf_pipeline=info,vf_magick=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process {
            input,
            name,
            store_dir,
            base_url,
            records,
            json,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let storage = local_storage(&config, store_dir, base_url);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(process_file(
                config,
                storage,
                &input,
                name,
                records.as_deref(),
                json,
            ))
        }
        Commands::Remove {
            records,
            store_dir,
            base_url,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let storage = local_storage(&config, store_dir, base_url);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(remove_variants(config, storage, &records))
        }
        Commands::Schema => print_schema(cli.config.as_deref()),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            validate_config(path.as_deref())
        }
    }
}

fn local_storage(
    config: &Config,
    store_dir: Option<PathBuf>,
    base_url: Option<String>,
) -> LocalStorage {
    LocalStorage::new(
        store_dir.unwrap_or_else(|| config.storage.root.clone()),
        base_url.unwrap_or_else(|| config.storage.base_url.clone()),
    )
}

async fn process_file(
    config: Config,
    storage: LocalStorage,
    input: &Path,
    name: Option<String>,
    records_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let attachment = match name {
        Some(name) => Attachment::new(input, name),
        None => Attachment::from_path(input),
    };

    let processor =
        VariantProcessor::new(config.processor).context("Failed to set up variant processor")?;

    // Records from an earlier run are updated in place.
    let mut model = match records_path {
        Some(path) if path.exists() => read_records(path)?,
        _ => VariantSet::new(),
    };
    if processor.will_overwrite(&model) {
        tracing::warn!("Existing variants will be replaced");
    }

    processor
        .process(&attachment, Arc::new(storage), &mut model)
        .await
        .with_context(|| format!("Failed to process {:?}", input))?;

    if let Some(path) = records_path {
        let content = serde_json::to_string_pretty(&model)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write records to {:?}", path))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        for (name, record) in model.iter() {
            println!(
                "{name}: {} {}x{} {}-bit, {} bytes, {} -> {}",
                record.format.as_deref().unwrap_or("?"),
                record.width.unwrap_or_default(),
                record.height.unwrap_or_default(),
                record.depth.unwrap_or_default(),
                record.size.unwrap_or_default(),
                record.mime_type.as_deref().unwrap_or("?"),
                record.url.as_deref().unwrap_or("-"),
            );
        }
    }

    Ok(())
}

fn read_records(path: &Path) -> Result<VariantSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records file: {:?}", path))
}

async fn remove_variants(config: Config, storage: LocalStorage, records: &Path) -> Result<()> {
    let model = read_records(records)?;

    let processor =
        VariantProcessor::new(config.processor).context("Failed to set up variant processor")?;
    processor
        .remove(&storage, &model)
        .await
        .context("Failed to remove variants")?;

    println!("Removed variants listed in {}", records.display());
    Ok(())
}

fn print_schema(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let processor = VariantProcessor::new(config.processor)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&processor.create_field_schema())?
    );
    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    // Tool discovery doesn't need transforms, so run without a config file.
    let processor = match config::load_config_or_default(config_path) {
        Ok(config) => config.processor,
        Err(e) if config_path.is_none() => {
            tracing::debug!("No usable config, checking default tools: {e:#}");
            ProcessorConfig::default()
        }
        Err(e) => return Err(e),
    };
    let dialect = Dialect::from_flag(processor.image_magick);
    let registry = ToolRegistry::discover(&processor.tools, dialect);

    println!("Dialect: {:?}\n", dialect);
    for info in registry.check_all() {
        if info.available {
            println!(
                "  [OK] {} {}",
                info.name,
                info.version.as_deref().unwrap_or("(unknown version)")
            );
            if let Some(path) = &info.path {
                println!("       {}", path.display());
            }
        } else {
            println!("  [--] {} not found", info.name);
        }
    }

    let ready = registry.convert_command().is_ok() && registry.identify_command().is_ok();
    if ready {
        println!("\nAll required tools are available.");
        Ok(())
    } else {
        anyhow::bail!("Required tools for {:?} are missing", dialect)
    }
}

fn validate_config(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Configuration is valid.");
    println!("  Transforms: {}", config.processor.transforms.len());
    for name in config.processor.transforms.keys() {
        println!("    - {name}");
    }
    println!("  Formats: {}", config.processor.formats.join(", "));
    println!("  Storage: {}", config.storage.root.display());

    let warnings = config.processor.warnings();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in warnings {
            println!("  - {w}");
        }
    }

    Ok(())
}
