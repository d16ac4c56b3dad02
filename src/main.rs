//! Cache Config - assemble cache configurations and export them.
//!
//! A draft cache configuration is built from optional features (indexing,
//! transactions, security, ...) and individual settings, then rendered as
//! JSON, YAML or indented XML for preview or download.
//!
//! QUICK START:
//!   cache-config features                                  # Known features
//!   cache-config -f json render --feature indexing         # Render a draft
//!   cache-config render --set memory.max-count=5000 --save # Save to exports dir
//!   cache-config schemas schemas.txt                       # User schemas only
//!   cache-config language yaml                             # Viewer language

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    colorize_schema, format_catalog_table, format_draft_summary, format_schema_table,
    ConfigurationStore, Exporter,
};
use cli::{Cli, Commands};
use domain::{
    filter_schemas, to_display_language, AppConfig, DraftMetadata, ExportFormat, SettingAssignment,
};
use infrastructure::{
    config_file_path, ensure_config_exists, load_config, read_draft_file, read_schema_names,
    write_export,
};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let requested_format = cli.requested_format();
    let config_path = cli.config;
    let load = || load_config(config_path.as_deref());

    match cli.command {
        Commands::Render {
            draft,
            name,
            template,
            container,
            features,
            without,
            settings,
            output,
            save,
            summary,
        } => {
            let config = load()?;
            let format = requested_format.unwrap_or(config.export.default_format);
            let request = RenderRequest {
                draft,
                metadata: DraftMetadata {
                    cache_name: name,
                    template,
                    container,
                },
                features,
                without,
                settings,
            };
            let destination = if save {
                Destination::ExportsDir
            } else {
                output.map_or(Destination::Stdout, Destination::File)
            };
            cmd_render(&config, request, format, &destination, summary)
        }
        Commands::Features => cmd_features(&load()?),
        Commands::Schemas { file, all } => cmd_schemas(file.as_deref(), all),
        Commands::Language { format } => {
            cmd_language(&format);
            Ok(())
        }
        Commands::Init => cmd_init(config_path.clone().unwrap_or_else(config_file_path)),
    }
}

/// Inputs of a render, in the order they are applied.
struct RenderRequest {
    draft: Option<PathBuf>,
    metadata: DraftMetadata,
    features: Vec<String>,
    without: Vec<String>,
    settings: Vec<String>,
}

enum Destination {
    Stdout,
    File(PathBuf),
    ExportsDir,
}

/// Render command.
fn cmd_render(
    config: &AppConfig,
    request: RenderRequest,
    format: ExportFormat,
    destination: &Destination,
    summary: bool,
) -> domain::Result<()> {
    let assignments = request
        .settings
        .iter()
        .map(|s| s.parse::<SettingAssignment>())
        .collect::<domain::Result<Vec<_>>>()?;

    let mut store = ConfigurationStore::new(config.catalog()?);

    if let Some(path) = &request.draft {
        store.set_configuration(read_draft_file(path)?);
    }

    for feature in &request.features {
        if !store.catalog().contains(feature) {
            return Err(domain::AppError::InvalidData {
                message: format!("Unknown feature: {feature}. See `cache-config features`"),
            });
        }
        store.add_feature(feature);
    }
    for feature in &request.without {
        store.remove_feature(feature);
    }

    let mut next = store.draft().clone();
    for assignment in assignments {
        next = next.with_setting(&assignment.path, assignment.value);
    }
    let metadata = merge_metadata(next.metadata(), request.metadata);
    store.set_configuration(next.with_metadata(metadata));

    let exporter = Exporter::new(&config.export);
    let preview = exporter.preview(store.draft(), format)?;
    tracing::debug!(language = %preview.language, "Rendered preview");

    if summary {
        println!("{}", format_draft_summary(store.draft()));
        println!();
    }

    match destination {
        Destination::Stdout => println!("{}", preview.content),
        Destination::File(path) => {
            write_export(path, &preview.content)?;
            println!("{} Exported {} to {}", "✓".green().bold(), preview.format, path.display());
        }
        Destination::ExportsDir => {
            let path = config.exports_dir().join(&preview.file_name);
            write_export(&path, &preview.content)?;
            println!("{} Exported {} to {}", "✓".green().bold(), preview.format, path.display());
        }
    }

    Ok(())
}

/// Command-line metadata wins over the draft file's.
fn merge_metadata(base: &DraftMetadata, overrides: DraftMetadata) -> DraftMetadata {
    DraftMetadata {
        cache_name: overrides.cache_name.or_else(|| base.cache_name.clone()),
        template: overrides.template.or_else(|| base.template.clone()),
        container: overrides.container.or_else(|| base.container.clone()),
    }
}

/// List known features command.
fn cmd_features(config: &AppConfig) -> domain::Result<()> {
    let catalog = config.catalog()?;

    println!("{}", format_catalog_table(&catalog));
    println!();
    println!("Total: {} feature(s)", catalog.len());

    Ok(())
}

/// Schema filter command.
fn cmd_schemas(file: Option<&std::path::Path>, all: bool) -> domain::Result<()> {
    let names = read_schema_names(file)?;

    if all {
        println!("{}", format_schema_table(&names));
        return Ok(());
    }

    let user_schemas = filter_schemas(&names);
    for name in &user_schemas {
        println!("{}", colorize_schema(name));
    }
    tracing::info!(
        total = names.len(),
        user = user_schemas.len(),
        "Filtered schemas"
    );

    Ok(())
}

/// Viewer language command.
fn cmd_language(tag: &str) {
    let format = ExportFormat::from(tag);
    println!("{}", to_display_language(format));
}

/// Write default configuration command.
fn cmd_init(path: PathBuf) -> domain::Result<()> {
    if ensure_config_exists(&path)? {
        println!("{} Created {}", "✓".green().bold(), path.display());
    } else {
        println!("{} Already exists: {}", "•".yellow(), path.display());
    }

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_metadata_prefers_overrides() {
        let base = DraftMetadata {
            cache_name: Some("from-file".to_string()),
            template: Some("org.infinispan.DIST_SYNC".to_string()),
            container: None,
        };
        let overrides = DraftMetadata {
            cache_name: Some("orders".to_string()),
            ..Default::default()
        };

        let merged = merge_metadata(&base, overrides);
        assert_eq!(merged.cache_name.as_deref(), Some("orders"));
        assert_eq!(merged.template.as_deref(), Some("org.infinispan.DIST_SYNC"));
        assert!(merged.container.is_none());
    }
}
