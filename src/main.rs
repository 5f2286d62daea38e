//! # Laurel CLI
//!
//! Command-line interface for certificate templates.
//!
//! ## Usage
//!
//! ```bash
//! # Run the template API with templates kept in ./templates
//! laurel serve --listen 0.0.0.0:8080 --data-dir ./templates
//!
//! # Render a template file to PDF
//! laurel render --template award.json --value 1718000000000-0="Ada Lovelace"
//!
//! # Render a stored template to PNG at 3x oversampling
//! laurel render --store-url http://localhost:8080 --id <ID> --format png --export-scale 3
//!
//! # Manage a remote store
//! laurel list --store-url http://localhost:8080
//! laurel delete --store-url http://localhost:8080 --id <ID>
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use laurel::{
    LaurelError, Template,
    config::RenderConfig,
    export::{DEFAULT_EXPORT_SCALE, DEFAULT_PREVIEW_SCALE, ExportFormat, Exporter},
    fill::{FillValues, fill},
    render::{RenderTarget, background},
    server::{self, ServerConfig},
    store::{HttpStore, TemplateStore},
};

/// Laurel - Certificate template designer
#[derive(Parser, Debug)]
#[command(name = "laurel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "LAUREL_LISTEN", default_value = "0.0.0.0:8080")]
        listen: String,

        /// Directory for saved templates (omit to keep them in memory)
        #[arg(long, env = "LAUREL_DATA_DIR")]
        data_dir: Option<PathBuf>,

        /// Directory searched for TrueType fonts
        #[arg(long, env = "LAUREL_FONT_DIR")]
        font_dir: Option<PathBuf>,

        /// Capture oversampling for exports
        #[arg(long, env = "LAUREL_EXPORT_SCALE", default_value_t = DEFAULT_EXPORT_SCALE)]
        export_scale: f32,

        /// Zoom for preview images
        #[arg(long, env = "LAUREL_PREVIEW_SCALE", default_value_t = DEFAULT_PREVIEW_SCALE)]
        preview_scale: f32,
    },

    /// Fill a template and write the certificate
    Render {
        /// Template JSON file
        #[arg(long, value_name = "FILE", conflicts_with_all = ["store_url", "id"])]
        template: Option<PathBuf>,

        /// Template store base URL
        #[arg(long, requires = "id")]
        store_url: Option<String>,

        /// Template id in the store
        #[arg(long)]
        id: Option<String>,

        /// Field value as FIELD_ID=TEXT (repeatable)
        #[arg(long = "value", value_name = "FIELD_ID=TEXT", value_parser = parse_value)]
        values: Vec<(String, String)>,

        /// Replace the template background with an image file
        #[arg(long, value_name = "FILE")]
        background: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "pdf", value_parser = parse_format)]
        format: ExportFormat,

        /// Output path (defaults to "<name>_certificate.<ext>")
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Directory searched for TrueType fonts
        #[arg(long, env = "LAUREL_FONT_DIR")]
        font_dir: Option<PathBuf>,

        /// Capture oversampling
        #[arg(long, env = "LAUREL_EXPORT_SCALE", default_value_t = DEFAULT_EXPORT_SCALE)]
        export_scale: f32,
    },

    /// List templates in a store
    List {
        /// Template store base URL
        #[arg(long, env = "LAUREL_STORE_URL")]
        store_url: String,
    },

    /// Delete a template from a store
    Delete {
        /// Template store base URL
        #[arg(long, env = "LAUREL_STORE_URL")]
        store_url: String,

        /// Template id
        #[arg(long)]
        id: String,
    },
}

fn parse_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(id, text)| (id.to_string(), text.to_string()))
        .ok_or_else(|| format!("expected FIELD_ID=TEXT, got '{}'", s))
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    ExportFormat::parse(s).ok_or_else(|| format!("unknown format '{}' (pdf, png)", s))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("laurel=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), LaurelError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            data_dir,
            font_dir,
            export_scale,
            preview_scale,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                data_dir,
                render: RenderConfig {
                    font_dir,
                    export_scale,
                    preview_scale,
                },
            };
            server::serve(config).await?;
        }

        Commands::Render {
            template,
            store_url,
            id,
            values,
            background,
            format,
            out,
            font_dir,
            export_scale,
        } => {
            let mut template = match (template, store_url, id) {
                (Some(path), _, _) => load_template_file(&path).await?,
                (None, Some(url), Some(id)) => HttpStore::new(&url)?.get_template(&id).await?,
                _ => {
                    return Err(LaurelError::Validation(
                        "Pass --template FILE or --store-url with --id".to_string(),
                    ));
                }
            };
            if let Some(path) = background {
                template.background_image = Some(background::data_url_from_file(&path)?);
            }

            let config = RenderConfig {
                font_dir,
                export_scale,
                ..Default::default()
            };
            let values: FillValues = values.into_iter().collect();
            for field in &template.fields {
                if values.get(&field.id).is_none() {
                    tracing::debug!(field = %field.id.as_str(), "No value given, using placeholder");
                }
            }

            let fonts = config.font_book()?;
            let settings = config.export_settings(format);
            let filled = fill(&template, &values);

            let doc = tokio::task::spawn_blocking(move || {
                let mut target = RenderTarget::new(fonts);
                target.mount(filled)?;
                Exporter::new(settings).export(&target)
            })
            .await
            .map_err(|e| LaurelError::Document(format!("Task error: {}", e)))??;

            let path = out.unwrap_or_else(|| PathBuf::from(&doc.file_name));
            tokio::fs::write(&path, &doc.bytes).await?;
            println!(
                "Saved {} ({}x{}, {:?}) to {}",
                doc.format.extension().to_uppercase(),
                doc.page_width,
                doc.page_height,
                doc.orientation,
                path.display()
            );
        }

        Commands::List { store_url } => {
            let templates = HttpStore::new(&store_url)?.list_templates().await?;
            if templates.is_empty() {
                println!("No templates.");
            }
            for t in templates {
                println!(
                    "{}  {}  {}x{}  {} field(s)",
                    t.id.as_deref().unwrap_or("-"),
                    t.name,
                    t.width,
                    t.height,
                    t.fields.len()
                );
            }
        }

        Commands::Delete { store_url, id } => {
            HttpStore::new(&store_url)?.delete_template(&id).await?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

/// Read a template from a JSON file.
async fn load_template_file(path: &Path) -> Result<Template, LaurelError> {
    let json = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&json).map_err(|e| {
        LaurelError::Validation(format!("Invalid template {}: {}", path.display(), e))
    })
}
