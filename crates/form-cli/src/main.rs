//! formctl
//!
//! Command-line interface for the form engine: author templates, lint them,
//! preview them as plain text and run submissions against them.
//!
//! # Usage
//!
//! ```bash
//! formctl templates create --name "Guest Feedback" --category guest_feedback \
//!     --field text:"Your name" --field email:"Email"
//! formctl fields add tpl_1a2b... textarea --label "Comments"
//! formctl lint tpl_1a2b...
//! formctl preview tpl_1a2b... --values answers.json
//! formctl submit tpl_1a2b... --values answers.json --out submission.json
//! formctl templates list --format json
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod output;
mod sink;
mod store;
mod widgets;

#[derive(Parser)]
#[command(name = "formctl")]
#[command(version)]
#[command(about = "Form template authoring and runtime CLI", long_about = None)]
struct Cli {
    /// Template store directory
    #[arg(long, env = "FORMCTL_STORE_DIR", global = true)]
    store: Option<PathBuf>,

    /// Output format
    #[arg(long, short, env = "FORMCTL_FORMAT", global = true)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short, global = true)]
    profile: Option<String>,

    /// Debug logging to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a template for save and publish problems
    Lint {
        /// Template id in the store, or a path to a template JSON file
        template: String,
    },
    /// Render the visible fields of a template as text
    Preview {
        template: String,
        /// JSON object of field id to value
        #[arg(long)]
        values: Option<PathBuf>,
    },
    /// Validate answers and hand them to the submission sink
    Submit {
        template: String,
        #[arg(long)]
        values: PathBuf,
        /// Write the accepted submission here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Manage templates
    Templates {
        #[command(subcommand)]
        action: TemplateCommands,
    },
    /// Edit the fields of a stored template
    Fields {
        #[command(subcommand)]
        action: FieldCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// List templates
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Case-insensitive name search
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a template with its fields
    Show { id: String },
    /// Create a draft template
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "other")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Field as `type` or `type:label`, repeatable
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Import a template JSON file as a new template
    Import { file: PathBuf },
    /// Export a template as JSON
    Export {
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Copy a template as a new draft
    Duplicate {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a template
    Delete { id: String },
    /// Mark a template active after publish checks
    Publish { id: String },
    /// Mark a template archived
    Archive { id: String },
}

#[derive(Subcommand)]
enum FieldCommands {
    /// Add a field with type defaults
    Add {
        template: String,
        /// Field type, e.g. text, email, select
        field_type: String,
        #[arg(long)]
        label: Option<String>,
        /// Insert at this position instead of appending
        #[arg(long)]
        at: Option<usize>,
        #[arg(long)]
        required: bool,
    },
    /// Move the field at one position to another
    Move {
        template: String,
        from: usize,
        to: usize,
    },
    /// Copy a field to the end of the form
    Duplicate { template: String, field: String },
    /// Remove a field
    Remove { template: String, field: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default configuration file
    Init,
    /// Show the effective configuration
    Show,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match config::Config::load(cli.profile.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config");
            config::Config::default()
        }
    };
    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(output::OutputFormat::parse))
        .unwrap_or_default();

    let result = match commands::Context::new(&config, cli.store, format) {
        Ok(ctx) => match cli.command {
            Commands::Lint { template } => commands::lint::handle(&ctx, &template).await,
            Commands::Preview { template, values } => {
                commands::preview::handle(&ctx, &template, values.as_deref()).await
            }
            Commands::Submit { template, values, out } => {
                commands::submit::handle(&ctx, &template, &values, out).await
            }
            Commands::Templates { action } => commands::templates::handle(action, &ctx).await,
            Commands::Fields { action } => commands::fields::handle(action, &ctx).await,
            Commands::Config { action } => commands::config::handle(action, &config, cli.profile.as_deref()),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
