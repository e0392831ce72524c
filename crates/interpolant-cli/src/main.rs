use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use interpolant_core::template::{placeholder_keys, tokenize};
use interpolant_core::{render_args, Interpolator};
use log::{debug, info};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template
    Render {
        #[command(flatten)]
        source: TemplateSource,

        /// Context entry (format: key=value)
        #[arg(long)]
        set: Vec<String>,

        /// Positional argument; when given, placeholders are filled in order and --set is ignored
        #[arg(long)]
        arg: Vec<String>,

        /// Output file path (optional, prints to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the tokens of a template as JSON
    Tokens {
        #[command(flatten)]
        source: TemplateSource,
    },

    /// List the placeholder keys of a template, one per line
    Keys {
        #[command(flatten)]
        source: TemplateSource,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct TemplateSource {
    /// Path to the template file
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Template text given directly
    #[arg(short, long)]
    inline: Option<String>,
}

impl TemplateSource {
    async fn load(&self) -> Result<String> {
        match (&self.template, &self.inline) {
            (Some(path), _) => {
                info!("Reading template from {:?}", path);
                tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to load template file {:?}", path))
            }
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => bail!("either --template or --inline is required"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv().ok();

    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Render { source, set, arg, output } => {
            let template = source.load().await?;

            let rendered = if arg.is_empty() {
                let interpolator = build_context(set)?;
                debug!("Context has {} entries", interpolator.context().len());
                interpolator.render(&template)
            } else {
                let args: Vec<Value> = arg.iter().cloned().map(Value::String).collect();
                render_args(&template, &args)
            };

            if let Some(path) = output {
                tokio::fs::write(path, &rendered)
                    .await
                    .with_context(|| format!("Failed to write output to {:?}", path))?;
                info!("Rendered template written to {:?}", path);
            } else {
                println!("{}", rendered);
            }
        }
        Commands::Tokens { source } => {
            let template = source.load().await?;
            let tokens = tokenize(&template);
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }
        Commands::Keys { source } => {
            let template = source.load().await?;
            for key in placeholder_keys(&template) {
                println!("{}", key);
            }
        }
    }

    Ok(())
}

/// Build an interpolator from `key=value` strings.
fn build_context(pairs: &[String]) -> Result<Interpolator> {
    let mut kvs = Vec::with_capacity(pairs.len() * 2);
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("invalid --set entry {:?}, expected key=value", pair);
        };
        kvs.push(Value::String(key.to_string()));
        kvs.push(Value::String(value.to_string()));
    }
    Interpolator::of(&kvs).context("Failed to build context")
}
