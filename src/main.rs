use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use findash::{
    config::Config,
    dashboard::{format::format_figure, Dashboard, Renderer},
    export, server,
    statement::{self, RawStatement},
};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "findash")]
#[command(about = "Normalize a financial statement CSV and render it as a dashboard")]
struct Args {
    /// YAML config file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the normalized table and key metrics
    Summary {
        /// Statement CSV: attributes as rows, periods as columns
        csv: PathBuf,
    },
    /// Write the dashboard as a standalone HTML page
    Render {
        csv: PathBuf,
        #[arg(short, long, default_value = "dashboard.html")]
        output: PathBuf,
    },
    /// Write the normalized table as Parquet
    Export {
        csv: PathBuf,
        #[arg(short, long, default_value = "statement.parquet")]
        output: PathBuf,
    },
    /// Serve the upload page and dashboard over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn load_statement(csv: &Path) -> Result<statement::NormalizedStatement> {
    let raw = RawStatement::from_path(csv)
        .with_context(|| format!("reading statement {}", csv.display()))?;
    let table = statement::normalize(&raw)
        .with_context(|| format!("normalizing statement {}", csv.display()))?;
    Ok(table)
}

fn print_summary(dashboard: &Dashboard) {
    let table = &dashboard.statement;
    let names: Vec<&str> = table.column_names().collect();

    println!("\nCleaned Data ({} periods × {} columns):", table.len(), names.len());
    print!("{:<12}", "period");
    for name in &names {
        print!(" {:>18}", name);
    }
    println!();
    println!("{:-<1$}", "", 12 + names.len() * 19);
    for (period, cells) in table.rows() {
        print!("{:<12}", period);
        for cell in cells {
            print!(" {:>18}", format_figure(cell));
        }
        println!();
    }

    println!("\nKey Metrics:");
    for (label, value) in dashboard.key_metrics.labelled() {
        println!("  {:<26} {}", label, format_figure(value));
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ─── init logging ────────────────────────────────────────────────
    let default_level = if args.verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let mut config = Config::resolve(args.config.as_deref())?;
    let start = Instant::now();

    match args.command {
        Command::Summary { csv } => {
            let dashboard = Dashboard::from_statement(load_statement(&csv)?);
            print_summary(&dashboard);
        }
        Command::Render { csv, output } => {
            let dashboard = Dashboard::from_statement(load_statement(&csv)?);
            let renderer = Renderer::new(config.dashboard.clone())?;
            let page = renderer.render_dashboard(&dashboard)?;
            fs::write(&output, page).with_context(|| format!("writing {}", output.display()))?;
            info!(out = %output.display(), elapsed = ?start.elapsed(), "dashboard written");
        }
        Command::Export { csv, output } => {
            let table = load_statement(&csv)?;
            let bytes = export::write_parquet(&table, &output)?;
            info!(out = %output.display(), bytes, elapsed = ?start.elapsed(), "export done");
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let renderer = Renderer::new(config.dashboard.clone())?;
            server::serve(&config.server, renderer).await?;
        }
    }

    Ok(())
}
