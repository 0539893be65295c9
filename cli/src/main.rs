//! Terminal client for the todo service.

mod command;
mod render;
mod repl;
mod transport;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use todo_core::{Filter, StoreClient, TodoClient};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::repl::Repl;
use crate::transport::ReqwestTransport;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Keep a todo list on a todo service", long_about = None)]
struct Cli {
    /// Base URL of the todo service
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:5000")]
    api_url: String,

    /// Which todos to show first: all, active or completed
    #[arg(short, long, default_value = "all")]
    filter: Filter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_cli=info,todo_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::info!(api_url = %cli.api_url, "starting");

    let transport = ReqwestTransport::new().context("building HTTP client")?;
    let mut repl = Repl::new(StoreClient::new(TodoClient::new(&cli.api_url), transport));
    repl.app_mut().set_filter(cli.filter);

    let mut stdout = std::io::stdout();
    let first = repl.start().await;
    print!("{first}");

    repl.run(BufReader::new(tokio::io::stdin()), |out| {
        print!("{out}");
        let _ = stdout.flush();
    })
    .await
    .context("reading commands")?;
    Ok(())
}
