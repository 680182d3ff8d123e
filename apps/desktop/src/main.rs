use anyhow::Result;
use clap::Parser;
use client_core::{CountrySearch, HttpCountryTransport};
use shared::protocol::DEFAULT_SERVER_URL;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod view;

use view::ViewState;

#[derive(Parser, Debug)]
#[command(about = "Look up World Bank country metadata by ISO code")]
struct Args {
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Look up a single code and exit; omit for an interactive session.
    iso_code: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut search = CountrySearch::new(HttpCountryTransport::new(args.server_url));
    spawn_loading_indicator(&search);

    if let Some(iso_code) = args.iso_code {
        search.input(iso_code);
        search.submit().await;
        println!("{}", current_view(&search).render());
        return Ok(());
    }

    println!("{}", current_view(&search).render());
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let label = current_view(&search).submit_label();
        stdout.write_all(format!("ISO code [{label}]> ").as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if matches!(line, "quit" | "exit") {
            break;
        }

        search.input(line);
        search.submit().await;
        println!("{}", current_view(&search).render());
    }

    Ok(())
}

fn current_view(search: &CountrySearch<HttpCountryTransport>) -> ViewState {
    ViewState::from_snapshot(search.form().errors(), &search.lookup_state())
}

fn spawn_loading_indicator(search: &CountrySearch<HttpCountryTransport>) {
    let mut updates = search.lookup().subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let loading = updates.borrow_and_update().is_loading;
            debug!(loading, "lookup state changed");
            if loading {
                eprintln!("{}", ViewState::Loading.render());
            }
        }
    });
}
