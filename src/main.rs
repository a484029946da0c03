mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use stayboard::app::{self, App, Event};
use stayboard::config::Config;
use stayboard::render;
use stayboard::Stayboard;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let sb = Stayboard::connect(config, cli.memory).await?;

    match cli.command {
        Commands::Render { query, out } => {
            let mut app = start_or_write_failure(&sb, out.as_deref()).await?;
            if let Some(q) = query {
                app.handle(Event::Input(q)).await?;
            }
            write_page(out.as_deref(), &app.page()?)?;
        }
        Commands::List { query, json } => {
            let mut app = sb.start().await??;
            if let Some(q) = query {
                app.handle(Event::Input(q)).await?;
            }
            if json {
                let listings: Vec<_> = app.filtered().listings(app.catalog()).collect();
                println!("{}", serde_json::to_string_pretty(&listings)?);
                return Ok(());
            }
            for l in app.filtered().listings(app.catalog()) {
                let mark = if app.favorites().contains(&l.id) { "♥" } else { " " };
                println!(
                    "{} {}\t{}\t{}\t{}",
                    mark,
                    l.id,
                    l.title,
                    render::price_text(l.price),
                    l.host.name
                );
            }
        }
        Commands::Favorite { id } => {
            let mut app = sb.start().await??;
            if !app.container().is_bound(&id) {
                anyhow::bail!("no listing with id {id}");
            }
            app.handle(Event::ToggleFavorite(id.clone())).await?;
            let state = if app.favorites().contains(&id) { "added to" } else { "removed from" };
            println!("{id} {state} favorites");
        }
        Commands::Favorites => {
            let favorites = sb.favorites().await?;
            for id in favorites.ids() {
                println!("{id}");
            }
        }
        Commands::Watch { out } => {
            let mut app = start_or_write_failure(&sb, Some(out.as_path())).await?;
            write_page(Some(out.as_path()), &app.page()?)?;
            let stdin = BufReader::new(tokio::io::stdin());
            app::run_events(&mut app, stdin, |app: &App| write_page(Some(out.as_path()), &app.page()?)).await?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stayboard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// On a load failure the error page is still written before exiting with the error.
async fn start_or_write_failure(sb: &Stayboard, out: Option<&Path>) -> Result<App> {
    match sb.start().await? {
        Ok(app) => Ok(app),
        Err(err) => {
            tracing::error!(error = %err, "could not load listings");
            write_page(out, &sb.failure_page(&err)?)?;
            Err(err.into())
        }
    }
}

fn write_page(out: Option<&Path>, page: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, page)
            .with_context(|| format!("writing page: {}", path.display())),
        None => {
            print!("{page}");
            Ok(())
        }
    }
}
