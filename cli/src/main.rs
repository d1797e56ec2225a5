mod present;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sizzle_core::{
    FixtureSource, ListQuery, NavigatorOptions, PresentationSession, RecipeApi, RecipeId,
    RecipeLoader, RecipePage, RecipeSource, ReqwestClientBuilder, SizzleConfig,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "sizzle")]
#[command(about = "Step-by-step recipe presenter", long_about = None)]
struct Cli {
    /// Backend base URL (default: SIZZLE_API_BASE_URL or http://localhost:8000)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Read recipes from a JSON fixture file instead of the backend
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a recipe overview followed by every step
    Show {
        id: RecipeId,
    },
    /// Step through a recipe interactively
    Walk {
        id: RecipeId,
        /// Open the step view immediately instead of starting on the overview
        #[arg(long)]
        open: bool,
    },
    /// Normalize a recipe JSON file and print the canonical form
    Normalize {
        path: PathBuf,
    },
    /// List recipes on the backend, or in the fixture file when one is given
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = SizzleConfig::from_env()?;
    if let Some(server) = cli.server {
        config.base_url = server;
    }

    match cli.command {
        Commands::Show { id } => {
            let loader = RecipeLoader::new(source(&config, cli.fixture.as_ref())?);
            loader.load(id).await;
            let state = loader.state();
            if let Some(message) = state.error_message() {
                bail!(message);
            }
            let Some(recipe) = state.recipe else {
                bail!("Recipe {} did not load", id);
            };
            print!("{}", present::overview(&recipe));
            for (index, step) in recipe.steps.iter().enumerate() {
                println!();
                print!("{}", present::step(step, index, recipe.steps.len()));
            }
        }
        Commands::Walk { id, open } => {
            let options = NavigatorOptions {
                start_open: open || config.start_open,
            };
            let loader = RecipeLoader::new(source(&config, cli.fixture.as_ref())?);
            walk(&loader, id, options).await?;
        }
        Commands::Normalize { path } => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let recipe = sizzle_core::normalize_str(&content)?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        Commands::List {
            search,
            limit,
            offset,
        } => {
            let query = ListQuery {
                limit,
                offset,
                search,
            };
            let page = list_page(&config, cli.fixture.as_ref(), &query).await?;
            for recipe in &page.recipes {
                println!("{}", present::summary_line(recipe));
            }
            println!(
                "-- showing {} of {} (offset {})",
                page.recipes.len(),
                page.total,
                page.offset
            );
        }
    }

    Ok(())
}

fn source(config: &SizzleConfig, fixture: Option<&PathBuf>) -> Result<Arc<dyn RecipeSource>> {
    if let Some(path) = fixture {
        let fixtures = FixtureSource::from_path(path)
            .with_context(|| format!("Failed to load fixture {}", path.display()))?;
        tracing::debug!(recipes = fixtures.len(), "using fixture source");
        return Ok(Arc::new(fixtures));
    }

    let client = ReqwestClientBuilder::from_config(config).build()?;
    Ok(Arc::new(RecipeApi::new(client, &config.base_url)?))
}

async fn list_page(
    config: &SizzleConfig,
    fixture: Option<&PathBuf>,
    query: &ListQuery,
) -> Result<RecipePage> {
    if let Some(path) = fixture {
        let fixtures = FixtureSource::from_path(path)
            .with_context(|| format!("Failed to load fixture {}", path.display()))?;
        return Ok(fixtures.list(query));
    }

    let client = ReqwestClientBuilder::from_config(config).build()?;
    let api = RecipeApi::new(client, &config.base_url)?;
    Ok(api.list_recipes(query).await?)
}

async fn walk(
    loader: &RecipeLoader<Arc<dyn RecipeSource>>,
    id: RecipeId,
    options: NavigatorOptions,
) -> Result<()> {
    let mut session = PresentationSession::new(options);
    loader.load(id).await;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let state = loader.state();
        session.sync(&state);

        if let Some(message) = state.error_message() {
            println!("! {} (r to retry, q to quit)", message);
        }
        if let Some(recipe) = session.recipe() {
            let nav = session.navigator();
            match nav.current_step().filter(|_| nav.is_overlay_open()) {
                Some(step) => print!("{}", present::step(step, nav.index(), nav.len())),
                None => print!("{}", present::overview(recipe)),
            }
        }
        print!("[n]ext [p]rev [g N] [o]pen [c]lose [r]etry [q]uit > ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let mut words = line.split_whitespace();
        let nav = session.navigator_mut();

        match words.next().unwrap_or("n") {
            "n" if !nav.is_overlay_open() => nav.open(),
            "n" => {
                nav.next();
            }
            "p" => {
                nav.previous();
            }
            "g" => {
                let target = words
                    .next()
                    .and_then(|w| w.parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1));
                match target.map(|index| nav.go_to(index)) {
                    Some(Ok(())) => nav.open(),
                    Some(Err(e)) => println!("! {}", e),
                    None => println!("! usage: g <step number>"),
                }
            }
            "o" => nav.open(),
            "c" => nav.close(),
            "r" => {
                loader.retry().await;
            }
            "q" => break,
            other => println!("! unknown command '{}'", other),
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_list_reads_fixture_instead_of_backend() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 2, "title": "Tea"}}, {{"id": 1, "title": "Toast"}}]"#
        )
        .unwrap();
        let path = file.path().to_path_buf();

        // Nothing listens here; reaching the backend would fail the call.
        let config = SizzleConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..SizzleConfig::from_lookup(|_| None).unwrap()
        };
        let page = list_page(&config, Some(&path), &ListQuery::default())
            .await
            .unwrap();
        let titles: Vec<_> = page.recipes.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Toast", "Tea"]);
        assert_eq!(page.total, 2);
    }
}
