//! # VTuber Handbook CLI (`vtdb`)
//!
//! Browse the bundled VTuber catalog from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! vtdb --config ./config/vtdb.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vtdb names` | Print every name in the catalog |
//! | `vtdb search "<query>"` | Fuzzy-search names |
//! | `vtdb show "<name>"` | Show a detail page |
//! | `vtdb discover` | Random personalities and agencies |
//! | `vtdb bookmark add\|remove "<name>"` | Edit the bookmark list |
//! | `vtdb bookmark list` | Show bookmarked profiles |
//! | `vtdb spotlight [--json]` | Current weekly spotlight post |
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use vtuber_handbook::bookmarks::BookmarkStore;
use vtuber_handbook::catalog::CatalogHandle;
use vtuber_handbook::config::{self, Config};
use vtuber_handbook::discovery;
use vtuber_handbook::handbook::{Handbook, ProfileDetail};
use vtuber_handbook::spotlight;
use vtuber_handbook_core::models::RankedProfile;

/// VTuber Handbook: an offline directory of VTubers.
#[derive(Parser)]
#[command(
    name = "vtdb",
    about = "VTuber Handbook: fuzzy search, bookmarks and detail pages over a bundled catalog",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/vtdb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every name in the catalog, in storage order.
    Names,

    /// Fuzzy-search the catalog by name.
    ///
    /// Tolerates typos, transpositions and partial names. Results are
    /// printed best match first.
    Search {
        query: String,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the detail page for one name.
    Show {
        name: String,

        /// Sort fields A→Z instead of the configured order.
        #[arg(long)]
        ascending: bool,

        /// Page to show, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page; must be one of `detail.page_size_options`.
        #[arg(long)]
        per_page: Option<usize>,

        /// Print the whole page as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show random discovery sections.
    Discover {
        #[arg(long)]
        json: bool,
    },

    /// Manage bookmarks.
    Bookmark {
        #[command(subcommand)]
        action: BookmarkAction,
    },

    /// Fetch the current weekly spotlight post.
    Spotlight {
        /// Print the post as JSON (`null` when unavailable).
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum BookmarkAction {
    /// Bookmark a name.
    Add { name: String },
    /// Remove a bookmark.
    Remove { name: String },
    /// List bookmarked profiles in bookmark order.
    List {
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    // Commands that don't touch the catalog
    match &cli.command {
        Commands::Spotlight { json } => {
            return run_spotlight(&cfg, *json).await;
        }
        Commands::Bookmark {
            action: BookmarkAction::Add { name },
        } => {
            let store = BookmarkStore::from_config(&cfg.bookmarks);
            if store.append(name)? {
                println!("Bookmarked {}.", name);
            } else {
                println!("{} is already bookmarked.", name);
            }
            return Ok(());
        }
        Commands::Bookmark {
            action: BookmarkAction::Remove { name },
        } => {
            let store = BookmarkStore::from_config(&cfg.bookmarks);
            if store.remove(name)? {
                println!("Removed {}.", name);
            } else {
                println!("{} was not bookmarked.", name);
            }
            return Ok(());
        }
        _ => {}
    }

    let catalog = CatalogHandle::from_config(&cfg);
    catalog.open().await;
    let handbook = Handbook::new(catalog, &cfg);

    let result = run(&cfg, &handbook, cli.command).await;

    handbook.store().close().await;
    result
}

async fn run(cfg: &Config, handbook: &Handbook<CatalogHandle>, command: Commands) -> Result<()> {
    match command {
        Commands::Names => {
            for name in handbook.names().await {
                println!("{}", name);
            }
        }
        Commands::Search { query, json } => {
            let results = handbook.search(&query).await;
            print_profiles(&results, json)?;
        }
        Commands::Show {
            name,
            ascending,
            page,
            per_page,
            json,
        } => {
            let per_page = per_page.unwrap_or(cfg.detail.items_per_page);
            if !cfg.detail.page_size_options.contains(&per_page) {
                bail!(
                    "--per-page must be one of {:?}",
                    cfg.detail.page_size_options
                );
            }
            if page == 0 {
                bail!("--page starts at 1");
            }

            let mut options = handbook.detail_options();
            if ascending {
                options.sort_ascending = true;
            }
            let detail = handbook.detail_with(&name, options).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print_detail(&detail, page - 1, per_page);
            }
        }
        Commands::Discover { json } => {
            let sections = discovery::discover(handbook, cfg.discovery.min_cards).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&sections)?);
            } else if sections.is_empty() {
                println!("Nothing to discover.");
            } else {
                for section in &sections {
                    println!("== {} ==", section.title);
                    for card in &section.cards {
                        if card.display_title.is_empty() {
                            println!("  {}", card.name);
                        } else {
                            println!("  {} ({})", card.name, card.display_title);
                        }
                    }
                    println!();
                }
            }
        }
        Commands::Bookmark {
            action: BookmarkAction::List { json },
        } => {
            let names = BookmarkStore::from_config(&cfg.bookmarks).get();
            let results = handbook.resolve(&names).await;
            print_profiles(&results, json)?;
        }
        Commands::Bookmark { .. } | Commands::Spotlight { .. } => {
            // Handled above (before opening the catalog)
            unreachable!()
        }
    }

    Ok(())
}

async fn run_spotlight(cfg: &Config, json: bool) -> Result<()> {
    let post = spotlight::fetch_spotlight(&cfg.spotlight).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
        return Ok(());
    }
    match post {
        Some(post) => println!("{}", post.to_text()),
        None => println!("No spotlight available."),
    }
    Ok(())
}

fn print_profiles(results: &[RankedProfile], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }
    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }
    for r in results {
        if r.profile.display_title.is_empty() {
            println!("{}. {}", r.position + 1, r.profile.name);
        } else {
            println!(
                "{}. {} ({})",
                r.position + 1,
                r.profile.name,
                r.profile.display_title
            );
        }
    }
    Ok(())
}

fn print_detail(detail: &ProfileDetail, page: usize, per_page: usize) {
    println!("{}", detail.page.name);
    if !detail.display_title.is_empty() {
        println!("{}", detail.display_title);
    }
    if !detail.intro_html.is_empty() {
        println!();
        println!("{}", detail.intro_html);
    }

    if detail.page.sections.is_empty() {
        println!();
        println!("No details.");
    } else {
        let rows = detail.page.sections.page(page, per_page);
        println!();
        for field in &rows.rows {
            println!("{}: {}", field.label, field.html);
        }
        if rows.rows.is_empty() {
            println!("(page {} is past the end)", page + 1);
        } else {
            println!(
                "-- {} (page {}/{})",
                rows.label(),
                page + 1,
                rows.page_count
            );
        }
    }

    if let Some(links) = &detail.page.links {
        println!();
        for (platform, url) in links.ordered() {
            println!("{}: {}", platform, url);
        }
    }

    if !detail.credit_html.is_empty() {
        println!();
        println!("{}", detail.credit_html);
    }
}
