mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use weft::{CommentNode, CommentStore, RedisCommentStore, sweep_orphans, tree};

#[derive(Parser)]
#[command(name = "weft")]
#[command(version = "0.1.0")]
#[command(about = "Maintenance tools for the weft comment store")]
struct Cli {
    /// Redis connection URL (overrides weft.toml)
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Key prefix (overrides weft.toml)
    #[arg(long)]
    prefix: Option<String>,

    /// Path to a config file (defaults to ./weft.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a post's comment forest, newest thread first
    Show {
        /// Post id
        #[arg(long)]
        post: String,
    },
    /// Count a post's top-level comments
    Count {
        /// Post id
        #[arg(long)]
        post: String,
    },
    /// Delete reply subtrees whose parent comment no longer exists
    Sweep,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref())?;
    let url = cli.redis_url.unwrap_or(config.redis.url);
    let prefix = cli.prefix.unwrap_or(config.redis.prefix);
    let store = RedisCommentStore::connect(&url, prefix).await?;

    match cli.command {
        Commands::Show { post } => {
            let trees = tree::list_top_level(&store, &post).await?;
            if trees.is_empty() {
                println!("{}", "no comments".dimmed());
            }
            for node in &trees {
                print_node(node, 0);
            }
        }
        Commands::Count { post } => {
            let count = store.count_by_post(&post).await?;
            println!("{count}");
        }
        Commands::Sweep => {
            let report = sweep_orphans(&store).await?;
            if report.orphan_roots == 0 {
                println!("{} scanned {} records, no orphans", "clean".green(), report.scanned);
            } else {
                println!(
                    "{} scanned {} records, removed {} under {} dangling replies",
                    "swept".yellow(),
                    report.scanned,
                    report.removed,
                    report.orphan_roots
                );
            }
        }
    }

    Ok(())
}

fn print_node(node: &CommentNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let author = node
        .author
        .display_name
        .as_deref()
        .unwrap_or(node.author.id.as_str());
    println!(
        "{indent}{} {} {}  {}",
        node.id.dimmed(),
        author.cyan(),
        node.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
        node.text
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
