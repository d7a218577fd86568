//! Run all-bot games through the game service and print the results.
//!
//! Usage: cargo run --bin self_play -- --games 4 --seed 7 --render

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use rustc_hash::FxHashSet;
use tracing::info;

use rust_blokus::core::{PacingConfig, ScoringRule, ServiceConfig};
use rust_blokus::{
    BotConfig, ChannelSink, GameConfig, GameEvent, GameId, GameService, GameSetup,
    InMemoryRepository,
};

/// Watch bots play each other
#[derive(Parser, Debug)]
#[command(name = "self_play")]
#[command(about = "Run all-bot games and print final scores", long_about = None)]
struct Args {
    /// Number of games to run concurrently
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Bot seed (omit for entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Base delay before each bot move, in milliseconds
    #[arg(long, default_value_t = 0)]
    pace_ms: u64,

    /// Use remaining-cell penalty scoring with completion bonuses
    #[arg(long)]
    official: bool,

    /// Print the final board of each game
    #[arg(long)]
    render: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "rust_blokus=info,self_play=info".to_string()),
        )
        .init();

    let args = Args::parse();
    if args.games == 0 {
        bail!("--games must be at least 1");
    }

    let mut bot = BotConfig::default();
    if let Some(seed) = args.seed {
        bot = bot.with_seed(seed);
    }
    let scoring = if args.official {
        ScoringRule::official()
    } else {
        ScoringRule::default()
    };
    let config = ServiceConfig::new()
        .with_bot(bot)
        .with_game(GameConfig::default().with_scoring(scoring))
        .with_pacing(PacingConfig::immediate().with_base(Duration::from_millis(args.pace_ms)));

    let (sink, mut events) = ChannelSink::new();
    let repository = Arc::new(InMemoryRepository::new());
    let service = GameService::with_collaborators(config, repository, Arc::new(sink));

    let mut pending: FxHashSet<GameId> = FxHashSet::default();
    for _ in 0..args.games {
        let game_id = service.create_game(GameSetup::standard(0)).await?;
        pending.insert(game_id);
    }
    for &game_id in &pending {
        service.start_game(game_id).await?;
    }
    info!(games = pending.len(), "games started");

    while !pending.is_empty() {
        let event = events.recv().await.context("event channel closed")?;
        match event {
            GameEvent::GameOver {
                game_id,
                scores,
                result,
            } => {
                pending.remove(&game_id);
                let moves = service.placed_moves(game_id).await?.len();
                println!("{game_id}: {moves} moves, result {result:?}");
                for (color, score) in scores.iter() {
                    println!("  {color:<6} {score:>4}");
                }
                if args.render {
                    let state = service.snapshot(game_id).await?;
                    println!("{}", state.board.render());
                }
            }
            GameEvent::BotChainFailed { game_id, error } => {
                service.shutdown();
                bail!("bot chain for {game_id} failed: {error}");
            }
            _ => {}
        }
    }

    service.shutdown();
    Ok(())
}
