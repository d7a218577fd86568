//! Bot chain and turn timer tests.
//!
//! These tests run the real scheduler on a tokio runtime with short real
//! delays and verify that chains are exclusive per game, always release
//! their token, stop on shutdown, and that turn timers forfeit idle humans.

use std::sync::Arc;
use std::time::Duration;

use rust_blokus::bot::BotConfig;
use rust_blokus::core::{
    Color, EngineError, EngineResult, GameConfig, GameId, GameState, PacingConfig, PlayerSlot,
    ServiceConfig,
};
use rust_blokus::rules::{self, SkipReason};
use rust_blokus::service::{
    ChannelSink, GameEvent, GameRepository, GameService, GameSetup, InMemoryRepository,
    RecordingSink,
};

fn config(pacing: PacingConfig) -> ServiceConfig {
    ServiceConfig::new()
        .with_bot(BotConfig::default().with_seed(17))
        .with_pacing(pacing)
}

fn paced(ms: u64) -> PacingConfig {
    PacingConfig::immediate().with_base(Duration::from_millis(ms))
}

/// Blue bot first, Yellow human second; Green and Red are backfilled bots.
fn bot_then_human() -> GameSetup {
    GameSetup::new(vec![PlayerSlot::bot(Color::Blue), PlayerSlot::human(Color::Yellow)])
}

/// Repository whose saves always fail.
#[derive(Default)]
struct FailingRepository {
    inner: InMemoryRepository,
}

impl GameRepository for FailingRepository {
    fn load(&self, game_id: GameId) -> EngineResult<Option<GameState>> {
        self.inner.load(game_id)
    }

    fn save(&self, _game_id: GameId, _state: &GameState) -> EngineResult<()> {
        Err(EngineError::Storage {
            message: "disk full".into(),
        })
    }

    fn max_id(&self) -> EngineResult<Option<GameId>> {
        self.inner.max_id()
    }
}

async fn next_matching(
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<GameEvent>,
    pred: impl Fn(&GameEvent) -> bool,
) -> GameEvent {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let event = rx.recv().await.expect("event channel closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

#[tokio::test]
async fn test_duplicate_trigger_is_a_noop() {
    let svc = GameService::new(config(paced(50)));
    let id = svc.create_game(bot_then_human()).await.unwrap();
    let first = svc.start_game(id).await.unwrap().unwrap();
    assert_eq!(first.color, Color::Blue);

    // start_game already launched the chain for the bot seat.
    assert!(svc.registry().is_chain_running(id));
    assert!(svc.trigger_bot_chain(id).is_none());
    assert!(svc.trigger_bot_chain(id).is_none());

    tokio::time::timeout(Duration::from_secs(10), async {
        while svc.registry().is_chain_running(id) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    let moves = svc.placed_moves(id).await.unwrap();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].color, Color::Blue);
    assert_eq!(svc.current_player(id).await.unwrap().unwrap().color, Color::Yellow);
}

#[tokio::test]
async fn test_advance_turn_hands_off_to_bots() {
    let svc = GameService::new(config(paced(30)));
    let id = svc.create_game(bot_then_human()).await.unwrap();
    svc.start_game(id).await.unwrap();

    // Wait for the start-triggered chain, then hand the turn back to Blue.
    tokio::time::timeout(Duration::from_secs(10), async {
        while svc.registry().is_chain_running(id) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    // Yellow passes; Green and Red are bots, so a chain starts again.
    svc.advance_turn(id).await.unwrap();
    let again = svc.trigger_bot_chain(id);
    assert!(again.is_none(), "advance_turn already started the chain");

    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let current = svc.current_player(id).await.unwrap();
            if current.map(|p| p.color) == Some(Color::Yellow) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    // Green, Red and Blue each placed once more.
    assert_eq!(svc.placed_moves(id).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_failed_chain_releases_token() {
    let events = Arc::new(RecordingSink::new());
    let svc = GameService::with_collaborators(
        config(PacingConfig::immediate()),
        Arc::new(FailingRepository::default()),
        events.clone(),
    );
    let id = svc.create_game(GameSetup::standard(0)).await.unwrap();
    svc.start_game(id).await.unwrap();

    tokio::time::timeout(Duration::from_secs(10), async {
        while svc.registry().is_chain_running(id) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    assert!(events
        .events_for(id)
        .iter()
        .any(|e| matches!(e, GameEvent::BotChainFailed { .. })));
    // The move itself was committed before the save failed.
    assert_eq!(svc.placed_moves(id).await.unwrap().len(), 1);

    let handle = svc.trigger_bot_chain(id).expect("token should be free again");
    handle.await.unwrap();
    assert_eq!(svc.placed_moves(id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_aborted_chain_releases_token() {
    // A started all-bot game that only exists in the repository.
    let mut state = GameState::standard(0, GameConfig::default());
    rules::start(&mut state).unwrap();
    let repo = Arc::new(InMemoryRepository::new());
    repo.save(GameId::new(1), &state).unwrap();
    let restored = GameService::with_collaborators(
        config(paced(10_000)),
        repo,
        Arc::new(RecordingSink::new()),
    );

    let handle = restored.trigger_bot_chain(GameId::new(1)).unwrap();
    assert!(restored.registry().is_chain_running(GameId::new(1)));
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
    assert!(!restored.registry().is_chain_running(GameId::new(1)));

    let second = restored.trigger_bot_chain(GameId::new(1));
    assert!(second.is_some());
    restored.shutdown();
    tokio::time::timeout(Duration::from_secs(5), second.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(restored.placed_moves(GameId::new(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shutdown_interrupts_pacing_delay() {
    let svc = GameService::new(config(paced(10_000)));
    let id = svc.create_game(GameSetup::standard(0)).await.unwrap();
    svc.start_game(id).await.unwrap();
    assert!(svc.registry().is_chain_running(id));

    svc.shutdown();
    tokio::time::timeout(Duration::from_secs(5), async {
        while svc.registry().is_chain_running(id) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    assert!(svc.placed_moves(id).await.unwrap().is_empty());
    assert!(svc.trigger_bot_chain(id).is_none());
}

#[tokio::test]
async fn test_all_bot_game_runs_to_completion() {
    let (sink, mut rx) = ChannelSink::new();
    let svc = GameService::with_collaborators(
        config(PacingConfig::immediate()),
        Arc::new(InMemoryRepository::new()),
        Arc::new(sink),
    );
    let id = svc.create_game(GameSetup::standard(0)).await.unwrap();
    svc.start_game(id).await.unwrap();

    let over = tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            match rx.recv().await {
                Some(event @ GameEvent::GameOver { .. }) => return event,
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(over.game_id(), id);
    assert!(svc.is_game_over(id).await.unwrap());
    let scores = svc.finalize_scores(id).await.unwrap();
    if let GameEvent::GameOver { scores: published, result, .. } = over {
        assert_eq!(published, scores);
        assert!(result.is_some());
    }
}

#[tokio::test]
async fn test_turn_timer_forfeits_idle_human() {
    let (sink, mut rx) = ChannelSink::new();
    let svc = GameService::with_collaborators(
        config(PacingConfig::immediate())
            .with_game(GameConfig::default().with_turn_timeout(Duration::from_millis(40))),
        Arc::new(InMemoryRepository::new()),
        Arc::new(sink),
    );
    let id = svc.create_game(GameSetup::standard(1)).await.unwrap();
    svc.start_game(id).await.unwrap();

    let skipped = next_matching(&mut rx, |e| matches!(e, GameEvent::PlayerSkipped { .. })).await;
    assert_eq!(
        skipped,
        GameEvent::PlayerSkipped {
            game_id: id,
            color: Color::Blue,
            reason: SkipReason::Forfeit,
        }
    );
    // The bots take over after the forfeit.
    let placed = next_matching(&mut rx, |e| matches!(e, GameEvent::PiecePlaced { .. })).await;
    if let GameEvent::PiecePlaced { delta, by_bot, .. } = placed {
        assert_eq!(delta.color, Color::Yellow);
        assert!(by_bot);
    }
    svc.shutdown();
}

#[tokio::test]
async fn test_turn_timer_does_not_fire_after_move() {
    let events = Arc::new(RecordingSink::new());
    let svc = GameService::with_collaborators(
        config(paced(5_000))
            .with_game(GameConfig::default().with_turn_timeout(Duration::from_millis(60))),
        Arc::new(InMemoryRepository::new()),
        events.clone(),
    );
    let id = svc.create_game(GameSetup::standard(1)).await.unwrap();
    svc.start_game(id).await.unwrap();

    // Blue moves well inside the window; Yellow's bot chain then sits in its
    // long pacing delay, so Blue's turn cannot come back around.
    svc.place_piece(id, Color::Blue, 1, 0, 0, 0, false).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(!events
        .events_for(id)
        .iter()
        .any(|e| matches!(e, GameEvent::PlayerSkipped { reason: SkipReason::Forfeit, .. })));
    svc.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_human_pass_as_chain_ends_is_never_dropped() {
    let svc = GameService::new(config(PacingConfig::immediate()));
    let id = svc.create_game(bot_then_human()).await.unwrap();
    svc.start_game(id).await.unwrap();

    // Yellow passes the moment the turn comes back, without waiting for the
    // previous chain to let go of its token. Every pass must still reach
    // the bots.
    for round in 0..6usize {
        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                let current = svc.current_player(id).await.unwrap();
                if current.map(|p| p.color) == Some(Color::Yellow) {
                    return;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("turn never came back to yellow in round {round}"));
        assert_eq!(svc.placed_moves(id).await.unwrap().len(), 1 + 3 * round);
        svc.advance_turn(id).await.unwrap();
    }
    svc.shutdown();
}
