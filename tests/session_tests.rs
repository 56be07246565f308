//! Session lifecycle and tile accounting tests.
//!
//! These walk single sessions through their lifecycle and check the tile
//! accounting after every step.

use tile_rush::core::{GameConfiguration, GameRng, PlayerId, SessionId, TileId, UserId};
use tile_rush::error::{EngineError, ErrorKind};
use tile_rush::rules::{GameResult, GameStyle};
use tile_rush::session::{GameSession, Lifecycle};

const A: UserId = UserId(100);
const B: UserId = UserId(200);

fn two_player_config() -> GameConfiguration {
    GameConfiguration::new()
        .with_players(2)
        .with_tiles(20)
        .with_tiles_per_player(false)
        .with_start_size(5)
        .with_draw_size(1)
        .with_discard_penalty(3)
}

fn started(style: GameStyle, seed: u64) -> GameSession {
    let mut game =
        GameSession::new(SessionId(1), A, style, two_player_config(), GameRng::new(seed)).unwrap();
    game.join(B).unwrap();
    game.start().unwrap();
    game
}

fn hand_size(game: &GameSession, user: UserId) -> usize {
    game.hand(user).unwrap().len()
}

fn total(game: &GameSession) -> usize {
    game.remaining().unwrap() + hand_size(game, A) + hand_size(game, B)
}

/// Test the two-player walk-through: deal, discard, penalty draw.
#[test]
fn test_discard_scenario() {
    for seed in [1, 2, 3, 42] {
        let mut game = started(GameStyle::Single, seed);

        assert_eq!(game.remaining(), Some(10));
        assert_eq!(hand_size(&game, A), 5);
        assert_eq!(hand_size(&game, B), 5);

        let tile = game.hand(A).unwrap().tiles()[0].id;
        let outcome = game.discard(A, tile).unwrap();

        // The discarded tile went back before the penalty draw.
        assert_eq!(outcome.drawn.len(), 4);
        assert_eq!(hand_size(&game, A), 8);
        assert_eq!(game.remaining(), Some(7));
        assert_eq!(hand_size(&game, B), 5);
        assert_eq!(total(&game), 20);
    }
}

/// Test that a started session can't be started again.
#[test]
fn test_idempotent_start() {
    let mut game = started(GameStyle::Rush, 9);
    let hand_a = game.hand(A).unwrap();
    let hand_b = game.hand(B).unwrap();

    let err = game.start().unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidTransition {
            from: Lifecycle::Active,
            action: "start"
        }
    );
    assert_eq!(game.hand(A).unwrap(), hand_a);
    assert_eq!(game.hand(B).unwrap(), hand_b);
    assert_eq!(game.remaining(), Some(10));
}

/// Test that discarding a tile not in hand changes nothing.
#[test]
fn test_discard_legality() {
    let mut game = started(GameStyle::Rush, 5);
    let before = game.view();

    // Unminted id, then a tile from the other hand.
    assert_eq!(game.discard(A, TileId(500)).unwrap_err().kind(), ErrorKind::IllegalMove);
    let theirs = game.hand(B).unwrap().tiles()[0].id;
    assert_eq!(game.discard(A, theirs).unwrap_err().kind(), ErrorKind::IllegalMove);

    assert_eq!(game.view(), before);
    assert!(game.history().is_empty());
}

/// Test that only the seat at the turn pointer may act in turn-based play.
#[test]
fn test_no_out_of_turn_mutation() {
    let mut game = started(GameStyle::Single, 5);

    for _ in 0..3 {
        let before = game.view();
        let expected = game.current_turn().unwrap();
        let (actor, idle) = if expected == PlayerId::new(0) { (A, B) } else { (B, A) };

        let err = game.draw(idle).unwrap_err();
        assert_eq!(err, EngineError::NotYourTurn { expected });
        let tile = game.hand(idle).unwrap().tiles()[0].id;
        assert_eq!(game.discard(idle, tile).unwrap_err().kind(), ErrorKind::NotYourTurn);
        assert_eq!(game.view(), before);

        game.draw(actor).unwrap();
    }
}

/// Test that once the pool is empty no draw grows a hand.
#[test]
fn test_exhaustion_monotonicity() {
    let mut game = started(GameStyle::Rush, 8);
    while game.remaining() != Some(0) {
        game.draw(A).unwrap();
    }
    let held = hand_size(&game, A);

    for _ in 0..3 {
        let outcome = game.draw(A).unwrap();
        assert!(outcome.drawn.is_empty());
        assert_eq!(outcome.clone().exhausted().unwrap_err().kind(), ErrorKind::PoolExhausted);
        assert_eq!(hand_size(&game, A), held);
    }
    assert_eq!(total(&game), 20);
}

/// Test a discard penalty larger than what is left.
#[test]
fn test_discard_partial_penalty() {
    let mut game = started(GameStyle::Rush, 3);
    for _ in 0..9 {
        game.draw(B).unwrap();
    }
    assert_eq!(game.remaining(), Some(1));

    let tile = game.hand(A).unwrap().tiles()[0].id;
    let outcome = game.discard(A, tile).unwrap();

    // Returned tile plus the one left: two granted of four.
    let exhaustion = outcome.exhaustion.unwrap();
    assert_eq!((exhaustion.requested, exhaustion.granted), (4, 2));
    assert_eq!(hand_size(&game, A), 6);
    assert_eq!(game.remaining(), Some(0));
    assert_eq!(game.lifecycle(), Lifecycle::Active);
    assert_eq!(total(&game), 20);
}

/// Test that turn-based games end on exhaustion with the fewest tiles winning.
#[test]
fn test_single_game_runs_to_completion() {
    let mut game = started(GameStyle::Single, 21);

    // A draws while B discards, so B ends up with the bigger hand.
    let mut rounds = 0;
    while game.lifecycle() == Lifecycle::Active {
        let outcome = match game.current_turn() {
            Some(seat) if seat == PlayerId::new(0) => game.draw(A).unwrap(),
            _ => {
                let tile = game.hand(B).unwrap().tiles()[0].id;
                game.discard(B, tile).unwrap()
            }
        };
        assert_eq!(total(&game), 20);
        rounds += 1;
        assert!(rounds < 100, "game never ended");

        if let Some(result) = outcome.result {
            assert_eq!(result, GameResult::Winner(PlayerId::new(0)));
        }
    }

    assert_eq!(game.lifecycle(), Lifecycle::Finished);
    assert!(game.view().table.unwrap().result.is_some());
}

/// Test per-player pool sizing.
#[test]
fn test_tiles_per_player() {
    let config = two_player_config().with_tiles(15).with_tiles_per_player(true);
    let mut game = GameSession::new(SessionId(2), A, GameStyle::Rush, config, GameRng::new(0)).unwrap();
    game.join(B).unwrap();
    game.start().unwrap();

    assert_eq!(game.remaining(), Some(20));
    assert_eq!(game.view().table.unwrap().total, 30);
}

/// Test that abandoning mid-game keeps the table intact for the snapshot.
#[test]
fn test_abandon_keeps_accounting() {
    let mut game = started(GameStyle::Rush, 4);
    game.draw(A).unwrap();
    game.peel(B, 0).unwrap();

    game.abandon("room closed").unwrap();
    assert_eq!(game.lifecycle(), Lifecycle::Abandoned);
    assert_eq!(total(&game), 20);
    assert!(game.check_conservation().is_ok());

    for err in [
        game.draw(A).unwrap_err(),
        game.peel(A, 1).unwrap_err(),
        game.start().unwrap_err(),
        game.abandon("twice").unwrap_err(),
    ] {
        assert_eq!(err, EngineError::GameClosed { lifecycle: Lifecycle::Abandoned });
    }
}

/// Test the public representation through a lifecycle.
#[test]
fn test_view_json_through_lifecycle() {
    let mut game =
        GameSession::new(SessionId(3), A, GameStyle::Single, two_player_config(), GameRng::new(1))
            .unwrap();

    let json = serde_json::to_value(game.view()).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["owner"], 100);
    assert_eq!(json["style"], "single");
    assert_eq!(json["open"], true);
    assert_eq!(json["lifecycle"], "pending");
    assert!(json.get("table").is_none());

    game.join(B).unwrap();
    game.start().unwrap();
    let json = serde_json::to_value(game.view()).unwrap();
    assert_eq!(json["lifecycle"], "active");
    assert_eq!(json["table"]["remaining"], 10);
    assert_eq!(json["table"]["turn"], 0);
    assert_eq!(json["table"]["seats"][0]["hand_size"], 5);
    assert_eq!(json["config"]["discard_penalty"], 3);
}
