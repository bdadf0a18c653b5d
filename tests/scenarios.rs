//! End-to-end game scenarios against the rapier physics world

mod common;

use common::{game, game_with, journaled_game, line_up, line_up_relative};
use tower_stack::Tuning;
use tower_stack::persistence::ScoreRecord;
use tower_stack::platform::Screen;
use tower_stack::score::SaveError;
use tower_stack::sim::{
    CutReport, GameOverCause, GamePhase, Interaction, LoopState, RigidBodyWorld, SceneGraph,
};

#[test]
fn perfect_cut_keeps_width() {
    let (mut game, _) = game();
    assert_eq!(game.on_interact(), Interaction::Started);

    line_up(&mut game, 0.0);
    let outcome = game.on_interact();

    assert!(matches!(
        outcome,
        Interaction::Cut(CutReport::Placed { overhang: None, .. })
    ));
    let session = game.session().unwrap();
    assert_eq!(session.round, 1);
    assert_eq!(session.tower[1].width, 2.0);
    assert!(session.dropped.is_empty());
    assert_eq!(game.score(), 1);
}

#[test]
fn partial_cut_drops_overhang_on_delta_side() {
    let (mut game, _) = game();
    game.on_interact();
    line_up(&mut game, 0.0);
    game.on_interact();

    // Second layer swings on Z, one unit off the layer below
    line_up_relative(&mut game, 1.0);
    let outcome = game.on_interact();

    let Interaction::Cut(CutReport::Placed {
        overlap,
        delta,
        overhang: Some(overhang),
    }) = outcome
    else {
        panic!("expected a placement with overhang, got {outcome:?}");
    };
    assert_eq!(overlap, 1.0);
    assert_eq!(delta, 1.0);

    let session = game.session().unwrap();
    assert_eq!(session.round, 2);
    let placed = &session.tower[2];
    assert_eq!(placed.depth, 1.0);
    assert_eq!(placed.width, 2.0);
    assert_eq!(placed.position.z, 0.5);

    let dropped = &session.dropped[0];
    assert_eq!(dropped.id, overhang);
    assert_eq!(dropped.depth, 1.0);
    assert_eq!(dropped.position.z, placed.position.z + 1.0);

    let next = session.active.as_ref().unwrap();
    assert_eq!(next.depth, 1.0);
    assert_eq!(next.width, 2.0);
}

#[test]
fn miss_ends_game_without_new_layer() {
    let (mut game, _) = game();
    game.on_interact();
    let active_id = game.session().unwrap().active.as_ref().unwrap().id;

    line_up(&mut game, 3.0);
    assert_eq!(
        game.on_interact(),
        Interaction::Cut(CutReport::Missed { dropped: active_id })
    );

    assert!(game.is_game_over());
    assert_eq!(game.cause(), Some(GameOverCause::Missed));
    let session = game.session().unwrap();
    assert_eq!(session.tower.len(), 1);
    assert!(session.active.is_none());
    assert_eq!(session.dropped.len(), 1);
    assert_eq!(session.dropped[0].id, active_id);
    assert_eq!(game.score(), 0);

    // No more cuts
    assert_eq!(game.on_interact(), Interaction::Ignored);
}

#[test]
fn falling_overhang_ends_game_on_first_tick_below_floor() {
    let (mut game, _) = game();
    game.on_interact();
    line_up_relative(&mut game, 1.0);
    game.on_interact();
    assert_eq!(game.phase(), GamePhase::Playing);

    let floor = game.tuning().game_over_floor;
    let mut ended_at = None;
    // The overhang pivots off the edge of the base before it drops clear
    for t in 1..=180 {
        assert!(game.tick());
        let below = game
            .session()
            .unwrap()
            .dropped
            .iter()
            .any(|d| d.position.y < floor);
        assert_eq!(game.is_game_over(), below, "tick {t}");
        if below {
            ended_at = Some(t);
            break;
        }
    }

    assert!(ended_at.is_some());
    assert_eq!(game.cause(), Some(GameOverCause::Fell));
    assert_eq!(game.round(), 1);
}

#[test]
fn first_cloud_only_after_camera_passes_interval() {
    let (mut game, _) = game();
    game.on_interact();
    for _ in 0..4 {
        line_up_relative(&mut game, 0.0);
        game.on_interact();
    }

    let interval = game.tuning().cloud_interval;
    let mut spawned_at = None;
    for _ in 0..2000 {
        game.tick();
        let view = game.view();
        if view.clouds > 0 {
            spawned_at = Some(view.camera_y);
            break;
        }
        assert!(view.camera_y <= interval);
    }

    let camera_y = spawned_at.expect("camera should climb past the interval");
    assert!(camera_y > interval);
    let cloud = &game.session().unwrap().clouds[0];
    assert_eq!(cloud.position.y, camera_y + game.tuning().cloud_rise);
}

#[test]
fn game_over_keeps_simulating_but_freezes_swing_and_camera() {
    let (mut game, _) = game();
    game.on_interact();
    line_up(&mut game, 3.0);
    game.on_interact();

    let angle = game.session().unwrap().angle;
    let camera_y = game.view().camera_y;
    let y0 = game.session().unwrap().dropped[0].position.y;
    for _ in 0..10 {
        assert!(game.tick());
    }

    let session = game.session().unwrap();
    assert_eq!(session.angle, angle);
    assert_eq!(game.view().camera_y, camera_y);
    assert!(session.dropped[0].position.y < y0);
    assert_eq!(game.scene().frames_rendered(), 10);
}

#[test]
fn restart_twice_leaks_nothing() {
    let (mut game, harness) = game();
    game.on_interact();
    line_up_relative(&mut game, 0.7);
    game.on_interact();
    for _ in 0..30 {
        game.tick();
    }
    assert!(game.world().body_count() > 0);
    assert_eq!(harness.borrow().input.active_count(), 1);

    game.restart();
    game.restart();

    assert_eq!(game.phase(), GamePhase::Idle);
    assert_eq!(game.loop_state(), LoopState::Stopped);
    assert_eq!(game.world().body_count(), 0);
    assert_eq!(game.scene().node_count(), 0);
    assert_eq!(harness.borrow().input.active_count(), 0);
    assert!(!game.tick());
}

#[test]
fn teardown_stops_then_removes_bodies_then_nodes_then_input() {
    let (mut game, harness, journal) = journaled_game();
    game.on_interact();
    line_up_relative(&mut game, 0.7);
    game.on_interact();
    for _ in 0..5 {
        assert!(game.tick());
    }
    let bodies = game.world().body_count();
    let nodes = game.scene().node_count();
    journal.borrow_mut().clear();

    game.restart();
    assert!(!game.tick());

    let calls = journal.borrow().clone();
    let last_body = calls.iter().rposition(|c| *c == "remove_body").unwrap();
    let first_node = calls.iter().position(|c| *c == "remove_node").unwrap();
    let last_node = calls.iter().rposition(|c| *c == "remove_node").unwrap();
    let unsubscribe = calls.iter().position(|c| *c == "unsubscribe").unwrap();
    assert!(last_body < first_node, "{calls:?}");
    assert!(last_node < unsubscribe, "{calls:?}");
    assert_eq!(unsubscribe, calls.len() - 1, "{calls:?}");
    // No physics once teardown has begun
    assert!(!calls.contains(&"step"), "{calls:?}");
    assert_eq!(calls.iter().filter(|c| **c == "remove_body").count(), bodies);
    assert_eq!(calls.iter().filter(|c| **c == "remove_node").count(), nodes);
    assert_eq!(game.world().body_count(), 0);
    assert_eq!(harness.borrow().input.active_count(), 0);
}

#[test]
fn new_session_replaces_old_one_wholesale() {
    let (mut game, harness) = game();
    game.on_interact();
    line_up(&mut game, 3.0);
    game.on_interact();
    game.restart();

    assert_eq!(game.on_interact(), Interaction::Started);
    // Only the fresh ground and base bodies; ground, base and active nodes
    assert_eq!(game.world().body_count(), 2);
    assert_eq!(game.scene().node_count(), 3);
    assert_eq!(harness.borrow().input.active_count(), 1);
    assert_eq!(game.round(), 0);
    assert!(!game.is_saved());
}

#[test]
fn save_once_after_game_over() {
    let (mut game, harness) = game();
    game.on_interact();
    for _ in 0..3 {
        line_up_relative(&mut game, 0.0);
        game.on_interact();
    }
    line_up(&mut game, 5.0);
    game.on_interact();
    assert!(game.is_game_over());

    let record = game.save_score_at(" ada ", 1_000.0).unwrap();
    assert_eq!(
        record,
        ScoreRecord {
            name: "ada".into(),
            score: 3,
            timestamp: 1_000.0
        }
    );
    assert!(game.is_saved());
    assert_eq!(game.settings().player_name.as_deref(), Some("ada"));
    assert!(matches!(game.save_score("ada"), Err(SaveError::AlreadySaved)));
    assert_eq!(harness.borrow().saved.len(), 1);
}

#[test]
fn failed_save_leaves_game_state_alone() {
    let (mut game, harness) = game();
    game.on_interact();
    line_up(&mut game, 3.0);
    game.on_interact();

    harness.borrow_mut().fail_saves = true;
    assert!(matches!(
        game.save_score("bo"),
        Err(SaveError::Persistence(_))
    ));
    assert!(!game.is_saved());
    assert!(game.is_game_over());

    harness.borrow_mut().fail_saves = false;
    assert!(game.save_score("bo").is_ok());
    assert!(game.is_saved());
}

#[test]
fn navigation_only_on_request() {
    let (mut game, harness) = game();
    game.on_interact();
    line_up(&mut game, 3.0);
    game.on_interact();
    for _ in 0..120 {
        game.tick();
    }
    assert!(harness.borrow().screens.is_empty());

    game.view_leaderboard();
    assert_eq!(harness.borrow().screens, vec![Screen::Leaderboard]);
    assert_eq!(game.world().body_count(), 0);
    assert_eq!(game.phase(), GamePhase::Idle);

    game.back_to_menu();
    assert_eq!(
        harness.borrow().screens,
        vec![Screen::Leaderboard, Screen::Menu]
    );
}

#[test]
fn faster_swing_in_later_rounds() {
    let tuning = Tuning {
        speed_per_round: 0.01,
        ..Tuning::default()
    };
    let (mut game, _) = game_with(tuning);
    game.on_interact();
    game.tick();
    let first = game.session().unwrap().angle;

    line_up_relative(&mut game, 0.0);
    game.on_interact();
    let before = game.session().unwrap().angle;
    game.tick();
    let second = game.session().unwrap().angle - before;

    assert!(second > first);
}
