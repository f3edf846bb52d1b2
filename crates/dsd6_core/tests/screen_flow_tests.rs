//! End-to-end navigation of the screen graph with a live deck and ship.
//!
//! Drives the machine the way a presentation layer would: hooks record what
//! they see, guards gate menu entries, and a saved game is restored into a
//! freshly loaded session.

use dsd6_core::fsm::{FsmError, State, StateMachine};
use dsd6_core::identity::IdAllocator;
use dsd6_core::save_game::SaveGame;
use dsd6_core::screens::{Screen, ScreenGraph, SCREEN_TRANSITIONS};
use dsd6_test_utils::determinism::catalogue_indices;
use dsd6_test_utils::fixtures::{sample_deck, sample_ship, HookEvent, HookLog, RecordingHooks};

fn wired() -> (StateMachine<HookLog>, ScreenGraph, IdAllocator) {
    let mut ids = IdAllocator::new();
    let mut machine = StateMachine::new();
    let graph = ScreenGraph::build(&mut machine, &mut ids, |_| RecordingHooks).unwrap();
    (machine, graph, ids)
}

// ==========================================================================
// Navigation
// ==========================================================================

#[test]
fn test_new_game_path_calls_hooks_in_order() {
    let (mut machine, graph, _ids) = wired();
    let mut log = HookLog::new();

    machine.start(&mut log, graph.state_id(Screen::Splash)).unwrap();
    for screen in [Screen::MainMenu, Screen::NewGame, Screen::GamePlay] {
        let entered = machine
            .fire_from_current(&mut log, Some(graph.state_id(screen)), None)
            .unwrap();
        assert_eq!(graph.screen(entered), Some(screen));
    }

    assert_eq!(
        log,
        vec![
            HookEvent::enter("splash_screen", None),
            HookEvent::leave("splash_screen", "main_menu_screen"),
            HookEvent::enter("main_menu_screen", Some("splash_screen")),
            HookEvent::leave("main_menu_screen", "new_game_screen"),
            HookEvent::enter("new_game_screen", Some("main_menu_screen")),
            HookEvent::leave("new_game_screen", "game_play_screen"),
            HookEvent::enter("game_play_screen", Some("new_game_screen")),
        ]
    );
}

#[test]
fn test_guarded_menu_entry() {
    let (mut machine, graph, _ids) = wired();
    let game_play = graph.state_id(Screen::GamePlay);
    let menu = graph.state_id(Screen::GamePlayMenu);
    machine
        .set_guard(
            game_play,
            menu,
            Some(Box::new(|_: &State, target: &State| target.name() != "game_play_menu_screen")),
        )
        .unwrap();

    let mut log = HookLog::new();
    machine.start(&mut log, game_play).unwrap();
    log.clear();

    let err = machine
        .fire_from_current(&mut log, Some(menu), None)
        .unwrap_err();
    assert!(matches!(err, FsmError::GuardFailed { .. }));
    assert!(log.is_empty());
    assert_eq!(machine.current(), Some(game_play));

    machine.set_guard(game_play, menu, None).unwrap();
    assert_eq!(machine.fire_from_current(&mut log, Some(menu), None).unwrap(), menu);
    assert_eq!(log.len(), 2);
}

#[test]
fn test_every_wired_transition_fires() {
    let (mut machine, graph, _ids) = wired();
    let mut log = HookLog::new();
    for (source, target) in SCREEN_TRANSITIONS {
        let entered = machine
            .fire_transition(
                &mut log,
                graph.state_id(source),
                Some(graph.state_id(target)),
                None,
            )
            .unwrap();
        assert_eq!(graph.screen(entered), Some(target));
    }
    assert_eq!(log.len(), SCREEN_TRANSITIONS.len() * 2);
}

// ==========================================================================
// Save and restore
// ==========================================================================

#[test]
fn test_saved_game_restores_into_new_session() {
    let mut ids = IdAllocator::new();
    let mut deck = sample_deck(&mut ids, 77);
    let mut ship = sample_ship(&mut ids);
    deck.shuffle_deck(true);
    for _ in 0..3 {
        let id = deck.draw_card().unwrap();
        deck.discard_card(id).unwrap();
    }
    let destroyed = deck.draw_card().unwrap();
    deck.destroy_card(destroyed).unwrap();
    let scout = deck.id_at(2).unwrap();
    deck.card_mut(scout).unwrap().dec_health(2);
    ship.move_crew_to_infirmary(3);
    ship.damage_shields(1);

    let save = SaveGame::capture(&deck, &ship, Screen::GamePlayMenu).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slot.sav");
    save.save(&path).unwrap();

    // Ids in the new session are offset by a different allocator history.
    let mut other_ids = IdAllocator::starting_at(7_000_000_000);
    let mut fresh_deck = sample_deck(&mut other_ids, 1);
    let mut fresh_ship = sample_ship(&mut other_ids);
    SaveGame::load(&path)
        .unwrap()
        .apply(&mut fresh_deck, &mut fresh_ship)
        .unwrap();

    assert_eq!(
        catalogue_indices(&fresh_deck, fresh_deck.available_cards()),
        catalogue_indices(&deck, deck.available_cards())
    );
    assert_eq!(
        catalogue_indices(&fresh_deck, fresh_deck.discarded_cards()),
        catalogue_indices(&deck, deck.discarded_cards())
    );
    assert_eq!(
        catalogue_indices(&fresh_deck, fresh_deck.destroyed_cards()),
        catalogue_indices(&deck, deck.destroyed_cards())
    );
    assert!(fresh_deck.is_partitioned());

    let fresh_scout = fresh_deck.id_at(2).unwrap();
    assert_eq!(
        fresh_deck.card(fresh_scout).unwrap().health(),
        deck.card(scout).unwrap().health()
    );
    assert_eq!(fresh_ship.infirmary_count(), 3);
    assert_eq!(fresh_ship.shield_points(), 3);
    assert_eq!(save.screen(), Some(Screen::GamePlayMenu));
}
