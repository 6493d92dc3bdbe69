use charades_app::encode_reply;
use charades_app::session::{Command, Reply, Session};
use charades_core::{
    DeckEngine, DeckLibrary, Game, GameEvent, ManualClock, PersistedState,
};
use charades_persistence::{GameStorage, MemoryStateStorage};
use charades_types::{DEFAULT_DECK, GamePhase, Limit, WordStatus};
use tokio_test::assert_ok;

fn test_session(premium: bool) -> (Session<MemoryStateStorage>, ManualClock) {
    let mut library = DeckLibrary::new();
    library.add_deck(DEFAULT_DECK, "Anchor\nBalloon\nCastle\nDragon\nEngine");
    library.add_deck("animals", "Otter\nPenguin");

    let clock = ManualClock::new();
    let game = Game::new(
        DeckEngine::with_seed(library, 11),
        Box::new(premium),
        Box::new(clock.clone()),
    );
    let session = Session::new(game, GameStorage::new(MemoryStateStorage::new()));
    (session, clock)
}

fn update(reply: Reply) -> (bool, Vec<GameEvent>, PersistedState) {
    match reply {
        Reply::Update {
            accepted,
            events,
            state,
        } => (accepted, events, *state),
        Reply::Error { reason } => panic!("unexpected error reply: {}", reason),
    }
}

async fn stored_state(session: &Session<MemoryStateStorage>) -> PersistedState {
    session.storage().load().await
}

#[tokio::test]
async fn test_json_commands_drive_the_game() {
    let (mut session, _clock) = test_session(true);

    let (accepted, events, state) =
        update(session.handle_line(r#"{"type":"start_game"}"#).await);
    assert!(accepted);
    assert!(matches!(events[0], GameEvent::GameStarted { teams: 2, deck_size: 5 }));
    assert_eq!(state.phase, GamePhase::ReadyCheck);

    update(session.handle_line(r#"{"type":"start_turn"}"#).await);
    update(session.handle_line(r#"{"type":"finish_countdown"}"#).await);
    let (accepted, events, _) = update(
        session
            .handle_line(r#"{"type":"mark_word","status":"GotIt"}"#)
            .await,
    );
    assert!(accepted);
    assert!(events.iter().any(|e| e.name() == "word_marked"));
}

#[tokio::test]
async fn test_bad_json_is_an_error_reply() {
    let (mut session, _clock) = test_session(true);
    let reply = session.handle_line("start please").await;
    assert!(matches!(reply, Reply::Error { .. }));
    assert!(encode_reply(&reply).starts_with(r#"{"type":"error""#));
}

#[tokio::test]
async fn test_rejected_command_still_replies_with_state() {
    let (mut session, _clock) = test_session(true);
    let (accepted, events, state) = update(session.handle(Command::NextTeam).await);
    assert!(!accepted);
    assert!(events.is_empty());
    assert_eq!(state.phase, GamePhase::Setup);
}

#[tokio::test]
async fn test_skip_refused_at_zero_budget() {
    let (mut session, _clock) = test_session(true);
    session
        .handle(Command::SetSkipsPerTurn {
            skips: Limit::Finite(1),
        })
        .await;
    session.handle(Command::StartGame).await;
    session.handle(Command::StartTurn).await;
    session.handle(Command::FinishCountdown).await;

    let skip = Command::MarkWord {
        status: WordStatus::Skipped,
    };
    let (first, _, _) = update(session.handle(skip.clone()).await);
    let (second, _, _) = update(session.handle(skip).await);
    assert!(first);
    assert!(!second);
    assert_eq!(session.game().skips_remaining(), Some(Limit::Finite(0)));
}

#[tokio::test]
async fn test_every_command_is_saved() {
    let (mut session, _clock) = test_session(true);
    session
        .handle(Command::AddTeam {
            name: "Owls".to_string(),
        })
        .await;
    session
        .handle(Command::SetRoundDuration { seconds: 90 })
        .await;

    let saved = stored_state(&session).await;
    assert_eq!(saved.teams.len(), 3);
    assert_eq!(saved.teams[2].name, "Owls");
    assert_eq!(saved.settings.round_duration, 90);
}

#[tokio::test]
async fn test_clock_ticks_flow_through_session() {
    let (mut session, clock) = test_session(true);
    session.handle(Command::StartGame).await;
    session.handle(Command::StartTurn).await;

    let mut countdown = Vec::new();
    while let Some(tick) = clock.tick() {
        let (_, events, _) = update(session.clock_tick(tick).await);
        countdown.extend(events.into_iter().filter_map(|e| match e {
            GameEvent::CountdownTick { remaining } => Some(remaining),
            _ => None,
        }));
        if session.game().time_remaining().is_some() && countdown.len() == 3 {
            break;
        }
    }
    assert_eq!(countdown, vec![2, 1, 0]);
    assert_eq!(session.game().time_remaining(), Some(60));

    let tick = clock.tick().unwrap();
    update(session.clock_tick(tick).await);
    assert_eq!(stored_state(&session).await.phase, session.game().snapshot().phase);
}

#[tokio::test]
async fn test_focus_lost_pauses_and_saves() {
    let (mut session, clock) = test_session(true);
    session.handle(Command::StartGame).await;
    session.handle(Command::StartTurn).await;
    session.handle(Command::FinishCountdown).await;

    let (_, events, state) = update(session.focus_lost().await);
    assert!(state.is_paused);
    assert_eq!(events, vec![GameEvent::PauseChanged { paused: true }]);
    assert!(!clock.is_running());
    assert!(stored_state(&session).await.is_paused);
}

#[tokio::test]
async fn test_select_deck_needs_known_deck() {
    let (mut session, _clock) = test_session(true);
    let (known, _, state) = update(
        session
            .handle(Command::SelectDeck {
                name: "animals".to_string(),
            })
            .await,
    );
    assert!(known);
    assert_eq!(state.settings.selected_deck, "animals");

    let (unknown, _, _) = update(
        session
            .handle(Command::SelectDeck {
                name: "nope".to_string(),
            })
            .await,
    );
    assert!(!unknown);
}

#[tokio::test]
async fn test_reply_encodes_as_one_line() {
    let (mut session, _clock) = test_session(false);
    let reply = session.handle(Command::Snapshot).await;
    let line = encode_reply(&reply);
    assert!(!line.contains('\n'));

    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["type"], "update");
    assert_eq!(value["state"]["phase"]["phase"], "Setup");
}

#[tokio::test]
async fn test_resumed_session_starts_paused() {
    let (mut session, _clock) = test_session(true);
    session.handle(Command::StartGame).await;
    session.handle(Command::StartTurn).await;
    session.handle(Command::FinishCountdown).await;
    let saved = stored_state(&session).await;
    assert!(saved.is_paused);

    let clock = ManualClock::new();
    let game = Game::restore(
        saved,
        DeckEngine::with_seed(DeckLibrary::builtin(), 2),
        Box::new(true),
        Box::new(clock.clone()),
    );
    assert!(game.is_paused());
    assert!(!clock.is_running());

    let storage = GameStorage::new(MemoryStateStorage::new());
    assert_ok!(storage.save(&game.snapshot()).await);
}

#[tokio::test]
async fn test_focus_lost_command_only_ever_pauses() {
    let (mut session, clock) = test_session(true);
    session.handle(Command::StartGame).await;
    session.handle(Command::StartTurn).await;
    session.handle(Command::FinishCountdown).await;

    let (accepted, events, state) = update(session.handle_line(r#"{"type":"focus_lost"}"#).await);
    assert!(accepted);
    assert!(state.is_paused);
    assert_eq!(events, vec![GameEvent::PauseChanged { paused: true }]);

    let (accepted, events, state) = update(session.handle(Command::FocusLost).await);
    assert!(accepted);
    assert!(state.is_paused);
    assert!(events.is_empty());
    assert!(!clock.is_running());
    assert!(stored_state(&session).await.is_paused);
}

#[tokio::test]
async fn test_set_deck_config_replaces_selection_and_words() {
    let (mut session, _clock) = test_session(true);
    session
        .handle(Command::AddCustomWord {
            word: "Lantern".to_string(),
        })
        .await;

    let (accepted, _, state) = update(
        session
            .handle_line(
                r#"{"type":"set_deck_config","name":"animals","custom_words":[" Walrus ",""]}"#,
            )
            .await,
    );
    assert!(accepted);
    assert_eq!(state.settings.selected_deck, "animals");
    assert_eq!(state.settings.custom_words, vec!["Walrus".to_string()]);

    let (unknown, _, state) = update(
        session
            .handle(Command::SetDeckConfig {
                name: "nope".to_string(),
                custom_words: Vec::new(),
            })
            .await,
    );
    assert!(!unknown);
    assert_eq!(state.settings.selected_deck, "animals");
}
