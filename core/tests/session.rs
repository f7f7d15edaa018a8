//! Sessions persist every day and command to SQLite.

mod common;

use common::config;
use lemonade_core::{
    command::PlayerCommand,
    error::{Rejection, SimError},
    session::GameSession,
    store::SimStore,
    types::{EventKind, SupplyKind},
};

fn new_session(seed: u64) -> GameSession {
    let store = SimStore::in_memory().expect("in-memory store");
    GameSession::create(store, config(), seed, Some(format!("test-{seed}"))).expect("create session")
}

fn stock_up(session: &mut GameSession) {
    for item in SupplyKind::ALL {
        session
            .apply(PlayerCommand::BuySupplies { item, quantity: 10 })
            .expect("affordable restock");
    }
}

#[test]
fn days_are_persisted_as_they_resolve() {
    let mut session = new_session(5);
    for _ in 0..3 {
        session.start_day().expect("start_day");
    }

    let store = session.store();
    assert_eq!(session.state().day_number, 4);
    assert_eq!(store.day_summary_count("test-5").expect("count"), 3);
    assert_eq!(store.event_count("test-5", "day_resolved").expect("count"), 3);
    assert_eq!(store.event_count("test-5", "day_started").expect("count"), 3);

    let history = session.history().expect("history");
    assert_eq!(history, session.state().history, "stored history mirrors the state");

    let saved = store.load_state("test-5").expect("load").expect("saved");
    assert_eq!(&saved.state, session.state());
    assert!(store.state_saved_at("test-5").expect("saved_at").is_some());
}

#[test]
fn day_events_are_logged_in_order() {
    let mut session = new_session(8);
    session.start_day().expect("start_day");

    let entries = session.store().events_for_day("test-8", 1).expect("events");
    let first = entries.first().expect("some events");
    let last = entries.last().expect("some events");
    assert_eq!(first.event_type, "day_started");
    assert_eq!(last.event_type, "day_completed");
    assert!(entries.iter().any(|e| e.event_type == "demand_estimated" && e.subsystem == "demand"));
}

#[test]
fn generated_session_ids_are_unique() {
    let a = GameSession::create(SimStore::in_memory().expect("store"), config(), 1, None)
        .expect("create a");
    let b = GameSession::create(SimStore::in_memory().expect("store"), config(), 1, None)
        .expect("create b");
    assert_ne!(a.session_id(), b.session_id());
    assert_eq!(a.session_id().len(), 36, "uuid v4 string");
}

#[test]
fn rejected_commands_are_logged_and_returned() {
    let mut session = new_session(9);
    let before = session.state().clone();

    let err = session
        .apply(PlayerCommand::SetPrice { price: 6.0 })
        .expect_err("rejected");

    assert!(matches!(err, SimError::Rejected(Rejection::PriceOutOfRange { .. })), "got {err:?}");
    assert_eq!(session.state(), &before);
    assert_eq!(session.store().event_count("test-9", "command_rejected").expect("count"), 1);
    assert_eq!(session.store().event_count("test-9", "command_applied").expect("count"), 0);
}

#[test]
fn reset_clears_the_stored_history() {
    let mut session = new_session(10);
    session.start_day().expect("day 1");
    session.start_day().expect("day 2");

    session.apply(PlayerCommand::Reset).expect("reset");

    assert_eq!(session.state().day_number, 1);
    assert_eq!(session.store().day_summary_count("test-10").expect("count"), 0);
    session.start_day().expect("day 1 again");
    assert_eq!(session.store().day_summary_count("test-10").expect("count"), 1);
}

/// Restoring an earlier snapshot rewinds the session, and replaying
/// the next day reproduces it exactly.
#[test]
fn restored_snapshot_replays_identically() {
    let mut session = new_session(77);
    stock_up(&mut session);
    session.start_day().expect("day 1");
    session.start_day().expect("day 2");
    let snapshot = session.snapshot();

    let day3 = session.start_day().expect("day 3");
    session.start_day().expect("day 4");

    session.restore(snapshot.clone()).expect("restore");
    assert_eq!(session.state(), &snapshot.state);
    assert_eq!(session.store().day_summary_count("test-77").expect("count"), 2);

    let replayed = session.start_day().expect("day 3 replayed");
    assert_eq!(replayed.summary, day3.summary);
    assert_eq!(replayed.log, day3.log);
}

#[test]
fn tampered_snapshot_is_refused() {
    let mut session = new_session(12);
    let mut snapshot = session.snapshot();
    snapshot.state.reputation = 150.0;

    let err = session.restore(snapshot).expect_err("reputation out of range");
    assert!(matches!(err, SimError::InvalidSnapshot { .. }), "got {err:?}");

    let mut foreign = session.snapshot();
    foreign.session_id = "someone-else".into();
    assert!(matches!(session.restore(foreign), Err(SimError::InvalidSnapshot { .. })));
}

#[test]
fn forced_event_flows_through_the_session() {
    let mut session = new_session(13);
    session.force_next_event(EventKind::Celebrity);
    let result = session.start_day().expect("start_day");
    assert_eq!(result.event, Some(EventKind::Celebrity));
    assert_eq!(result.summary.event_cash, 50.0);
}

#[test]
fn sessions_resume_from_disk() {
    let path = std::env::temp_dir().join(format!("lemonade-session-{}.db", uuid::Uuid::new_v4()));
    let path_str = path.to_str().expect("utf-8 temp path").to_string();

    let (session_id, state) = {
        let store = SimStore::open(&path_str).expect("open");
        let mut session = GameSession::create(store, config(), 4242, None).expect("create");
        stock_up(&mut session);
        session.start_day().expect("day 1");
        session.start_day().expect("day 2");
        (session.session_id().to_string(), session.state().clone())
    };

    let store = SimStore::open(&path_str).expect("reopen");
    let mut resumed = GameSession::resume(store, config(), &session_id).expect("resume");
    assert_eq!(resumed.state(), &state);
    assert_eq!(resumed.seed(), 4242);
    resumed.start_day().expect("day 3");
    assert_eq!(resumed.history().expect("history").len(), 3);

    drop(resumed);
    let _ = std::fs::remove_file(&path);
}

/// A day whose writes fail leaves the session where the store left it.
/// Two handles on one session race for day 1; the loser's summary insert
/// conflicts and its in-memory state must not move ahead.
#[test]
fn failed_day_writes_leave_the_state_unchanged() {
    common::init_logging();
    let path = std::env::temp_dir().join(format!("lemonade-session-{}.db", uuid::Uuid::new_v4()));
    let path_str = path.to_str().expect("utf-8 temp path").to_string();

    let store = SimStore::open(&path_str).expect("open");
    let mut winner = GameSession::create(store, config(), 77, Some("shared".into())).expect("create");
    let store = SimStore::open(&path_str).expect("second handle");
    let mut loser = GameSession::resume(store, config(), "shared").expect("resume");
    let before = loser.state().clone();

    winner.start_day().expect("first writer wins day 1");
    assert!(loser.start_day().is_err(), "day 1 is already stored");

    assert_eq!(loser.state(), &before, "state must not run ahead of the store");
    assert_eq!(loser.state().day_number, 1);
    assert_eq!(loser.store().day_summary_count("shared").expect("count"), 1);
    assert_eq!(
        loser.store().event_count("shared", "day_resolved").expect("count"),
        1,
        "the failed day logs nothing"
    );
    let saved = loser.store().load_state("shared").expect("load").expect("saved");
    assert_eq!(&saved.state, winner.state(), "the stored state is the winner's");

    drop(winner);
    drop(loser);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn resuming_an_unknown_session_fails() {
    let store = SimStore::in_memory().expect("store");
    let err = GameSession::resume(store, config(), "missing")
        .err()
        .expect("no such session");
    assert!(matches!(err, SimError::SessionNotFound { .. }), "got {err:?}");
}
