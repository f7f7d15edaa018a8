//! A player session: one GameState, the engine that advances it and the
//! store that keeps it.
//!
//! The session is the only writer of its state. Every successful
//! mutation is persisted before the call returns.

use crate::{
    command::PlayerCommand,
    config::SimConfig,
    engine::{DayEngine, DayResult},
    error::{SimError, SimResult},
    event::{EventLogEntry, SimEvent},
    snapshot::GameSnapshot,
    state::{DaySummary, GameState},
    store::SimStore,
    types::{EventKind, SessionId},
};

pub struct GameSession {
    session_id: SessionId,
    config: SimConfig,
    state: GameState,
    engine: DayEngine,
    store: SimStore,
}

impl GameSession {
    /// Start a new session with a fresh stand. A uuid is generated when
    /// `session_id` is None.
    pub fn create(
        store: SimStore,
        config: SimConfig,
        seed: u64,
        session_id: Option<SessionId>,
    ) -> SimResult<Self> {
        store.migrate()?;
        let session_id = session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        store.insert_session(&session_id, seed, env!("CARGO_PKG_VERSION"))?;

        let state = GameState::new(&config);
        let engine = DayEngine::build(seed, &config);
        let session = Self { session_id, config, state, engine, store };
        session.save()?;

        log::info!("session {} created (seed={seed})", session.session_id);
        Ok(session)
    }

    /// Pick a stored session back up from its last saved state.
    pub fn resume(store: SimStore, config: SimConfig, session_id: &str) -> SimResult<Self> {
        store.migrate()?;
        let seed = store.session_seed(session_id)?;
        let snapshot = store
            .load_state(session_id)?
            .ok_or_else(|| SimError::SessionNotFound { session_id: session_id.to_string() })?;
        let state = snapshot.restore(&config)?;
        let engine = DayEngine::build(seed, &config);

        log::info!("session {session_id} resumed at day {}", state.day_number);
        Ok(Self {
            session_id: session_id.to_string(),
            config,
            state,
            engine,
            store,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn seed(&self) -> u64 {
        self.engine.rng_bank.master_seed()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn store(&self) -> &SimStore {
        &self.store
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.session_id, &self.state)
    }

    /// Replace the current state with `snapshot`. Days stored after the
    /// snapshot's day are dropped so they can be replayed.
    pub fn restore(&mut self, snapshot: GameSnapshot) -> SimResult<()> {
        if snapshot.session_id != self.session_id {
            return Err(SimError::InvalidSnapshot {
                reason: format!(
                    "snapshot belongs to session {}, not {}",
                    snapshot.session_id, self.session_id
                ),
            });
        }
        self.state = snapshot.restore(&self.config)?;
        self.store
            .truncate_day_summaries(&self.session_id, self.state.day_number)?;
        self.save()?;
        log::info!("session {} restored to day {}", self.session_id, self.state.day_number);
        Ok(())
    }

    /// Apply a player command. Rejections leave the state untouched and
    /// are logged to the event log before being returned.
    pub fn apply(&mut self, command: PlayerCommand) -> SimResult<()> {
        let day = self.state.day_number;
        match command.apply(&mut self.state, &self.config) {
            Ok(()) => {
                if command == PlayerCommand::Reset {
                    self.store.truncate_day_summaries(&self.session_id, 1)?;
                }
                self.log_event(&SimEvent::CommandApplied { day, command })?;
                self.save()
            }
            Err(rejection) => {
                log::warn!("day={day} {} rejected: {rejection}", command.name());
                self.log_event(&SimEvent::CommandRejected {
                    day,
                    command,
                    reason: rejection.to_string(),
                })?;
                Err(rejection.into())
            }
        }
    }

    /// The next start_day() resolves with `kind` as its special event.
    pub fn force_next_event(&mut self, kind: EventKind) {
        self.engine.force_next_event(kind);
    }

    /// Resolve the current day and persist its summary, events and the
    /// resulting state. The day runs on a copy of the state, which only
    /// replaces the in-memory state once every write has succeeded. A
    /// forced event is spent even when a write fails.
    pub fn start_day(&mut self) -> SimResult<DayResult> {
        let mut next = self.state.clone();
        let result = self.engine.run_day(&mut next)?;

        let entries = result
            .events
            .iter()
            .map(|e| EventLogEntry::from_event(&self.session_id, e))
            .collect::<SimResult<Vec<_>>>()?;
        self.store.insert_day_summary(&self.session_id, &result.summary)?;
        self.store.append_events(&entries)?;
        self.store
            .save_state(&GameSnapshot::capture(&self.session_id, &next))?;
        self.state = next;

        log::debug!(
            "session {} day={} served={} net=${:.2}",
            self.session_id,
            result.day,
            result.summary.served,
            result.summary.net_profit
        );
        Ok(result)
    }

    /// Stored day history, oldest first.
    pub fn history(&self) -> SimResult<Vec<DaySummary>> {
        self.store.day_summaries(&self.session_id)
    }

    fn log_event(&self, event: &SimEvent) -> SimResult<()> {
        self.store
            .append_event(&EventLogEntry::from_event(&self.session_id, event)?)
    }

    fn save(&self) -> SimResult<()> {
        self.store.save_state(&self.snapshot())
    }
}
