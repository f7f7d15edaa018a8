//! Store methods for the saved game state.

use crate::{
    error::SimResult,
    snapshot::GameSnapshot,
};
use rusqlite::{params, OptionalExtension};

use super::SimStore;

impl SimStore {
    /// Overwrite the session's saved state with `snapshot`.
    pub fn save_state(&self, snapshot: &GameSnapshot) -> SimResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO game_state (session_id, day, state_json, saved_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                snapshot.session_id,
                snapshot.day as i64,
                snapshot.to_json()?,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// The last saved snapshot, or None if the session was never saved.
    pub fn load_state(&self, session_id: &str) -> SimResult<Option<GameSnapshot>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM game_state WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| GameSnapshot::from_json(&j)).transpose()
    }

    /// RFC 3339 timestamp of the last save.
    pub fn state_saved_at(&self, session_id: &str) -> SimResult<Option<String>> {
        let saved_at = self
            .conn
            .query_row(
                "SELECT saved_at FROM game_state WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(saved_at)
    }
}
