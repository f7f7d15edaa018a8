//! Store methods for the per-day history.

use crate::{
    error::{SimError, SimResult},
    state::DaySummary,
    types::Day,
};
use rusqlite::params;

use super::SimStore;

impl SimStore {
    /// Append a resolved day. A day is written once per session.
    pub fn insert_day_summary(&self, session_id: &str, summary: &DaySummary) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO day_summary (
                session_id, day, served, lost, revenue, net_profit, ending_cash, summary_json
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session_id,
                summary.day as i64,
                summary.served as i64,
                summary.lost as i64,
                summary.revenue,
                summary.net_profit,
                summary.ending_cash,
                serde_json::to_string(summary)?,
            ],
        )?;
        Ok(())
    }

    /// Every stored day for the session, oldest first.
    pub fn day_summaries(&self, session_id: &str) -> SimResult<Vec<DaySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT summary_json FROM day_summary WHERE session_id = ?1 ORDER BY day ASC",
        )?;
        let rows = stmt
            .query_map(params![session_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(SimError::from))
            .collect()
    }

    /// Drop every stored day from `day` on. Used when a reset or a
    /// restored snapshot rewinds the session.
    pub fn truncate_day_summaries(&self, session_id: &str, day: Day) -> SimResult<()> {
        self.conn.execute(
            "DELETE FROM day_summary WHERE session_id = ?1 AND day >= ?2",
            params![session_id, day as i64],
        )?;
        Ok(())
    }

    // ── Test / summary helpers ────────────────────────────────────────

    pub fn day_summary_count(&self, session_id: &str) -> SimResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM day_summary WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Sum of net profit over every stored day.
    pub fn lifetime_net_profit(&self, session_id: &str) -> SimResult<f64> {
        let total: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(net_profit), 0.0) FROM day_summary WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}
