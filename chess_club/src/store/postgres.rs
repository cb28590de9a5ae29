//! PostgreSQL-backed tournament store.
//!
//! The bracket structure (participants, rounds, winner) is stored as
//! JSONB documents alongside the scalar columns used for listing and
//! filtering. Writes go through an optimistic revision check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use super::{StoreError, StoreResult, TournamentStore};
use crate::bracket::{Tournament, TournamentId, TournamentStatus};

/// PostgreSQL implementation of [`TournamentStore`]
#[derive(Clone)]
pub struct PgTournamentStore {
    pool: Arc<PgPool>,
}

impl PgTournamentStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn status_to_str(status: TournamentStatus) -> &'static str {
    match status {
        TournamentStatus::Registration => "registration",
        TournamentStatus::InProgress => "in-progress",
        TournamentStatus::Completed => "completed",
        TournamentStatus::Cancelled => "cancelled",
    }
}

fn status_from_str(status: &str) -> TournamentStatus {
    match status {
        "in-progress" => TournamentStatus::InProgress,
        "completed" => TournamentStatus::Completed,
        "cancelled" => TournamentStatus::Cancelled,
        _ => TournamentStatus::Registration,
    }
}

fn row_to_tournament(row: &PgRow) -> StoreResult<Tournament> {
    let status: String = row.get("status");
    Ok(Tournament {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        max_participants: row.get::<i32, _>("max_participants") as usize,
        participants: serde_json::from_value(row.get("participants"))?,
        rounds: serde_json::from_value(row.get("rounds"))?,
        current_round: row.get::<i32, _>("current_round") as u32,
        status: status_from_str(&status),
        winner: serde_json::from_value(row.get("winner"))?,
        start_date: row.get::<Option<DateTime<Utc>>, _>("start_date"),
        end_date: row.get::<Option<DateTime<Utc>>, _>("end_date"),
        location: row.get("location"),
        entry_fee: row.get("entry_fee"),
        prizes: serde_json::from_value(row.get("prizes"))?,
        revision: row.get("revision"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    })
}

const SELECT_COLUMNS: &str = "id, name, description, max_participants, participants, rounds, \
     current_round, status, winner, start_date, end_date, location, entry_fee, prizes, \
     revision, created_at";

#[async_trait]
impl TournamentStore for PgTournamentStore {
    async fn create(&self, tournament: &Tournament) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tournaments
                (id, name, description, max_participants, participants, rounds,
                 current_round, status, winner, start_date, end_date, location,
                 entry_fee, prizes, revision, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(tournament.id)
        .bind(&tournament.name)
        .bind(&tournament.description)
        .bind(tournament.max_participants as i32)
        .bind(serde_json::to_value(&tournament.participants)?)
        .bind(serde_json::to_value(&tournament.rounds)?)
        .bind(tournament.current_round as i32)
        .bind(status_to_str(tournament.status))
        .bind(serde_json::to_value(&tournament.winner)?)
        .bind(tournament.start_date)
        .bind(tournament.end_date)
        .bind(&tournament.location)
        .bind(tournament.entry_fee)
        .bind(serde_json::to_value(&tournament.prizes)?)
        .bind(tournament.revision)
        .bind(tournament.created_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn load(&self, id: TournamentId) -> StoreResult<Tournament> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM tournaments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(StoreError::NotFound(id))?;

        row_to_tournament(&row)
    }

    async fn save(&self, tournament: &mut Tournament) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tournaments
            SET name = $2, description = $3, max_participants = $4, participants = $5,
                rounds = $6, current_round = $7, status = $8, winner = $9,
                start_date = $10, end_date = $11, location = $12, entry_fee = $13,
                prizes = $14, revision = revision + 1, updated_at = NOW()
            WHERE id = $1 AND revision = $15
            "#,
        )
        .bind(tournament.id)
        .bind(&tournament.name)
        .bind(&tournament.description)
        .bind(tournament.max_participants as i32)
        .bind(serde_json::to_value(&tournament.participants)?)
        .bind(serde_json::to_value(&tournament.rounds)?)
        .bind(tournament.current_round as i32)
        .bind(status_to_str(tournament.status))
        .bind(serde_json::to_value(&tournament.winner)?)
        .bind(tournament.start_date)
        .bind(tournament.end_date)
        .bind(&tournament.location)
        .bind(tournament.entry_fee)
        .bind(serde_json::to_value(&tournament.prizes)?)
        .bind(tournament.revision)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM tournaments WHERE id = $1")
                .bind(tournament.id)
                .fetch_optional(self.pool.as_ref())
                .await?
                .is_some();
            return Err(if exists {
                StoreError::Conflict {
                    id: tournament.id,
                    stale: tournament.revision,
                }
            } else {
                StoreError::NotFound(tournament.id)
            });
        }

        tournament.revision += 1;
        Ok(())
    }

    async fn list(&self, status: Option<TournamentStatus>) -> StoreResult<Vec<Tournament>> {
        let rows = if let Some(status) = status {
            sqlx::query(&format!(
                "SELECT {SELECT_COLUMNS} FROM tournaments WHERE status = $1 \
                 ORDER BY created_at DESC"
            ))
            .bind(status_to_str(status))
            .fetch_all(self.pool.as_ref())
            .await?
        } else {
            sqlx::query(&format!(
                "SELECT {SELECT_COLUMNS} FROM tournaments ORDER BY created_at DESC"
            ))
            .fetch_all(self.pool.as_ref())
            .await?
        };

        rows.iter().map(row_to_tournament).collect()
    }

    async fn delete(&self, id: TournamentId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
