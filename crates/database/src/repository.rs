use crate::DbError;
use crate::store::SessionStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::session::hh_mm;
use core_types::{
    CashDetails, NewSession, Session, SessionDetails, SessionKind, TournamentDetails,
};
use rust_decimal::Decimal;
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use uuid::Uuid;

const SESSION_COLUMNS: &str = "id, kind, session_date, duration_minutes, game_type, location, notes, \
     start_time, stakes, profit_units, profit_money, hands_played, buy_in, cash_out";

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// A row of the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct DbSession {
    pub id: Uuid,
    pub kind: String,
    pub session_date: NaiveDate,
    pub duration_minutes: i32,
    pub game_type: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub start_time: Option<String>,
    pub stakes: Option<String>,
    pub profit_units: Option<Decimal>,
    pub profit_money: Option<Decimal>,
    pub hands_played: Option<i32>,
    pub buy_in: Option<Decimal>,
    pub cash_out: Option<Decimal>,
}

impl TryFrom<DbSession> for Session {
    type Error = DbError;

    fn try_from(row: DbSession) -> Result<Self, Self::Error> {
        let kind: SessionKind = row
            .kind
            .parse()
            .map_err(|e| DbError::InvalidRecord(format!("session {}: {e}", row.id)))?;

        let start_time = match row.start_time.as_deref() {
            None | Some("") => None,
            Some(raw) => {
                let parsed = hh_mm::parse(raw);
                if parsed.is_none() {
                    tracing::warn!(session_id = %row.id, start_time = raw, "Ignoring unparseable start time.");
                }
                parsed
            }
        };

        let details = match kind {
            SessionKind::Cash => SessionDetails::Cash(CashDetails {
                stakes: row.stakes,
                profit_units: row.profit_units.unwrap_or_default(),
                profit_money: row.profit_money.unwrap_or_default(),
                hands_played: non_negative(row.hands_played.unwrap_or_default()),
            }),
            SessionKind::Tournament => SessionDetails::Tournament(TournamentDetails {
                buy_in: row.buy_in.unwrap_or_default(),
                cash_out: row.cash_out.unwrap_or_default(),
            }),
        };

        Ok(Session {
            id: row.id,
            date: row.session_date,
            duration_minutes: non_negative(row.duration_minutes),
            game_type: row.game_type,
            location: row.location,
            notes: row.notes,
            start_time,
            details,
        })
    }
}

fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Counts are stored as `INTEGER`; anything above `i32::MAX` is refused.
fn to_column(field: &str, value: u32) -> Result<i32, DbError> {
    i32::try_from(value)
        .map_err(|_| DbError::InvalidRecord(format!("{field} {value} is out of range")))
}

/// The format-specific columns of a session, flattened for binding.
#[derive(Debug, Default)]
struct DetailColumns {
    stakes: Option<String>,
    profit_units: Option<Decimal>,
    profit_money: Option<Decimal>,
    hands_played: Option<i32>,
    buy_in: Option<Decimal>,
    cash_out: Option<Decimal>,
}

impl TryFrom<&SessionDetails> for DetailColumns {
    type Error = DbError;

    fn try_from(details: &SessionDetails) -> Result<Self, Self::Error> {
        Ok(match details {
            SessionDetails::Cash(cash) => Self {
                stakes: cash.stakes.clone(),
                profit_units: Some(cash.profit_units),
                profit_money: Some(cash.profit_money),
                hands_played: Some(to_column("hands_played", cash.hands_played)?),
                ..Self::default()
            },
            SessionDetails::Tournament(tournament) => Self {
                buy_in: Some(tournament.buy_in),
                cash_out: Some(tournament.cash_out),
                ..Self::default()
            },
        })
    }
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for DbRepository {
    /// Rows that cannot be decoded are logged and left out rather than failing
    /// the whole read.
    async fn fetch_all(&self) -> Result<Vec<Session>, DbError> {
        let rows = sqlx::query_as::<_, DbSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY session_date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let total = rows.len();
        let sessions: Vec<Session> = rows
            .into_iter()
            .filter_map(|row| match Session::try_from(row) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable session row.");
                    None
                }
            })
            .collect();

        tracing::debug!(total, decoded = sessions.len(), "Fetched sessions.");
        Ok(sessions)
    }

    async fn insert(&self, session: NewSession) -> Result<Session, DbError> {
        let id = Uuid::new_v4();
        let columns = DetailColumns::try_from(&session.details)?;
        let duration_minutes = to_column("duration_minutes", session.duration_minutes)?;

        let row = sqlx::query_as::<_, DbSession>(&format!(
            r#"
            INSERT INTO sessions (
                id, kind, session_date, duration_minutes, game_type, location, notes,
                start_time, stakes, profit_units, profit_money, hands_played, buy_in, cash_out
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(session.details.kind().as_str())
        .bind(session.date)
        .bind(duration_minutes)
        .bind(&session.game_type)
        .bind(&session.location)
        .bind(&session.notes)
        .bind(session.start_time.as_ref().map(hh_mm::format))
        .bind(columns.stakes)
        .bind(columns.profit_units)
        .bind(columns.profit_money)
        .bind(columns.hands_played)
        .bind(columns.buy_in)
        .bind(columns.cash_out)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(session_id = %id, kind = %session.details.kind(), "Session stored.");
        Session::try_from(row)
    }

    async fn update(&self, id: Uuid, session: NewSession) -> Result<Session, DbError> {
        let columns = DetailColumns::try_from(&session.details)?;
        let duration_minutes = to_column("duration_minutes", session.duration_minutes)?;

        let row = sqlx::query_as::<_, DbSession>(&format!(
            r#"
            UPDATE sessions SET
                kind = $2, session_date = $3, duration_minutes = $4, game_type = $5,
                location = $6, notes = $7, start_time = $8, stakes = $9, profit_units = $10,
                profit_money = $11, hands_played = $12, buy_in = $13, cash_out = $14,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(session.details.kind().as_str())
        .bind(session.date)
        .bind(duration_minutes)
        .bind(&session.game_type)
        .bind(&session.location)
        .bind(&session.notes)
        .bind(session.start_time.as_ref().map(hh_mm::format))
        .bind(columns.stakes)
        .bind(columns.profit_units)
        .bind(columns.profit_money)
        .bind(columns.hands_played)
        .bind(columns.buy_in)
        .bind(columns.cash_out)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        tracing::info!(session_id = %id, "Session updated.");
        Session::try_from(row)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::info!(session_id = %id, "Session deleted.");
        Ok(())
    }
}
