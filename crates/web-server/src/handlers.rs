use crate::{AppState, error::AppError};
use analytics::{
    DayBucket, DurationBoundaries, DurationBucket, FilterCriteria, GameTypeGroup, SummaryReport,
    TrendReport, apply_unit_value,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::{NaiveDate, SecondsFormat, Utc};
use core_types::{NewSession, Session, SessionDetails, SessionKind};
use database::SessionStore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_PAGE_LIMIT: usize = 100;
const MAX_PAGE_LIMIT: usize = 500;

/// Every route the API serves, listed in 404 responses.
pub const ENDPOINTS: [&str; 11] = [
    "GET /api/health",
    "GET /api/sessions",
    "POST /api/sessions",
    "PUT /api/sessions/:id",
    "DELETE /api/sessions/:id",
    "GET /api/stats/summary",
    "GET /api/stats/by-duration",
    "GET /api/stats/by-game-type",
    "GET /api/stats/by-day",
    "GET /api/stats/trends",
    "POST /api/cache/clear",
];

/// Query parameters shared by the read endpoints.
///
/// Everything arrives as text and is parsed leniently: unparseable numbers fall
/// back to their defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub stakes: Option<String>,
    pub game_type: Option<String>,
    /// Comma-separated duration bounds in minutes.
    pub buckets: Option<String>,
    pub window: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl StatsQuery {
    pub fn criteria(&self) -> Result<FilterCriteria, AppError> {
        Ok(FilterCriteria {
            from: parse_date("from", self.from.as_deref())?,
            to: parse_date("to", self.to.as_deref())?,
            kind: non_empty(self.kind.as_deref())
                .map(|raw| {
                    raw.parse::<SessionKind>()
                        .map_err(|_| AppError::BadRequest(format!("Invalid type '{raw}'")))
                })
                .transpose()?,
            stakes: non_empty(self.stakes.as_deref()).map(str::to_string),
            game_type: non_empty(self.game_type.as_deref()).map(str::to_string),
        })
    }

    fn boundaries(&self) -> Option<Vec<u32>> {
        non_empty(self.buckets.as_deref()).map(DurationBoundaries::parse_list)
    }

    fn window(&self) -> Option<i64> {
        self.window.as_deref().and_then(parse_leading_int)
    }

    fn page(&self) -> (usize, usize) {
        let limit = match self.limit.as_deref().and_then(parse_leading_int) {
            Some(n) if n > 0 => usize::try_from(n).map_or(MAX_PAGE_LIMIT, |n| n.min(MAX_PAGE_LIMIT)),
            _ => DEFAULT_PAGE_LIMIT,
        };
        let offset = self
            .offset
            .as_deref()
            .and_then(parse_leading_int)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        (limit, offset)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    non_empty(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::BadRequest(format!("Invalid '{name}' date '{raw}', expected YYYY-MM-DD"))
            })
        })
        .transpose()
}

/// Reads an optional sign and the leading digits, ignoring anything after them,
/// so `"25"`, `" 25 "` and `"25abc"` all give 25.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub total_sessions: usize,
    pub filtered_sessions: usize,
    pub filters: FilterCriteria,
    pub cache_age_seconds: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// The `{ data, pagination?, meta }` body of every read endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub meta: Meta,
}

#[derive(Debug, Serialize)]
pub struct DurationData {
    pub buckets: Vec<DurationBucket>,
}

#[derive(Debug, Serialize)]
pub struct GameTypeData {
    pub groups: Vec<GameTypeGroup>,
}

#[derive(Debug, Serialize)]
pub struct DayData {
    pub days: Vec<DayBucket>,
}

fn rounded_seconds(age: Duration) -> u64 {
    let millis = u64::try_from(age.as_millis()).unwrap_or(u64::MAX);
    millis.saturating_add(500) / 1000
}

/// A filtered view over the cached collection, plus the metadata describing it.
struct Filtered {
    sessions: Vec<Session>,
    meta: Meta,
}

async fn load_filtered<S: SessionStore>(
    state: &AppState<S>,
    query: &StatsQuery,
) -> Result<Filtered, AppError> {
    let criteria = query.criteria()?;
    let all = state.cache.sessions().await?;
    let sessions = state.engine.filter(&all, &criteria);
    let meta = Meta {
        total_sessions: all.len(),
        filtered_sessions: sessions.len(),
        filters: criteria,
        cache_age_seconds: state.cache.age().await.map(rounded_seconds),
    };
    Ok(Filtered { sessions, meta })
}

/// # GET /api/health
pub async fn health<S: SessionStore>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "uptime": rounded_seconds(state.started_at.elapsed()),
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

/// # GET /api/sessions
/// Filtered sessions, most recent first, one page at a time.
pub async fn list_sessions<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Envelope<Vec<Session>>>, AppError> {
    let (limit, offset) = query.page();
    let Filtered { mut sessions, meta } = load_filtered(&state, &query).await?;

    sessions.sort_by(|a, b| b.date.cmp(&a.date));
    let total = sessions.len();
    let page: Vec<Session> = sessions.into_iter().skip(offset).take(limit).collect();

    Ok(Json(Envelope {
        data: page,
        pagination: Some(Pagination {
            total,
            limit,
            offset,
            has_more: offset.saturating_add(limit) < total,
        }),
        meta,
    }))
}

/// Cash sessions have their money profit derived from units and stakes.
fn prepare(mut session: NewSession) -> NewSession {
    if let SessionDetails::Cash(cash) = &mut session.details {
        apply_unit_value(cash);
    }
    session
}

fn body(payload: Result<Json<NewSession>, JsonRejection>) -> Result<NewSession, AppError> {
    let Json(session) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let session = prepare(session);
    session
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(session)
}

fn session_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    let Path(id) = path.map_err(|_| AppError::BadRequest("Invalid session id".to_string()))?;
    Ok(id)
}

/// # POST /api/sessions
pub async fn create_session<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<NewSession>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.cache.insert(body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": session }))))
}

/// # PUT /api/sessions/:id
pub async fn update_session<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<NewSession>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = session_id(path)?;
    let session = state.cache.update(id, body(payload)?).await?;
    Ok(Json(json!({ "data": session })))
}

/// # DELETE /api/sessions/:id
pub async fn delete_session<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = session_id(path)?;
    state.cache.delete(id).await?;
    Ok(Json(json!({ "message": "Session deleted", "id": id })))
}

/// # GET /api/stats/summary
pub async fn summary<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Envelope<SummaryReport>>, AppError> {
    let Filtered { sessions, meta } = load_filtered(&state, &query).await?;
    Ok(Json(Envelope {
        data: state.engine.summarize(&sessions),
        pagination: None,
        meta,
    }))
}

/// # GET /api/stats/by-duration?buckets=0,30,60
pub async fn by_duration<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Envelope<DurationData>>, AppError> {
    let Filtered { sessions, meta } = load_filtered(&state, &query).await?;
    let boundaries = query.boundaries();
    Ok(Json(Envelope {
        data: DurationData {
            buckets: state.engine.by_duration(&sessions, boundaries.as_deref()),
        },
        pagination: None,
        meta,
    }))
}

/// # GET /api/stats/by-game-type
pub async fn by_game_type<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Envelope<GameTypeData>>, AppError> {
    let Filtered { sessions, meta } = load_filtered(&state, &query).await?;
    Ok(Json(Envelope {
        data: GameTypeData {
            groups: state.engine.by_game_type(&sessions),
        },
        pagination: None,
        meta,
    }))
}

/// # GET /api/stats/by-day
pub async fn by_day<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Envelope<DayData>>, AppError> {
    let Filtered { sessions, meta } = load_filtered(&state, &query).await?;
    Ok(Json(Envelope {
        data: DayData {
            days: state.engine.by_day_of_week(&sessions),
        },
        pagination: None,
        meta,
    }))
}

/// # GET /api/stats/trends?window=20
pub async fn trends<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Envelope<TrendReport>>, AppError> {
    let Filtered { sessions, meta } = load_filtered(&state, &query).await?;
    Ok(Json(Envelope {
        data: state.engine.trends(&sessions, query.window()),
        pagination: None,
        meta,
    }))
}

/// # POST /api/cache/clear
pub async fn clear_cache<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    state.cache.invalidate().await;
    tracing::info!("Session cache cleared on request.");
    Json(json!({ "message": "Cache cleared" }))
}

/// Fallback for unknown `/api` routes. Still requires credentials, so the
/// endpoint list is only shown to authenticated clients.
pub async fn not_found<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    state.auth.authorize(&headers)?;
    Ok((
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "availableEndpoints": ENDPOINTS,
        })),
    ))
}
