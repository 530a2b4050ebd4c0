use chrono::NaiveDate;
use core_types::SessionKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over a collection, per format and combined.
///
/// This is the output of the summary aggregator. Every figure is rounded once,
/// when the report is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total_sessions: usize,
    pub cash_sessions: usize,
    pub tournament_sessions: usize,
    pub cash: CashStats,
    pub tournament: TournamentStats,
    pub combined: CombinedStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashStats {
    pub total_profit_units: Decimal,
    pub total_profit_money: Decimal,
    pub total_hands: u64,
    pub total_minutes: u64,
    pub total_hours: Decimal,
    pub units_per_100: Decimal,
    pub hourly_rate_money: Decimal,
    pub hourly_rate_units: Decimal,
    pub win_rate: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentStats {
    pub total_profit: Decimal,
    pub total_buy_ins: Decimal,
    pub total_cash_outs: Decimal,
    pub total_minutes: u64,
    pub total_hours: Decimal,
    pub tournaments_played: usize,
    pub roi: Decimal,
    pub itm_percent: Decimal,
    pub avg_buy_in: Decimal,
    pub win_rate: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedStats {
    pub total_profit_money: Decimal,
    pub total_minutes: u64,
    pub total_hours: Decimal,
    pub hourly_rate_money: Decimal,
    pub win_rate: Decimal,
}

/// Metrics shared by duration and weekday buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    pub sessions: usize,
    pub cash_sessions: usize,
    pub total_profit_units: Decimal,
    pub total_profit_money: Decimal,
    /// Per cash session.
    pub avg_profit_units: Decimal,
    /// Per session of either format.
    pub avg_profit_money: Decimal,
    pub total_hands: u64,
    pub units_per_100: Decimal,
    pub total_hours: Decimal,
    pub avg_duration_minutes: Decimal,
    pub win_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationBucket {
    /// Human label, e.g. `30-60min` or `240min+`.
    pub range: String,
    pub min_minutes: u32,
    /// Exclusive upper bound; `None` for the open-ended last bucket.
    pub max_minutes: Option<u32>,
    #[serde(flatten)]
    pub stats: BucketStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub day: String,
    /// 0 = Sunday.
    pub day_index: u32,
    #[serde(flatten)]
    pub stats: BucketStats,
    pub time_of_day: Option<TimeOfDay>,
}

/// When sessions on a given weekday tend to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDay {
    pub sample_size: usize,
    pub avg_start_hour: Decimal,
}

/// Results for one game type (and, for cash, one stakes level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GameTypeGroup {
    Cash(CashGroup),
    Tournament(TournamentGroup),
}

impl GameTypeGroup {
    pub fn sessions(&self) -> usize {
        match self {
            GameTypeGroup::Cash(group) => group.sessions,
            GameTypeGroup::Tournament(group) => group.sessions,
        }
    }

    pub fn game_type(&self) -> &str {
        match self {
            GameTypeGroup::Cash(group) => &group.game_type,
            GameTypeGroup::Tournament(group) => &group.game_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashGroup {
    pub game_type: String,
    pub stakes: String,
    pub sessions: usize,
    pub total_profit_units: Decimal,
    pub total_profit_money: Decimal,
    pub avg_profit_units: Decimal,
    pub avg_profit_money: Decimal,
    pub total_hands: u64,
    pub units_per_100: Decimal,
    pub total_hours: Decimal,
    pub avg_duration_minutes: Decimal,
    pub hourly_rate_money: Decimal,
    pub hourly_rate_units: Decimal,
    pub win_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentGroup {
    pub game_type: String,
    pub sessions: usize,
    pub total_profit: Decimal,
    pub total_buy_ins: Decimal,
    pub total_cash_outs: Decimal,
    pub avg_buy_in: Decimal,
    pub roi: Decimal,
    pub itm_percent: Decimal,
    pub total_hours: Decimal,
    pub avg_duration_minutes: Decimal,
    pub win_rate: Decimal,
}

/// One point on the rolling trend line, one per session in date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// 1-based position in chronological order.
    pub session_index: usize,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub session_profit_money: Decimal,
    pub session_profit_units: Decimal,
    /// Number of sessions actually in the window (smaller near the start).
    pub window_size: usize,
    pub rolling_units_per_100: Decimal,
    pub rolling_avg_profit_money: Decimal,
    pub rolling_avg_profit_units: Decimal,
    pub rolling_win_rate: Decimal,
    pub cumulative_profit_money: Decimal,
    pub cumulative_profit_units: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    /// The window that was requested (after defaulting and clamping).
    pub window_size: usize,
    pub data_points: Vec<TrendPoint>,
}

/// Every view at once, as produced for offline reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub summary: SummaryReport,
    pub duration_buckets: Vec<DurationBucket>,
    pub days: Vec<DayBucket>,
    pub groups: Vec<GameTypeGroup>,
    pub trends: TrendReport,
}
