use crate::metrics::{self, Tally, precision, round};
use crate::report::{CashGroup, GameTypeGroup, TournamentGroup};
use core_types::{Session, SessionDetails};
use rust_decimal::Decimal;
use std::collections::HashMap;

const UNKNOWN: &str = "Unknown";
const DEFAULT_TOURNAMENT_GAME: &str = "MTT";

/// Identity of a game-type group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Cash { game_type: String, stakes: String },
    Tournament { game_type: String },
}

impl GroupKey {
    fn of(session: &Session) -> Self {
        match &session.details {
            SessionDetails::Cash(cash) => GroupKey::Cash {
                game_type: session.game_type.as_deref().unwrap_or(UNKNOWN).to_string(),
                stakes: cash.stakes.as_deref().unwrap_or(UNKNOWN).to_string(),
            },
            SessionDetails::Tournament(_) => GroupKey::Tournament {
                game_type: session
                    .game_type
                    .as_deref()
                    .unwrap_or(DEFAULT_TOURNAMENT_GAME)
                    .to_string(),
            },
        }
    }
}

/// Breaks results down by cash game and stakes, and by tournament game type.
///
/// Groups are ordered by session count, largest first; ties keep the order in
/// which the groups were first seen.
pub fn group_by_game_type(sessions: &[Session]) -> Vec<GameTypeGroup> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, Tally)> = Vec::new();

    for session in sessions {
        let key = GroupKey::of(session);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, Tally::default()));
                groups.len() - 1
            }
        };
        groups[slot].1.add(session);
    }

    // Stable sort keeps first-seen order among equal counts.
    groups.sort_by(|(_, a), (_, b)| b.sessions.cmp(&a.sessions));

    groups
        .into_iter()
        .map(|(key, tally)| match key {
            GroupKey::Cash { game_type, stakes } => {
                GameTypeGroup::Cash(cash_group(game_type, stakes, &tally))
            }
            GroupKey::Tournament { game_type } => {
                GameTypeGroup::Tournament(tournament_group(game_type, &tally))
            }
        })
        .collect()
}

fn cash_group(game_type: String, stakes: String, tally: &Tally) -> CashGroup {
    CashGroup {
        game_type,
        stakes,
        sessions: tally.sessions,
        total_profit_units: round(tally.cash_profit_units, precision::UNITS),
        total_profit_money: round(tally.cash_profit_money, precision::MONEY),
        avg_profit_units: round(
            metrics::average(tally.cash_profit_units, tally.sessions),
            precision::UNITS,
        ),
        avg_profit_money: round(
            metrics::average(tally.cash_profit_money, tally.sessions),
            precision::MONEY,
        ),
        total_hands: tally.hands,
        units_per_100: round(
            metrics::per_100(tally.cash_profit_units, tally.hands),
            precision::PER_100,
        ),
        total_hours: round(metrics::hours(tally.minutes), precision::HOURS),
        avg_duration_minutes: round(
            metrics::average(Decimal::from(tally.minutes), tally.sessions),
            precision::MINUTES,
        ),
        hourly_rate_money: round(
            metrics::hourly_rate(tally.cash_profit_money, tally.minutes),
            precision::HOURLY_MONEY,
        ),
        hourly_rate_units: round(
            metrics::hourly_rate(tally.cash_profit_units, tally.minutes),
            precision::HOURLY_UNITS,
        ),
        win_rate: round(tally.win_rate(), precision::PERCENT),
    }
}

fn tournament_group(game_type: String, tally: &Tally) -> TournamentGroup {
    TournamentGroup {
        game_type,
        sessions: tally.sessions,
        total_profit: round(tally.tournament_profit(), precision::MONEY),
        total_buy_ins: round(tally.buy_ins, precision::MONEY),
        total_cash_outs: round(tally.cash_outs, precision::MONEY),
        avg_buy_in: round(
            metrics::average(tally.buy_ins, tally.sessions),
            precision::MONEY,
        ),
        roi: round(metrics::roi(tally.buy_ins, tally.cash_outs), precision::PERCENT),
        itm_percent: round(metrics::percent(tally.itm, tally.sessions), precision::PERCENT),
        total_hours: round(metrics::hours(tally.minutes), precision::HOURS),
        avg_duration_minutes: round(
            metrics::average(Decimal::from(tally.minutes), tally.sessions),
            precision::MINUTES,
        ),
        win_rate: round(tally.win_rate(), precision::PERCENT),
    }
}
