use crate::metrics::{self, Tally, precision, round};
use crate::report::TrendPoint;
use core_types::Session;
use rust_decimal::Decimal;

/// Rolling window used when none (or zero) is requested.
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// Resolves a requested window: missing or below 1 becomes [`DEFAULT_WINDOW_SIZE`].
pub fn effective_window(requested: Option<usize>) -> usize {
    match requested {
        Some(size) if size >= 1 => size,
        _ => DEFAULT_WINDOW_SIZE,
    }
}

/// Produces one trend point per session, in date order.
///
/// Sessions on the same date keep their input order. Each point carries the
/// statistics of the trailing window ending at that session plus running
/// totals from the first session onward. The running totals add up the
/// rounded per-session figures, so each cumulative value is exactly the
/// previous one plus the session's reported profit.
pub fn compute_trends(sessions: &[Session], window_size: Option<usize>) -> Vec<TrendPoint> {
    let window_size = effective_window(window_size);

    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by_key(|session| session.date);

    let mut cumulative_money = Decimal::ZERO;
    let mut cumulative_units = Decimal::ZERO;

    ordered
        .iter()
        .enumerate()
        .map(|(i, session)| {
            let profit_money = round(session.profit_money(), precision::MONEY);
            let profit_units = round(session.profit_units(), precision::UNITS);
            cumulative_money = cumulative_money.saturating_add(profit_money);
            cumulative_units = cumulative_units.saturating_add(profit_units);

            let start = (i + 1).saturating_sub(window_size);
            let window = &ordered[start..=i];
            let tally = Tally::of(window.iter().copied());

            TrendPoint {
                session_index: i + 1,
                date: session.date,
                kind: session.kind(),
                session_profit_money: profit_money,
                session_profit_units: profit_units,
                window_size: window.len(),
                rolling_units_per_100: round(
                    metrics::per_100(tally.cash_profit_units, tally.hands),
                    precision::PER_100,
                ),
                rolling_avg_profit_money: round(
                    metrics::average(tally.profit_money, tally.sessions),
                    precision::MONEY,
                ),
                rolling_avg_profit_units: round(
                    metrics::average(tally.cash_profit_units, tally.cash_sessions),
                    precision::UNITS,
                ),
                rolling_win_rate: round(tally.win_rate(), precision::PERCENT),
                cumulative_profit_money: cumulative_money,
                cumulative_profit_units: cumulative_units,
            }
        })
        .collect()
}
