use crate::metrics::{self, Tally, precision, round};
use crate::report::{CashStats, CombinedStats, SummaryReport, TournamentStats};
use core_types::Session;

/// Computes cash, tournament and combined statistics for an already-filtered collection.
pub fn summarize(sessions: &[Session]) -> SummaryReport {
    let tally = Tally::of(sessions);

    SummaryReport {
        total_sessions: tally.sessions,
        cash_sessions: tally.cash_sessions,
        tournament_sessions: tally.tournaments,
        cash: cash_stats(&tally),
        tournament: tournament_stats(&tally),
        combined: combined_stats(&tally),
    }
}

fn cash_stats(tally: &Tally) -> CashStats {
    CashStats {
        total_profit_units: round(tally.cash_profit_units, precision::UNITS),
        total_profit_money: round(tally.cash_profit_money, precision::MONEY),
        total_hands: tally.hands,
        total_minutes: tally.cash_minutes,
        total_hours: round(metrics::hours(tally.cash_minutes), precision::HOURS),
        units_per_100: round(
            metrics::per_100(tally.cash_profit_units, tally.hands),
            precision::PER_100,
        ),
        hourly_rate_money: round(
            metrics::hourly_rate(tally.cash_profit_money, tally.cash_minutes),
            precision::HOURLY_MONEY,
        ),
        hourly_rate_units: round(
            metrics::hourly_rate(tally.cash_profit_units, tally.cash_minutes),
            precision::HOURLY_UNITS,
        ),
        win_rate: round(tally.cash_win_rate(), precision::PERCENT),
    }
}

fn tournament_stats(tally: &Tally) -> TournamentStats {
    TournamentStats {
        total_profit: round(tally.tournament_profit(), precision::MONEY),
        total_buy_ins: round(tally.buy_ins, precision::MONEY),
        total_cash_outs: round(tally.cash_outs, precision::MONEY),
        total_minutes: tally.tournament_minutes,
        total_hours: round(metrics::hours(tally.tournament_minutes), precision::HOURS),
        tournaments_played: tally.tournaments,
        roi: round(metrics::roi(tally.buy_ins, tally.cash_outs), precision::PERCENT),
        itm_percent: round(
            metrics::percent(tally.itm, tally.tournaments),
            precision::PERCENT,
        ),
        avg_buy_in: round(
            metrics::average(tally.buy_ins, tally.tournaments),
            precision::MONEY,
        ),
        win_rate: round(tally.tournament_win_rate(), precision::PERCENT),
    }
}

fn combined_stats(tally: &Tally) -> CombinedStats {
    let profit = tally.cash_profit_money.saturating_add(tally.tournament_profit());
    CombinedStats {
        total_profit_money: round(profit, precision::MONEY),
        total_minutes: tally.minutes,
        total_hours: round(metrics::hours(tally.minutes), precision::HOURS),
        hourly_rate_money: round(
            metrics::hourly_rate(profit, tally.minutes),
            precision::HOURLY_MONEY,
        ),
        win_rate: round(tally.win_rate(), precision::PERCENT),
    }
}
