//! Shared arithmetic for every aggregator: one-pass tallies, zero-guarded
//! rates and output rounding.

use core_types::{Session, SessionDetails};
use rust_decimal::{Decimal, RoundingStrategy};

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Decimal places used when a figure leaves the engine.
pub(crate) mod precision {
    pub const MONEY: u32 = 2;
    pub const UNITS: u32 = 1;
    pub const HOURS: u32 = 1;
    pub const PER_100: u32 = 2;
    pub const HOURLY_MONEY: u32 = 2;
    pub const HOURLY_UNITS: u32 = 1;
    pub const PERCENT: u32 = 1;
    pub const MINUTES: u32 = 0;
}

/// Rounds a figure for output. Midpoints round away from zero.
pub fn round(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// `numerator / denominator * scale`, zero for a zero denominator.
/// Results beyond the `Decimal` range saturate instead of overflowing.
fn scaled_ratio(numerator: Decimal, denominator: Decimal, scale: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    match numerator.checked_div(denominator) {
        Some(ratio) => ratio.saturating_mul(scale),
        None if numerator.is_sign_negative() != denominator.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Profit per 100 hands; zero when no hands were recorded.
pub fn per_100(total_units: Decimal, total_hands: u64) -> Decimal {
    scaled_ratio(total_units, Decimal::from(total_hands), Decimal::ONE_HUNDRED)
}

/// Profit per hour; zero when no time was recorded.
pub fn hourly_rate(total: Decimal, total_minutes: u64) -> Decimal {
    scaled_ratio(total, Decimal::from(total_minutes), MINUTES_PER_HOUR)
}

/// Return on investment in percent; zero when nothing was invested.
pub fn roi(total_buy_ins: Decimal, total_cash_outs: Decimal) -> Decimal {
    scaled_ratio(
        total_cash_outs.saturating_sub(total_buy_ins),
        total_buy_ins,
        Decimal::ONE_HUNDRED,
    )
}

/// `part / whole` in percent; zero for an empty whole.
pub fn percent(part: usize, whole: usize) -> Decimal {
    scaled_ratio(Decimal::from(part), Decimal::from(whole), Decimal::ONE_HUNDRED)
}

/// Mean over `count` items; zero for none.
pub fn average(total: Decimal, count: usize) -> Decimal {
    scaled_ratio(total, Decimal::from(count), Decimal::ONE)
}

pub fn hours(minutes: u64) -> Decimal {
    Decimal::from(minutes) / MINUTES_PER_HOUR
}

/// Running sums over a group of sessions, split by format.
///
/// Money and unit sums saturate at the `Decimal` bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Tally {
    pub sessions: usize,
    pub winning: usize,
    pub minutes: u64,
    /// Money profit over every session (tournaments contribute `cash_out - buy_in`).
    pub profit_money: Decimal,

    pub cash_sessions: usize,
    pub cash_winning: usize,
    pub cash_minutes: u64,
    pub cash_profit_units: Decimal,
    pub cash_profit_money: Decimal,
    pub hands: u64,

    pub tournaments: usize,
    pub tournament_winning: usize,
    pub tournament_minutes: u64,
    pub buy_ins: Decimal,
    pub cash_outs: Decimal,
    pub itm: usize,
}

impl Tally {
    pub fn of<'a, I>(sessions: I) -> Self
    where
        I: IntoIterator<Item = &'a Session>,
    {
        let mut tally = Self::default();
        for session in sessions {
            tally.add(session);
        }
        tally
    }

    pub fn add(&mut self, session: &Session) {
        let minutes = u64::from(session.duration_minutes);
        let winning = session.is_winning();

        self.sessions += 1;
        self.minutes += minutes;
        self.profit_money = self.profit_money.saturating_add(session.profit_money());
        if winning {
            self.winning += 1;
        }

        match &session.details {
            SessionDetails::Cash(cash) => {
                self.cash_sessions += 1;
                self.cash_minutes += minutes;
                self.cash_profit_units = self.cash_profit_units.saturating_add(cash.profit_units);
                self.cash_profit_money = self.cash_profit_money.saturating_add(cash.profit_money);
                self.hands += u64::from(cash.hands_played);
                if winning {
                    self.cash_winning += 1;
                }
            }
            SessionDetails::Tournament(tournament) => {
                self.tournaments += 1;
                self.tournament_minutes += minutes;
                self.buy_ins = self.buy_ins.saturating_add(tournament.buy_in);
                self.cash_outs = self.cash_outs.saturating_add(tournament.cash_out);
                if tournament.is_itm() {
                    self.itm += 1;
                }
                if winning {
                    self.tournament_winning += 1;
                }
            }
        }
    }

    pub fn tournament_profit(&self) -> Decimal {
        self.cash_outs.saturating_sub(self.buy_ins)
    }

    pub fn win_rate(&self) -> Decimal {
        percent(self.winning, self.sessions)
    }

    pub fn cash_win_rate(&self) -> Decimal {
        percent(self.cash_winning, self.cash_sessions)
    }

    pub fn tournament_win_rate(&self) -> Decimal {
        percent(self.tournament_winning, self.tournaments)
    }
}
