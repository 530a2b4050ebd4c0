//! Duration and weekday partitions.

use crate::metrics::{self, Tally, precision, round};
use crate::report::{BucketStats, DayBucket, DurationBucket, TimeOfDay};
use chrono::Datelike;
use core_types::Session;
use rust_decimal::Decimal;

/// Lower bounds (minutes) used when the caller supplies fewer than two.
pub const DEFAULT_DURATION_BOUNDARIES: [u32; 6] = [0, 30, 60, 120, 180, 240];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Sorted lower bounds of half-open duration ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationBoundaries(Vec<u32>);

impl DurationBoundaries {
    /// Sorts the given bounds, or falls back to [`DEFAULT_DURATION_BOUNDARIES`]
    /// when fewer than two are given.
    pub fn new(boundaries: &[u32]) -> Self {
        Self::with_fallback(boundaries, &DEFAULT_DURATION_BOUNDARIES)
    }

    pub fn with_fallback(boundaries: &[u32], fallback: &[u32]) -> Self {
        let mut bounds = if boundaries.len() >= 2 {
            boundaries.to_vec()
        } else {
            fallback.to_vec()
        };
        bounds.sort_unstable();
        Self(bounds)
    }

    /// Lenient parse of a comma-separated list such as `0,30,60`.
    /// Entries that are not non-negative integers are ignored.
    pub fn parse_list(raw: &str) -> Vec<u32> {
        raw.split(',')
            .filter_map(|part| part.trim().parse::<u32>().ok())
            .collect()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Index of the bucket for `duration`: the last bound not exceeding it.
    /// `None` when the duration is below every bound.
    pub fn bucket_for(&self, duration: u32) -> Option<usize> {
        self.0
            .partition_point(|&bound| bound <= duration)
            .checked_sub(1)
    }
}

/// Groups sessions into half-open duration ranges `[b[i], b[i+1])`, the last one
/// unbounded.
///
/// Sessions shorter than the smallest bound belong to no bucket and are left out.
pub fn bucket_by_duration(sessions: &[Session], boundaries: &DurationBoundaries) -> Vec<DurationBucket> {
    let bounds = boundaries.as_slice();
    let mut members: Vec<Vec<&Session>> = vec![Vec::new(); bounds.len()];

    let mut dropped = 0usize;
    for session in sessions {
        match boundaries.bucket_for(session.duration_minutes) {
            Some(index) => members[index].push(session),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::debug!(
            dropped,
            lowest_bound = ?bounds.first(),
            "Sessions below every duration bound were left out."
        );
    }

    bounds
        .iter()
        .enumerate()
        .zip(members)
        .map(|((index, &min), members)| {
            let max = bounds.get(index + 1).copied();
            DurationBucket {
                range: match max {
                    Some(max) => format!("{min}-{max}min"),
                    None => format!("{min}min+"),
                },
                min_minutes: min,
                max_minutes: max,
                stats: bucket_stats(&Tally::of(members)),
            }
        })
        .collect()
}

/// Groups sessions by weekday, Sunday first. Always returns seven buckets.
pub fn bucket_by_day_of_week(sessions: &[Session]) -> Vec<DayBucket> {
    let mut members: [Vec<&Session>; 7] = Default::default();
    for session in sessions {
        members[weekday_index(session)].push(session);
    }

    members
        .iter()
        .enumerate()
        .map(|(index, day)| DayBucket {
            day: DAY_NAMES[index].to_string(),
            day_index: index as u32,
            stats: bucket_stats(&Tally::of(day.iter().copied())),
            time_of_day: time_of_day(day),
        })
        .collect()
}

/// Weekday of the session date taken at noon UTC, 0 = Sunday.
fn weekday_index(session: &Session) -> usize {
    let weekday = session
        .date
        .and_hms_opt(12, 0, 0)
        .map(|noon| noon.and_utc().weekday())
        .unwrap_or_else(|| session.date.weekday());
    weekday.num_days_from_sunday() as usize
}

fn time_of_day(sessions: &[&Session]) -> Option<TimeOfDay> {
    let hours: Vec<u32> = sessions.iter().filter_map(|s| s.start_hour()).collect();
    if hours.is_empty() {
        return None;
    }
    let total: u32 = hours.iter().sum();
    Some(TimeOfDay {
        sample_size: hours.len(),
        avg_start_hour: round(
            metrics::average(Decimal::from(total), hours.len()),
            precision::HOURS,
        ),
    })
}

pub(crate) fn bucket_stats(tally: &Tally) -> BucketStats {
    BucketStats {
        sessions: tally.sessions,
        cash_sessions: tally.cash_sessions,
        total_profit_units: round(tally.cash_profit_units, precision::UNITS),
        total_profit_money: round(tally.profit_money, precision::MONEY),
        avg_profit_units: round(
            metrics::average(tally.cash_profit_units, tally.cash_sessions),
            precision::UNITS,
        ),
        avg_profit_money: round(
            metrics::average(tally.profit_money, tally.sessions),
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
        win_rate: round(tally.win_rate(), precision::PERCENT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{cash, tournament};
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;

    fn with_duration(mut session: Session, minutes: u32) -> Session {
        session.duration_minutes = minutes;
        session
    }

    #[test]
    fn two_bounds_make_two_buckets() {
        let sessions = vec![
            with_duration(cash("2024-01-01", "NL50", dec!(10), dec!(5), 100), 30),
            with_duration(cash("2024-01-02", "NL50", dec!(-4), dec!(-2), 100), 90),
        ];

        let buckets = bucket_by_duration(&sessions, &DurationBoundaries::new(&[0, 60]));

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].range, "0-60min");
        assert_eq!(buckets[0].max_minutes, Some(60));
        assert_eq!(buckets[0].stats.sessions, 1);
        assert_eq!(buckets[0].stats.total_profit_money, dec!(5));
        assert_eq!(buckets[1].range, "60min+");
        assert_eq!(buckets[1].max_minutes, None);
        assert_eq!(buckets[1].stats.sessions, 1);
        assert_eq!(buckets[1].stats.total_profit_units, dec!(-4));
    }

    #[test]
    fn lower_bound_is_inclusive() {
        let bounds = DurationBoundaries::new(&[0, 60, 120]);
        assert_eq!(bounds.bucket_for(0), Some(0));
        assert_eq!(bounds.bucket_for(59), Some(0));
        assert_eq!(bounds.bucket_for(60), Some(1));
        assert_eq!(bounds.bucket_for(120), Some(2));
        assert_eq!(bounds.bucket_for(10_000), Some(2));
    }

    #[test]
    fn boundaries_are_sorted_and_defaulted() {
        assert_eq!(DurationBoundaries::new(&[120, 0, 60]).as_slice(), &[0, 60, 120]);
        assert_eq!(
            DurationBoundaries::new(&[45]).as_slice(),
            &DEFAULT_DURATION_BOUNDARIES
        );
        assert_eq!(
            DurationBoundaries::new(&[]).as_slice(),
            &DEFAULT_DURATION_BOUNDARIES
        );
        assert_eq!(
            DurationBoundaries::with_fallback(&[], &[0, 90]).as_slice(),
            &[0, 90]
        );
    }

    #[test]
    fn parse_list_skips_garbage() {
        assert_eq!(DurationBoundaries::parse_list("0, 30,abc,-5,60"), vec![0, 30, 60]);
        assert!(DurationBoundaries::parse_list("").is_empty());
    }

    #[test]
    fn sessions_below_every_bound_are_dropped() {
        let sessions = vec![
            with_duration(tournament("2024-01-01", dec!(10), dec!(0)), 15),
            with_duration(tournament("2024-01-02", dec!(10), dec!(0)), 45),
        ];
        let buckets = bucket_by_duration(&sessions, &DurationBoundaries::new(&[30, 60]));
        let counted: usize = buckets.iter().map(|b| b.stats.sessions).sum();
        assert_eq!(counted, 1);
    }

    #[test]
    fn bucket_mixes_formats() {
        let sessions = vec![
            with_duration(cash("2024-01-01", "NL50", dec!(20), dec!(10), 200), 100),
            with_duration(tournament("2024-01-02", dec!(20), dec!(60)), 140),
        ];
        let buckets = bucket_by_duration(&sessions, &DurationBoundaries::new(&[0, 90]));
        let stats = &buckets[1].stats;

        assert_eq!(stats.sessions, 2);
        assert_eq!(stats.cash_sessions, 1);
        assert_eq!(stats.total_profit_money, dec!(50));
        assert_eq!(stats.avg_profit_money, dec!(25));
        assert_eq!(stats.avg_profit_units, dec!(20));
        assert_eq!(stats.units_per_100, dec!(10));
        assert_eq!(stats.total_hours, dec!(4.0));
        assert_eq!(stats.avg_duration_minutes, dec!(120));
        assert_eq!(stats.win_rate, dec!(100));
    }

    #[test]
    fn weekdays_start_on_sunday() {
        // 2024-01-07 was a Sunday, 2024-01-13 a Saturday.
        let sessions = vec![
            tournament("2024-01-07", dec!(10), dec!(0)),
            tournament("2024-01-13", dec!(10), dec!(30)),
            tournament("2024-01-14", dec!(10), dec!(0)),
        ];

        let days = bucket_by_day_of_week(&sessions);

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].day, "Sunday");
        assert_eq!(days[0].stats.sessions, 2);
        assert_eq!(days[6].day, "Saturday");
        assert_eq!(days[6].day_index, 6);
        assert_eq!(days[6].stats.total_profit_money, dec!(20));
        assert_eq!(days[3].stats.sessions, 0);
        assert_eq!(days[3].stats.win_rate, Decimal::ZERO);
    }

    #[test]
    fn time_of_day_averages_whole_hours() {
        // Both on Monday 2024-01-08.
        let mut evening = cash("2024-01-08", "NL50", dec!(1), dec!(0.5), 50);
        evening.start_time = NaiveTime::from_hms_opt(20, 59, 0);
        let mut late = cash("2024-01-08", "NL50", dec!(1), dec!(0.5), 50);
        late.start_time = NaiveTime::from_hms_opt(23, 0, 0);
        let untimed = cash("2024-01-08", "NL50", dec!(1), dec!(0.5), 50);

        let days = bucket_by_day_of_week(&[evening, late, untimed]);

        let monday = &days[1];
        assert_eq!(monday.stats.sessions, 3);
        let tod = monday.time_of_day.as_ref().unwrap();
        assert_eq!(tod.sample_size, 2);
        assert_eq!(tod.avg_start_hour, dec!(21.5));
        assert!(days[2].time_of_day.is_none());
    }
}
