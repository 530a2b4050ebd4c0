//! Properties that must hold for any session log.

use analytics::{
    AnalyticsEngine, DurationBoundaries, FilterCriteria, bucket_by_day_of_week, bucket_by_duration,
    compute_trends, filter_sessions, group_by_game_type, summarize,
};
use chrono::NaiveDate;
use core_types::{CashDetails, Session, SessionDetails, SessionKind, TournamentDetails};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

fn money() -> impl Strategy<Value = Decimal> {
    // Four decimal places, finer than any reported figure.
    (-5_000_000i64..5_000_000).prop_map(|ten_thousandths| Decimal::new(ten_thousandths, 4))
}

fn non_negative_money() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000).prop_map(|ten_thousandths| Decimal::new(ten_thousandths, 4))
}

fn details() -> impl Strategy<Value = SessionDetails> {
    prop_oneof![
        (
            prop::option::of(prop::sample::select(vec!["NL10", "NL50", "PLO100", "live 1/2"])),
            (-500_000i64..500_000).prop_map(|thousandths| Decimal::new(thousandths, 3)),
            money(),
            0u32..2_000,
        )
            .prop_map(|(stakes, profit_units, profit_money, hands_played)| {
                SessionDetails::Cash(CashDetails {
                    stakes: stakes.map(str::to_string),
                    profit_units,
                    profit_money,
                    hands_played,
                })
            }),
        (non_negative_money(), non_negative_money()).prop_map(|(buy_in, cash_out)| {
            SessionDetails::Tournament(TournamentDetails { buy_in, cash_out })
        }),
    ]
}

fn session() -> impl Strategy<Value = Session> {
    (
        0i64..730,
        0u32..600,
        prop::option::of(prop::sample::select(vec!["NLHE", "PLO", "Bounty"])),
        prop::option::of((0u32..24, 0u32..60)),
        details(),
    )
        .prop_map(|(offset, duration_minutes, game_type, start, details)| Session {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(offset),
            duration_minutes,
            game_type: game_type.map(str::to_string),
            location: None,
            notes: None,
            start_time: start.and_then(|(h, m)| chrono::NaiveTime::from_hms_opt(h, m, 0)),
            details,
        })
}

fn criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        prop::option::of(0i64..730),
        prop::option::of(0i64..730),
        prop::option::of(prop::sample::select(vec![SessionKind::Cash, SessionKind::Tournament])),
        prop::option::of(prop::sample::select(vec!["NL10", "NL50"])),
        prop::option::of(prop::sample::select(vec!["NLHE", "PLO"])),
    )
        .prop_map(|(from, to, kind, stakes, game_type)| {
            let day = |offset: i64| NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(offset);
            FilterCriteria {
                from: from.map(day),
                to: to.map(day),
                kind,
                stakes: stakes.map(str::to_string),
                game_type: game_type.map(str::to_string),
            }
        })
}

proptest! {
    #[test]
    fn every_filtered_session_lands_in_exactly_one_bucket(
        sessions in prop::collection::vec(session(), 0..60),
        criteria in criteria(),
        extra_bounds in prop::collection::vec(1u32..500, 1..6),
    ) {
        let filtered = filter_sessions(&sessions, &criteria);
        let mut bounds = vec![0];
        bounds.extend(extra_bounds);

        let by_duration: usize = bucket_by_duration(&filtered, &DurationBoundaries::new(&bounds))
            .iter()
            .map(|b| b.stats.sessions)
            .sum();
        let by_day: usize = bucket_by_day_of_week(&filtered).iter().map(|d| d.stats.sessions).sum();
        let by_group: usize = group_by_game_type(&filtered).iter().map(|g| g.sessions()).sum();

        prop_assert_eq!(by_duration, filtered.len());
        prop_assert_eq!(by_day, filtered.len());
        prop_assert_eq!(by_group, filtered.len());
    }

    #[test]
    fn filtered_sessions_all_satisfy_the_criteria(
        sessions in prop::collection::vec(session(), 0..60),
        criteria in criteria(),
    ) {
        let filtered = filter_sessions(&sessions, &criteria);
        prop_assert!(filtered.iter().all(|s| criteria.matches(s)));
        let expected = sessions.iter().filter(|s| criteria.matches(s)).count();
        prop_assert_eq!(filtered.len(), expected);
    }

    #[test]
    fn aggregators_leave_input_untouched_and_are_repeatable(
        sessions in prop::collection::vec(session(), 0..40),
        window in prop::option::of(-5i64..40),
    ) {
        let snapshot = sessions.clone();
        let engine = AnalyticsEngine::default();

        let first = engine.report(&sessions, None, window);
        let second = engine.report(&sessions, None, window);

        prop_assert_eq!(&sessions, &snapshot);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        prop_assert_eq!(first, second);
    }

    #[test]
    fn cumulative_profit_accumulates_session_profit(
        sessions in prop::collection::vec(session(), 1..60),
        window in 1usize..30,
    ) {
        let points = compute_trends(&sessions, Some(window));
        prop_assert_eq!(points.len(), sessions.len());
        prop_assert_eq!(points[0].cumulative_profit_money, points[0].session_profit_money);
        prop_assert_eq!(points[0].cumulative_profit_units, points[0].session_profit_units);

        for i in 1..points.len() {
            prop_assert_eq!(
                points[i].cumulative_profit_money,
                points[i - 1].cumulative_profit_money + points[i].session_profit_money
            );
            prop_assert_eq!(
                points[i].cumulative_profit_units,
                points[i - 1].cumulative_profit_units + points[i].session_profit_units
            );
            prop_assert!(points[i - 1].date <= points[i].date);
        }
        for (i, point) in points.iter().enumerate() {
            prop_assert_eq!(point.session_index, i + 1);
            prop_assert!(point.window_size <= window.min(i + 1));
        }
    }

    #[test]
    fn summary_counts_partition_the_input(sessions in prop::collection::vec(session(), 0..60)) {
        let report = summarize(&sessions);
        prop_assert_eq!(report.total_sessions, sessions.len());
        prop_assert_eq!(report.cash_sessions + report.tournament_sessions, sessions.len());
        prop_assert!(report.combined.win_rate >= Decimal::ZERO);
        prop_assert!(report.combined.win_rate <= Decimal::ONE_HUNDRED);
    }
}
