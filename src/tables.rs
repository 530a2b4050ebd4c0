use analytics::{GameTypeGroup, SessionReport};
use comfy_table::{Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.to_vec());
    table
}

fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

fn percent(value: Decimal) -> String {
    format!("{value}%")
}

pub fn print_report(report: &SessionReport) {
    let summary = &report.summary;
    println!(
        "{} sessions ({} cash, {} tournament)",
        summary.total_sessions, summary.cash_sessions, summary.tournament_sessions
    );

    let mut overview = table(&["Metric", "Cash", "Tournament", "Combined"]);
    overview
        .add_row(vec![
            "Profit".to_string(),
            money(summary.cash.total_profit_money),
            money(summary.tournament.total_profit),
            money(summary.combined.total_profit_money),
        ])
        .add_row(vec![
            "Hours".to_string(),
            summary.cash.total_hours.to_string(),
            summary.tournament.total_hours.to_string(),
            summary.combined.total_hours.to_string(),
        ])
        .add_row(vec![
            "Hourly".to_string(),
            money(summary.cash.hourly_rate_money),
            "-".to_string(),
            money(summary.combined.hourly_rate_money),
        ])
        .add_row(vec![
            "Win rate".to_string(),
            percent(summary.cash.win_rate),
            percent(summary.tournament.win_rate),
            percent(summary.combined.win_rate),
        ]);
    println!("{overview}");

    let mut cash = table(&["Units", "Units/100", "Hands", "Units/h"]);
    cash.add_row(vec![
        summary.cash.total_profit_units.to_string(),
        summary.cash.units_per_100.to_string(),
        summary.cash.total_hands.to_string(),
        summary.cash.hourly_rate_units.to_string(),
    ]);
    println!("Cash\n{cash}");

    let mut tournaments = table(&["Played", "Buy-ins", "Cash-outs", "ROI", "ITM", "Avg buy-in"]);
    tournaments.add_row(vec![
        summary.tournament.tournaments_played.to_string(),
        money(summary.tournament.total_buy_ins),
        money(summary.tournament.total_cash_outs),
        percent(summary.tournament.roi),
        percent(summary.tournament.itm_percent),
        money(summary.tournament.avg_buy_in),
    ]);
    println!("Tournaments\n{tournaments}");

    let mut durations = table(&["Duration", "Sessions", "Profit", "Units/100", "Win rate"]);
    for bucket in &report.duration_buckets {
        durations.add_row(vec![
            bucket.range.clone(),
            bucket.stats.sessions.to_string(),
            money(bucket.stats.total_profit_money),
            bucket.stats.units_per_100.to_string(),
            percent(bucket.stats.win_rate),
        ]);
    }
    println!("By duration\n{durations}");

    let mut days = table(&["Day", "Sessions", "Profit", "Avg minutes", "Win rate", "Avg start"]);
    for day in &report.days {
        days.add_row(vec![
            day.day.clone(),
            day.stats.sessions.to_string(),
            money(day.stats.total_profit_money),
            day.stats.avg_duration_minutes.to_string(),
            percent(day.stats.win_rate),
            day.time_of_day
                .as_ref()
                .map_or_else(|| "-".to_string(), |t| format!("{}h", t.avg_start_hour)),
        ]);
    }
    println!("By day of week\n{days}");

    let mut groups = table(&["Type", "Game", "Stakes", "Sessions", "Profit", "Rate", "Win rate"]);
    for group in &report.groups {
        match group {
            GameTypeGroup::Cash(g) => groups.add_row(vec![
                "cash".to_string(),
                g.game_type.clone(),
                g.stakes.clone(),
                g.sessions.to_string(),
                money(g.total_profit_money),
                format!("{} u/100", g.units_per_100),
                percent(g.win_rate),
            ]),
            GameTypeGroup::Tournament(g) => groups.add_row(vec![
                "tournament".to_string(),
                g.game_type.clone(),
                "-".to_string(),
                g.sessions.to_string(),
                money(g.total_profit),
                format!("{}% ROI", g.roi),
                percent(g.win_rate),
            ]),
        };
    }
    println!("By game type\n{groups}");

    if let Some(last) = report.trends.data_points.last() {
        println!(
            "Trend (window {}): cumulative {} over {} sessions, last {} sessions at {} win rate",
            report.trends.window_size,
            money(last.cumulative_profit_money),
            last.session_index,
            last.window_size,
            percent(last.rolling_win_rate),
        );
    }
}
