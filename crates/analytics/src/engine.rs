use crate::buckets::{self, DurationBoundaries};
use crate::error::AnalyticsError;
use crate::filter::{self, FilterCriteria};
use crate::groups;
use crate::report::{DayBucket, DurationBucket, GameTypeGroup, SessionReport, SummaryReport, TrendReport};
use crate::summary;
use crate::trends;
use configuration::AnalyticsSettings;
use core_types::Session;

/// A stateless calculator for deriving performance statistics from sessions.
///
/// It only carries the configured defaults; every call is a pure function of
/// its arguments and never touches the input slice.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    default_boundaries: DurationBoundaries,
    default_window: usize,
    max_window: usize,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            default_boundaries: DurationBoundaries::new(&buckets::DEFAULT_DURATION_BOUNDARIES),
            default_window: trends::DEFAULT_WINDOW_SIZE,
            max_window: 200,
        }
    }
}

impl AnalyticsEngine {
    /// Creates an engine from configured defaults, rejecting settings that
    /// could never produce a usable window or bucket layout.
    pub fn new(settings: &AnalyticsSettings) -> Result<Self, AnalyticsError> {
        if settings.default_window_size == 0 {
            return Err(AnalyticsError::InvalidSettings(
                "default_window_size must be at least 1".to_string(),
            ));
        }
        if settings.max_window_size == 0 {
            return Err(AnalyticsError::InvalidSettings(
                "max_window_size must be at least 1".to_string(),
            ));
        }
        if settings.default_window_size > settings.max_window_size {
            return Err(AnalyticsError::InvalidSettings(format!(
                "default_window_size ({}) exceeds max_window_size ({})",
                settings.default_window_size, settings.max_window_size
            )));
        }
        if settings.default_duration_boundaries.len() < 2 {
            return Err(AnalyticsError::InvalidSettings(
                "default_duration_boundaries needs at least two values".to_string(),
            ));
        }

        Ok(Self {
            default_boundaries: DurationBoundaries::new(&settings.default_duration_boundaries),
            default_window: settings.default_window_size,
            max_window: settings.max_window_size,
        })
    }

    pub fn filter(&self, sessions: &[Session], criteria: &FilterCriteria) -> Vec<Session> {
        filter::filter_sessions(sessions, criteria)
    }

    pub fn summarize(&self, sessions: &[Session]) -> SummaryReport {
        summary::summarize(sessions)
    }

    /// Duration buckets for the requested bounds, or the configured defaults
    /// when fewer than two are requested.
    pub fn by_duration(&self, sessions: &[Session], boundaries: Option<&[u32]>) -> Vec<DurationBucket> {
        let boundaries = DurationBoundaries::with_fallback(
            boundaries.unwrap_or_default(),
            self.default_boundaries.as_slice(),
        );
        buckets::bucket_by_duration(sessions, &boundaries)
    }

    pub fn by_day_of_week(&self, sessions: &[Session]) -> Vec<DayBucket> {
        buckets::bucket_by_day_of_week(sessions)
    }

    pub fn by_game_type(&self, sessions: &[Session]) -> Vec<GameTypeGroup> {
        groups::group_by_game_type(sessions)
    }

    /// Clamps a caller's window into `1..=max_window`. Absent or zero means the
    /// configured default.
    pub fn clamp_window(&self, requested: Option<i64>) -> usize {
        match requested {
            None | Some(0) => self.default_window,
            Some(size) => {
                let max = i64::try_from(self.max_window).unwrap_or(i64::MAX);
                // In range 1..=max, so the conversion back cannot fail.
                usize::try_from(size.clamp(1, max)).unwrap_or(self.default_window)
            }
        }
    }

    pub fn trends(&self, sessions: &[Session], window: Option<i64>) -> TrendReport {
        let window_size = self.clamp_window(window);
        TrendReport {
            window_size,
            data_points: trends::compute_trends(sessions, Some(window_size)),
        }
    }

    /// Every view over the same filtered collection.
    pub fn report(
        &self,
        sessions: &[Session],
        boundaries: Option<&[u32]>,
        window: Option<i64>,
    ) -> SessionReport {
        SessionReport {
            summary: self.summarize(sessions),
            duration_buckets: self.by_duration(sessions, boundaries),
            days: self.by_day_of_week(sessions),
            groups: self.by_game_type(sessions),
            trends: self.trends(sessions, window),
        }
    }
}
