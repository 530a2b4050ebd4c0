use chrono::NaiveDate;
use core_types::{Session, SessionKind};
use serde::{Deserialize, Serialize};

/// Optional constraints narrowing a session collection. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Inclusive lower date bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SessionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stakes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_type: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.from.is_none()
            && self.to.is_none()
            && self.kind.is_none()
            && self.stakes.is_none()
            && self.game_type.is_none()
    }

    /// True when the session satisfies every populated constraint.
    /// Tournaments carry no stakes label and so never satisfy a stakes constraint.
    pub fn matches(&self, session: &Session) -> bool {
        self.from.is_none_or(|from| session.date >= from)
            && self.to.is_none_or(|to| session.date <= to)
            && self.kind.is_none_or(|kind| session.kind() == kind)
            && self
                .stakes
                .as_deref()
                .is_none_or(|stakes| session.stakes() == Some(stakes))
            && self
                .game_type
                .as_deref()
                .is_none_or(|game_type| session.game_type.as_deref() == Some(game_type))
    }
}

/// Returns an owned copy of the sessions satisfying `criteria`, in input order.
pub fn filter_sessions(sessions: &[Session], criteria: &FilterCriteria) -> Vec<Session> {
    if criteria.is_empty() {
        return sessions.to_vec();
    }
    sessions
        .iter()
        .filter(|session| criteria.matches(session))
        .cloned()
        .collect()
}
