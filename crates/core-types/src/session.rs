use crate::enums::SessionKind;
use crate::error::CoreError;
use chrono::{NaiveDate, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded session of play.
///
/// The format-specific fields live in [`SessionDetails`], so a cash session can
/// never carry a buy-in and a tournament can never carry a stakes label.
/// Missing numeric fields deserialize as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default, alias = "duration")]
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, with = "hh_mm", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(flatten)]
    pub details: SessionDetails,
}

/// A session as submitted by a client, before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub date: NaiveDate,
    #[serde(default, alias = "duration")]
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, with = "hh_mm", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(flatten)]
    pub details: SessionDetails,
}

/// Largest magnitude accepted for any submitted money or unit amount (10^12).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

impl NewSession {
    /// Checks a submitted session before it is stored.
    ///
    /// Tournament buy-ins and cash-outs must be non-negative, and no amount may
    /// exceed [`MAX_AMOUNT`] in magnitude.
    pub fn validate(&self) -> Result<(), CoreError> {
        let amounts = match &self.details {
            SessionDetails::Cash(cash) => {
                [("profitUnits", cash.profit_units), ("profitMoney", cash.profit_money)]
            }
            SessionDetails::Tournament(tournament) => {
                [("buyIn", tournament.buy_in), ("cashOut", tournament.cash_out)]
            }
        };

        for (field, amount) in amounts {
            if amount.abs() > MAX_AMOUNT {
                return Err(CoreError::InvalidInput(
                    field.to_string(),
                    format!("{amount} is out of range"),
                ));
            }
            if self.details.kind() == SessionKind::Tournament && amount < Decimal::ZERO {
                return Err(CoreError::InvalidInput(
                    field.to_string(),
                    format!("{amount} must not be negative"),
                ));
            }
        }
        Ok(())
    }
}

/// Format-specific data, tagged on the wire by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SessionDetails {
    Cash(CashDetails),
    Tournament(TournamentDetails),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stakes: Option<String>,
    /// Profit in big blinds (or whatever the stakes unit is).
    #[serde(default, alias = "profitBB")]
    pub profit_units: Decimal,
    /// Profit in currency. Derived from `profit_units` when the session is
    /// written and authoritative afterwards.
    #[serde(default, alias = "profitDollars")]
    pub profit_money: Decimal,
    #[serde(default, alias = "hands")]
    pub hands_played: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDetails {
    #[serde(default)]
    pub buy_in: Decimal,
    #[serde(default)]
    pub cash_out: Decimal,
}

impl TournamentDetails {
    pub fn profit(&self) -> Decimal {
        self.cash_out.saturating_sub(self.buy_in)
    }

    /// In the money: any non-zero cash-out.
    pub fn is_itm(&self) -> bool {
        self.cash_out > Decimal::ZERO
    }
}

impl Session {
    pub fn from_new(id: Uuid, new: NewSession) -> Self {
        Self {
            id,
            date: new.date,
            duration_minutes: new.duration_minutes,
            game_type: new.game_type,
            location: new.location,
            notes: new.notes,
            start_time: new.start_time,
            details: new.details,
        }
    }

    pub fn kind(&self) -> SessionKind {
        self.details.kind()
    }

    pub fn as_cash(&self) -> Option<&CashDetails> {
        match &self.details {
            SessionDetails::Cash(cash) => Some(cash),
            SessionDetails::Tournament(_) => None,
        }
    }

    pub fn as_tournament(&self) -> Option<&TournamentDetails> {
        match &self.details {
            SessionDetails::Cash(_) => None,
            SessionDetails::Tournament(tournament) => Some(tournament),
        }
    }

    /// Currency profit: the stored figure for cash, `cash_out - buy_in` for tournaments.
    pub fn profit_money(&self) -> Decimal {
        match &self.details {
            SessionDetails::Cash(cash) => cash.profit_money,
            SessionDetails::Tournament(tournament) => tournament.profit(),
        }
    }

    /// Unit profit. Tournaments have no unit denomination and report zero.
    pub fn profit_units(&self) -> Decimal {
        match &self.details {
            SessionDetails::Cash(cash) => cash.profit_units,
            SessionDetails::Tournament(_) => Decimal::ZERO,
        }
    }

    /// A winning session: positive units for cash, positive net for tournaments.
    pub fn is_winning(&self) -> bool {
        match &self.details {
            SessionDetails::Cash(cash) => cash.profit_units > Decimal::ZERO,
            SessionDetails::Tournament(tournament) => tournament.profit() > Decimal::ZERO,
        }
    }

    pub fn stakes(&self) -> Option<&str> {
        self.as_cash().and_then(|cash| cash.stakes.as_deref())
    }

    pub fn start_hour(&self) -> Option<u32> {
        self.start_time.map(|time| time.hour())
    }
}

impl SessionDetails {
    pub fn kind(&self) -> SessionKind {
        match self {
            SessionDetails::Cash(_) => SessionKind::Cash,
            SessionDetails::Tournament(_) => SessionKind::Tournament,
        }
    }
}

/// `HH:MM` (de)serialization for optional local start times.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn parse(value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value.trim(), FORMAT).ok()
    }

    pub fn format(time: &NaiveTime) -> String {
        time.format(FORMAT).to_string()
    }

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&format(time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse(value).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid start time '{value}', expected HH:MM"))
            }),
        }
    }
}
