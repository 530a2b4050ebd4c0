pub mod enums;
pub mod error;
pub mod session;

// Re-export the core types to provide a clean public API.
pub use enums::SessionKind;
pub use error::CoreError;
pub use session::{
    CashDetails, MAX_AMOUNT, NewSession, Session, SessionDetails, TournamentDetails,
};
