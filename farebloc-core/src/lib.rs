pub mod reference;
pub mod session;
pub mod time;

pub use reference::{AirlineRef, AirportRef, ReferenceSnapshot};
pub use session::SessionContext;
pub use time::{DayPart, DayTime, TimeError};
