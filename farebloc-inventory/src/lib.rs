pub mod cutoff;
pub mod legs;
pub mod seats;

pub use cutoff::{validate_cutoff, CutoffViolation};
pub use legs::{FlightLeg, LegError, LegScheduleBuilder, LegType};
pub use seats::{SeatAccount, SeatCorrection, SeatMutation};
