use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a requested seat count was corrected before being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatCorrection {
    /// The requested block exceeds the allocation itself.
    ExceedsAllocated { requested: i32, allocated: i32 },

    /// The requested block exceeds what booking activity has left free.
    ExceedsAvailable { requested: i32, available: i32 },

    /// The requested block is negative and floors at zero.
    NegativeRequest { requested: i32 },

    /// The requested allocation is below the seats already booked.
    BelowBooked { requested: i32, booked: i32 },

    /// The requested allocation is below booked plus blocked seats.
    BelowCommitted { requested: i32, committed: i32 },
}

impl fmt::Display for SeatCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatCorrection::ExceedsAllocated {
                requested,
                allocated,
            } => write!(
                f,
                "Requested {} blocked seats but only {} are allocated",
                requested, allocated
            ),
            SeatCorrection::ExceedsAvailable {
                requested,
                available,
            } => write!(
                f,
                "Requested {} blocked seats but only {} remain after bookings",
                requested, available
            ),
            SeatCorrection::NegativeRequest { requested } => write!(
                f,
                "Requested {} blocked seats, using 0 instead",
                requested
            ),
            SeatCorrection::BelowBooked { requested, booked } => write!(
                f,
                "Requested an allocation of {} but {} seats are already booked",
                requested, booked
            ),
            SeatCorrection::BelowCommitted {
                requested,
                committed,
            } => write!(
                f,
                "Requested an allocation of {} but {} seats are booked or blocked",
                requested, committed
            ),
        }
    }
}

/// Outcome of one clamp-and-apply seat mutation. `applied` is the value the
/// account now holds, which the remote service must be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatMutation {
    pub requested: i32,
    pub applied: i32,
    pub correction: Option<SeatCorrection>,
}

impl SeatMutation {
    pub fn was_clamped(&self) -> bool {
        self.applied != self.requested
    }
}

/// The allocated, booked and blocked seat counts of one series.
///
/// `seat_booked` belongs to the booking subsystem and is never written here.
/// Mutations clamp first and never produce a state where booked plus blocked
/// exceeds the allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAccount {
    seat_allocated: i32,
    seat_booked: i32,
    seat_blocked: i32,
}

impl SeatAccount {
    /// Builds an account from server-held counts. The server is authoritative,
    /// so existing counts are taken as-is apart from flooring negatives at zero.
    pub fn new(seat_allocated: i32, seat_booked: i32, seat_blocked: i32) -> Self {
        Self {
            seat_allocated: seat_allocated.max(0),
            seat_booked: seat_booked.max(0),
            seat_blocked: seat_blocked.max(0),
        }
    }

    pub fn seat_allocated(&self) -> i32 {
        self.seat_allocated
    }

    pub fn seat_booked(&self) -> i32 {
        self.seat_booked
    }

    pub fn seat_blocked(&self) -> i32 {
        self.seat_blocked
    }

    /// Seats not yet taken by bookings, the ceiling for blocking.
    pub fn available_to_block(&self) -> i32 {
        (self.seat_allocated - self.seat_booked).max(0)
    }

    pub fn invariant_holds(&self) -> bool {
        self.seat_booked + self.seat_blocked <= self.seat_allocated
    }

    /// Applies a blocked-seat request, clamped to both the allocation and the
    /// seats left after bookings. Reapplying the same request is a no-op.
    pub fn set_seat_blocked(&mut self, requested: i32) -> SeatMutation {
        let available = self.available_to_block();
        let applied = requested.max(0).min(self.seat_allocated).min(available);
        let correction = if requested < 0 {
            Some(SeatCorrection::NegativeRequest { requested })
        } else if requested > self.seat_allocated {
            Some(SeatCorrection::ExceedsAllocated {
                requested,
                allocated: self.seat_allocated,
            })
        } else if requested > available {
            Some(SeatCorrection::ExceedsAvailable {
                requested,
                available,
            })
        } else {
            None
        };
        self.seat_blocked = applied;
        SeatMutation {
            requested,
            applied,
            correction,
        }
    }

    /// Applies an allocation request, raised if needed so that booked and
    /// blocked seats still fit underneath it.
    pub fn set_seat_allocated(&mut self, requested: i32) -> SeatMutation {
        let committed = self.seat_booked + self.seat_blocked;
        let applied = requested.max(self.seat_booked).max(committed).max(0);
        let correction = if requested < self.seat_booked {
            Some(SeatCorrection::BelowBooked {
                requested,
                booked: self.seat_booked,
            })
        } else if requested < committed {
            Some(SeatCorrection::BelowCommitted {
                requested,
                committed,
            })
        } else {
            None
        };
        self.seat_allocated = applied;
        SeatMutation {
            requested,
            applied,
            correction,
        }
    }
}
