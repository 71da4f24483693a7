use chrono::{Duration, NaiveDate, NaiveDateTime};
use farebloc_core::reference::AirlineRef;
use farebloc_core::time::{self, DayPart, DayTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LegError {
    #[error("{leg_type} leg {index}: origin airport is required")]
    MissingFromAirport { leg_type: LegType, index: usize },

    #[error("{leg_type} leg {index}: destination airport is required")]
    MissingToAirport { leg_type: LegType, index: usize },

    #[error("First onward leg needs a departure date")]
    MissingDepartureDate,

    #[error("{leg_type} leg {index}: departure time is required")]
    MissingDepartureTime { leg_type: LegType, index: usize },

    #[error("{leg_type} leg {index}: arrival time is required")]
    MissingArrivalTime { leg_type: LegType, index: usize },

    #[error("{leg_type} leg {index}: flight number {flight_number:?} does not start with airline code {airline_code:?}")]
    FlightNumberPrefix {
        leg_type: LegType,
        index: usize,
        flight_number: String,
        airline_code: String,
    },

    #[error("A series must keep at least one onward leg")]
    LastOnwardLeg,

    #[error("No onward leg at index {0}")]
    IndexOutOfRange(usize),

    #[error("Every onward leg needs both airports before a return can be enabled")]
    ReturnNotReady,
}

/// Direction of a leg within the itinerary, also its wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegType {
    Onward,
    Return,
}

impl fmt::Display for LegType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegType::Onward => f.write_str("Onward"),
            LegType::Return => f.write_str("Return"),
        }
    }
}

/// One physical flight segment under authoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub from_airport: String,
    pub to_airport: String,
    pub departure_date: Option<NaiveDate>,
    pub departure_time: Option<DayTime>,
    pub arrival_date: Option<NaiveDate>,
    pub arrival_time: Option<DayTime>,
    pub airline_code: String,
    pub airline_id: Option<i64>,
    pub airline_name: String,
    pub flight_number: String,
    pub pnr: Option<String>,
    pub baggage_weight: Option<String>,
    pub cabin_baggage: Option<String>,
    pub departure_terminal: Option<String>,
    pub arrival_terminal: Option<String>,
}

impl FlightLeg {
    /// A leg is routable once both airport codes are filled in.
    pub fn has_route(&self) -> bool {
        !self.from_airport.trim().is_empty() && !self.to_airport.trim().is_empty()
    }

    pub fn set_airline(&mut self, airline: &AirlineRef) {
        self.airline_code = airline.code.clone();
        self.airline_id = Some(airline.id);
        self.airline_name = airline.name.clone();
    }

    /// Sets the departure time. An arrival time now earlier in the day is
    /// invalidated and must be chosen again.
    pub fn set_departure_time(&mut self, departure: DayTime) {
        if let Some(arrival) = self.arrival_time {
            if arrival < departure {
                self.arrival_time = None;
            }
        }
        self.departure_time = Some(departure);
    }

    /// Arrival times offered for this leg, grouped for the picker. With a
    /// departure time set, only same-or-later times remain selectable.
    pub fn selectable_arrival_times(&self, candidates: &[DayTime]) -> Vec<(DayPart, Vec<DayTime>)> {
        match self.departure_time {
            Some(departure) => {
                time::bucket_by_day_part(&time::arrivals_on_or_after(candidates, departure))
            }
            None => time::bucket_by_day_part(candidates),
        }
    }

    /// The explicit arrival date, or the one inferred from overnight rollover.
    pub fn effective_arrival_date(&self) -> Option<NaiveDate> {
        if self.arrival_date.is_some() {
            return self.arrival_date;
        }
        match (self.departure_time, self.arrival_time) {
            (Some(departure), Some(arrival)) => {
                time::infer_arrival_date(self.departure_date, departure, arrival)
            }
            _ => None,
        }
    }

    pub fn departure_datetime(&self) -> Option<NaiveDateTime> {
        Some(self.departure_time?.on(self.departure_date?))
    }

    pub fn arrival_datetime(&self) -> Option<NaiveDateTime> {
        Some(self.arrival_time?.on(self.effective_arrival_date()?))
    }

    fn validate(&self, leg_type: LegType, index: usize, errors: &mut Vec<LegError>) {
        if self.from_airport.trim().is_empty() {
            errors.push(LegError::MissingFromAirport { leg_type, index });
        }
        if self.to_airport.trim().is_empty() {
            errors.push(LegError::MissingToAirport { leg_type, index });
        }
        if self.departure_time.is_none() {
            errors.push(LegError::MissingDepartureTime { leg_type, index });
        }
        if self.arrival_time.is_none() {
            errors.push(LegError::MissingArrivalTime { leg_type, index });
        }
        if !self.flight_number.is_empty()
            && !self.airline_code.is_empty()
            && !self.flight_number.starts_with(&self.airline_code)
        {
            errors.push(LegError::FlightNumberPrefix {
                leg_type,
                index,
                flight_number: self.flight_number.clone(),
                airline_code: self.airline_code.clone(),
            });
        }
    }
}

/// Maintains the ordered onward legs and keeps the mirrored return legs in
/// step. Return legs reverse the onward itinerary: return leg `r` mirrors
/// onward leg `n-1-r`, copying route and carrier fields while the caller owns
/// the return dates and times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegScheduleBuilder {
    onward: Vec<FlightLeg>,
    returns: Vec<FlightLeg>,
    has_return: bool,
}

impl LegScheduleBuilder {
    /// Starts with a single blank onward leg; a series never has fewer.
    pub fn new() -> Self {
        Self {
            onward: vec![FlightLeg::default()],
            returns: Vec::new(),
            has_return: false,
        }
    }

    /// Rebuilds a schedule from already-partitioned legs, as when editing a
    /// persisted series. No mirroring runs against the loaded return legs.
    pub fn from_parts(onward: Vec<FlightLeg>, returns: Vec<FlightLeg>) -> Self {
        let has_return = !returns.is_empty();
        let onward = if onward.is_empty() {
            vec![FlightLeg::default()]
        } else {
            onward
        };
        Self {
            onward,
            returns,
            has_return,
        }
    }

    pub fn onward_legs(&self) -> &[FlightLeg] {
        &self.onward
    }

    pub fn return_legs(&self) -> &[FlightLeg] {
        &self.returns
    }

    pub fn has_return(&self) -> bool {
        self.has_return
    }

    pub fn onward_leg_mut(&mut self, index: usize) -> Option<&mut FlightLeg> {
        self.onward.get_mut(index)
    }

    pub fn return_leg_mut(&mut self, index: usize) -> Option<&mut FlightLeg> {
        self.returns.get_mut(index)
    }

    /// Appends a blank onward leg and returns its index.
    pub fn add_onward_leg(&mut self) -> usize {
        self.onward.push(FlightLeg::default());
        if self.has_return {
            self.rebuild_returns();
        }
        self.onward.len() - 1
    }

    pub fn remove_onward_leg(&mut self, index: usize) -> Result<FlightLeg, LegError> {
        if index >= self.onward.len() {
            return Err(LegError::IndexOutOfRange(index));
        }
        if self.onward.len() == 1 {
            return Err(LegError::LastOnwardLeg);
        }
        let removed = self.onward.remove(index);
        if self.has_return {
            self.rebuild_returns();
        }
        Ok(removed)
    }

    /// A return may only be enabled once every onward leg is routable.
    pub fn can_enable_return(&self) -> bool {
        self.onward.iter().all(FlightLeg::has_route)
    }

    pub fn set_has_return(&mut self, enabled: bool) -> Result<(), LegError> {
        if enabled {
            if !self.can_enable_return() {
                return Err(LegError::ReturnNotReady);
            }
            self.has_return = true;
            self.rebuild_returns();
        } else {
            self.has_return = false;
            self.returns.clear();
        }
        Ok(())
    }

    /// Resynchronizes the mirror after onward-leg edits. Callers invoke this
    /// explicitly after changing airports, carriers or flight numbers.
    pub fn sync_return_legs(&mut self) {
        if self.has_return {
            self.rebuild_returns();
        }
    }

    /// Copies route and carrier fields from each mirrored onward leg. Return
    /// dates, times and terminals belong to the caller and are never touched.
    fn rebuild_returns(&mut self) {
        let count = self.onward.len();
        self.returns.resize_with(count, FlightLeg::default);
        for (r, ret) in self.returns.iter_mut().enumerate() {
            let mirror = &self.onward[count - 1 - r];
            ret.from_airport = mirror.to_airport.clone();
            ret.to_airport = mirror.from_airport.clone();
            ret.airline_code = mirror.airline_code.clone();
            ret.airline_id = mirror.airline_id;
            ret.airline_name = mirror.airline_name.clone();
            ret.flight_number = mirror.flight_number.clone();
            ret.pnr = mirror.pnr.clone();
            ret.baggage_weight = mirror.baggage_weight.clone();
            ret.cabin_baggage = mirror.cabin_baggage.clone();
        }
    }

    /// The series' nominal flight date: the first onward leg's departure.
    pub fn flight_date(&self) -> Option<NaiveDate> {
        self.onward.first()?.departure_date
    }

    /// Display sector, "ORIG-DEST" or "ORIG-DEST-ORIG" for round trips.
    pub fn sector(&self) -> Option<String> {
        let origin = self.onward.first()?.from_airport.trim();
        let destination = self.onward.last()?.to_airport.trim();
        if origin.is_empty() || destination.is_empty() {
            return None;
        }
        if self.has_return {
            Some(format!("{}-{}-{}", origin, destination, origin))
        } else {
            Some(format!("{}-{}", origin, destination))
        }
    }

    pub fn onward_connection_times(&self) -> Vec<Option<Duration>> {
        Self::connection_times(&self.onward)
    }

    pub fn return_connection_times(&self) -> Vec<Option<Duration>> {
        Self::connection_times(&self.returns)
    }

    fn connection_times(legs: &[FlightLeg]) -> Vec<Option<Duration>> {
        legs.windows(2)
            .map(|pair| {
                time::connection_time(pair[0].arrival_datetime(), pair[1].departure_datetime())
            })
            .collect()
    }

    /// Every problem that must be fixed before the schedule can be submitted.
    pub fn validate(&self) -> Vec<LegError> {
        let mut errors = Vec::new();
        for (index, leg) in self.onward.iter().enumerate() {
            leg.validate(LegType::Onward, index, &mut errors);
        }
        if self.flight_date().is_none() {
            errors.push(LegError::MissingDepartureDate);
        }
        for (index, leg) in self.returns.iter().enumerate() {
            leg.validate(LegType::Return, index, &mut errors);
        }
        errors
    }
}

impl Default for LegScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
