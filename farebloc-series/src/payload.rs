//! Wire shapes of the flight-inventory service. Field names and tag values
//! are the remote contract and must not drift.

use chrono::NaiveDate;
use farebloc_core::time::DayTime;
use farebloc_fares::{FareRule, HoldUnit};
use farebloc_inventory::legs::{FlightLeg, LegType};
use serde::{Deserialize, Serialize};

/// One row of the `details[]` array, covering onward and return legs alike.
/// The same shape comes back from the bulk spreadsheet import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegDetail {
    #[serde(rename = "type")]
    pub leg_type: LegType,
    pub from: String,
    pub to: String,
    pub dep_time: Option<DayTime>,
    pub arr_time: Option<DayTime>,
    pub arrival_date: Option<NaiveDate>,
    pub flight_number: String,
    pub airline_id: Option<i64>,
    /// Carrier display name. The code travels as the flight-number prefix.
    pub airline: String,
    pub pnr_number: Option<String>,
    pub baggage_weight: Option<String>,
    pub cabin_baggage: Option<String>,
    pub dep_terminal: Option<String>,
    pub arr_terminal: Option<String>,
}

impl LegDetail {
    pub fn from_leg(leg_type: LegType, leg: &FlightLeg) -> Self {
        Self {
            leg_type,
            from: leg.from_airport.clone(),
            to: leg.to_airport.clone(),
            dep_time: leg.departure_time,
            arr_time: leg.arrival_time,
            arrival_date: leg.effective_arrival_date(),
            flight_number: leg.flight_number.clone(),
            airline_id: leg.airline_id,
            airline: leg.airline_name.clone(),
            pnr_number: leg.pnr.clone(),
            baggage_weight: leg.baggage_weight.clone(),
            cabin_baggage: leg.cabin_baggage.clone(),
            dep_terminal: leg.departure_terminal.clone(),
            arr_terminal: leg.arrival_terminal.clone(),
        }
    }

    /// Rehydrates an authoring leg. The airline code is taken back from the
    /// flight-number prefix; the departure date is series-level and is filled
    /// in by the caller where known.
    pub fn to_leg(&self) -> FlightLeg {
        FlightLeg {
            from_airport: self.from.clone(),
            to_airport: self.to.clone(),
            departure_date: None,
            departure_time: self.dep_time,
            arrival_date: self.arrival_date,
            arrival_time: self.arr_time,
            airline_code: airline_code_of(&self.flight_number),
            airline_id: self.airline_id,
            airline_name: self.airline.clone(),
            flight_number: self.flight_number.clone(),
            pnr: self.pnr_number.clone(),
            baggage_weight: self.baggage_weight.clone(),
            cabin_baggage: self.cabin_baggage.clone(),
            departure_terminal: self.dep_terminal.clone(),
            arrival_terminal: self.arr_terminal.clone(),
        }
    }
}

/// The carrier code embedded in a "XX-123" flight number.
pub fn airline_code_of(flight_number: &str) -> String {
    match flight_number.split_once('-') {
        Some((code, _)) => code.to_string(),
        None => String::new(),
    }
}

/// Body of `POST /flight-inventories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSeriesRequest {
    pub flight_date: NaiveDate,
    pub sector: String,
    pub pnr: Option<String>,
    pub booking_cut_off_days: i32,
    pub naming_cut_off_days: i32,
    pub seat_allocated: i32,
    pub seat_booked: i32,
    pub seat_blocked: i32,
    pub sell_price: i32,
    pub infant_price: i32,
    pub is_active: bool,
    pub is_refundable: bool,
    pub fare_rules: Vec<FareRule>,
    pub hold_type: Option<HoldUnit>,
    pub hold_value: Option<i32>,
    pub hold_booking_days: Option<i32>,
    pub hold_booking_limit: Option<i32>,
    pub is_return: bool,
    pub details: Vec<LegDetail>,
}

/// Body of `PUT /flight-inventories/{id}`: the create shape plus the
/// top-level PNR status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSeriesRequest {
    #[serde(flatten)]
    pub body: CreateSeriesRequest,
    pub pnr_status: Option<String>,
}

/// One persisted series as the list endpoint returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub id: i64,
    #[serde(flatten)]
    pub body: CreateSeriesRequest,
}

/// Body of `PUT /flight-inventories/{id}/seat-blocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatBlockedUpdate {
    pub id: i64,
    pub seat_blocked: i32,
}

/// Body of `PUT /flight-inventories/{id}/seat-allocated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAllocatedUpdate {
    pub id: i64,
    pub seat_allocated: i32,
}

/// Response of `PUT /flight-inventories/{id}/toggle-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleStatusResponse {
    pub is_active: bool,
}
