use chrono::NaiveDate;
use farebloc_core::time::days_until;
use farebloc_fares::{
    CancellationQuote, FareRule, FareRuleEngine, FareRuleError, HoldBookingPolicy, HoldPolicyError,
};
use farebloc_inventory::cutoff::{validate_cutoff, CutoffViolation};
use farebloc_inventory::legs::{FlightLeg, LegError, LegScheduleBuilder, LegType};

use crate::payload::{CreateSeriesRequest, LegDetail, SeriesRecord, UpdateSeriesRequest};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("Set the first onward leg's departure date before adding fare rules")]
    FlightDateUnknown,

    #[error(transparent)]
    FareRule(#[from] FareRuleError),

    #[error(transparent)]
    HoldPolicy(#[from] HoldPolicyError),
}

/// One problem found while validating a series draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error(transparent)]
    Leg(#[from] LegError),

    #[error(transparent)]
    Cutoff(#[from] CutoffViolation),

    #[error("Fare rule {index}: {error}")]
    FareRule { index: usize, error: FareRuleError },

    #[error(transparent)]
    HoldPolicy(#[from] HoldPolicyError),
}

/// Everything wrong with a draft, gathered in one pass so a single submit
/// attempt surfaces every problem at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

/// Authoring state for one flight series. Collects the leg schedule, seat
/// allocation, pricing, refund tiers and hold policy, validates the whole
/// draft, and assembles the wire payloads.
///
/// Nothing here re-validates implicitly: after changing the price, the flight
/// date or the hold cutoff, callers invoke the matching `revalidate_*`
/// function themselves.
#[derive(Debug, Clone)]
pub struct SeriesBuilder {
    schedule: LegScheduleBuilder,
    pnr: Option<String>,
    booking_cutoff_days: i32,
    naming_cutoff_days: i32,
    seat_allocated: i32,
    price_per_seat: i32,
    infant_price: i32,
    is_refundable: bool,
    fare_rules: Vec<FareRule>,
    hold_policy: Option<HoldBookingPolicy>,
    meal_option: Option<String>,
    seat_option: Option<String>,
    special_tag: Option<String>,
    allow_tba_user: bool,
}

impl SeriesBuilder {
    pub fn new() -> Self {
        Self {
            schedule: LegScheduleBuilder::new(),
            pnr: None,
            booking_cutoff_days: 0,
            naming_cutoff_days: 0,
            seat_allocated: 0,
            price_per_seat: 0,
            infant_price: 0,
            is_refundable: false,
            fare_rules: Vec::new(),
            hold_policy: None,
            meal_option: None,
            seat_option: None,
            special_tag: None,
            allow_tba_user: false,
        }
    }

    pub fn schedule(&self) -> &LegScheduleBuilder {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut LegScheduleBuilder {
        &mut self.schedule
    }

    pub fn pnr(&self) -> Option<&str> {
        self.pnr.as_deref()
    }

    pub fn set_pnr(&mut self, pnr: Option<String>) {
        self.pnr = pnr;
    }

    pub fn set_cutoff_days(&mut self, booking: i32, naming: i32) {
        self.booking_cutoff_days = booking.max(0);
        self.naming_cutoff_days = naming.max(0);
    }

    pub fn seat_allocated(&self) -> i32 {
        self.seat_allocated
    }

    pub fn set_seat_allocated(&mut self, seats: i32) {
        self.seat_allocated = seats.max(0);
    }

    pub fn price_per_seat(&self) -> i32 {
        self.price_per_seat
    }

    /// Sets the per-seat price. The fare-rule and flat-hold bounds are
    /// relative to it, so follow up with `revalidate_fare_rules` and
    /// `revalidate_hold_policy`.
    pub fn set_price_per_seat(&mut self, price: i32) {
        self.price_per_seat = price.max(0);
    }

    pub fn set_infant_price(&mut self, price: i32) {
        self.infant_price = price.max(0);
    }

    pub fn is_refundable(&self) -> bool {
        self.is_refundable
    }

    pub fn set_refundable(&mut self, refundable: bool) {
        self.is_refundable = refundable;
    }

    pub fn set_categoricals(
        &mut self,
        meal_option: Option<String>,
        seat_option: Option<String>,
        special_tag: Option<String>,
        allow_tba_user: bool,
    ) {
        self.meal_option = meal_option;
        self.seat_option = seat_option;
        self.special_tag = special_tag;
        self.allow_tba_user = allow_tba_user;
    }

    pub fn meal_option(&self) -> Option<&str> {
        self.meal_option.as_deref()
    }

    pub fn seat_option(&self) -> Option<&str> {
        self.seat_option.as_deref()
    }

    pub fn special_tag(&self) -> Option<&str> {
        self.special_tag.as_deref()
    }

    pub fn allow_tba_user(&self) -> bool {
        self.allow_tba_user
    }

    /// Whole days from today to the series' nominal flight date, once the
    /// first onward leg has one.
    pub fn days_until_departure(&self, today: NaiveDate) -> Option<i64> {
        self.schedule
            .flight_date()
            .map(|date| days_until(date, today))
    }

    pub fn fare_rules(&self) -> &[FareRule] {
        &self.fare_rules
    }

    /// Adds a refund tier after checking it against the current price and the
    /// days actually remaining before departure.
    pub fn add_fare_rule(&mut self, rule: FareRule, today: NaiveDate) -> Result<(), SeriesError> {
        let flight_date = self
            .schedule
            .flight_date()
            .ok_or(SeriesError::FlightDateUnknown)?;
        FareRuleEngine::validate_rule(&rule, self.price_per_seat, flight_date, today)?;
        self.fare_rules.push(rule);
        Ok(())
    }

    pub fn remove_fare_rule(&mut self, index: usize) -> Option<FareRule> {
        if index < self.fare_rules.len() {
            Some(self.fare_rules.remove(index))
        } else {
            None
        }
    }

    /// Re-checks every authored tier, as after a price or date change.
    /// Returns the failing tiers by index; an unknown flight date defers the
    /// check to full validation.
    pub fn revalidate_fare_rules(&self, today: NaiveDate) -> Vec<(usize, FareRuleError)> {
        match self.schedule.flight_date() {
            Some(flight_date) => FareRuleEngine::revalidate(
                &self.fare_rules,
                self.price_per_seat,
                flight_date,
                today,
            ),
            None => Vec::new(),
        }
    }

    pub fn hold_policy(&self) -> Option<&HoldBookingPolicy> {
        self.hold_policy.as_ref()
    }

    /// Enables holds. The policy must already satisfy its bounds against the
    /// current price.
    pub fn set_hold_policy(&mut self, policy: HoldBookingPolicy) -> Result<(), SeriesError> {
        policy.validate(self.price_per_seat)?;
        self.hold_policy = Some(policy);
        Ok(())
    }

    /// Disables holds, dropping the whole configuration.
    pub fn clear_hold_policy(&mut self) {
        self.hold_policy = None;
    }

    /// Re-checks the hold policy, as after a price or cutoff change.
    pub fn revalidate_hold_policy(&self) -> Result<(), HoldPolicyError> {
        match &self.hold_policy {
            Some(policy) => policy.validate(self.price_per_seat),
            None => Ok(()),
        }
    }

    /// What cancelling one seat today would refund.
    pub fn cancellation_quote(&self, today: NaiveDate) -> Option<CancellationQuote> {
        let days = self.days_until_departure(today)?;
        Some(FareRuleEngine::cancellation_quote(
            self.is_refundable,
            &self.fare_rules,
            days,
        ))
    }

    /// Checks the whole draft, gathering every issue rather than stopping at
    /// the first.
    pub fn validate(&self, today: NaiveDate) -> ValidationReport {
        let mut report = ValidationReport::default();
        for error in self.schedule.validate() {
            report.push(ValidationIssue::Leg(error));
        }
        if let Some(flight_date) = self.schedule.flight_date() {
            if let Err(violation) = validate_cutoff(
                flight_date,
                self.booking_cutoff_days,
                self.naming_cutoff_days,
                today,
            ) {
                report.push(ValidationIssue::Cutoff(violation));
            }
        }
        if self.is_refundable {
            for (index, error) in self.revalidate_fare_rules(today) {
                report.push(ValidationIssue::FareRule { index, error });
            }
        }
        if let Err(error) = self.revalidate_hold_policy() {
            report.push(ValidationIssue::HoldPolicy(error));
        }
        report
    }

    /// Validates the draft and assembles the creation payload. A draft with
    /// any outstanding issue never reaches the wire.
    pub fn build_create_request(&self, today: NaiveDate) -> Result<CreateSeriesRequest, ValidationReport> {
        let report = self.validate(today);
        if !report.is_ok() {
            return Err(report);
        }
        let flight_date = self
            .schedule
            .flight_date()
            .expect("validation requires a departure date");
        let sector = self
            .schedule
            .sector()
            .expect("validation requires airports on every leg");

        let mut details: Vec<LegDetail> = self
            .schedule
            .onward_legs()
            .iter()
            .map(|leg| LegDetail::from_leg(LegType::Onward, leg))
            .collect();
        details.extend(
            self.schedule
                .return_legs()
                .iter()
                .map(|leg| LegDetail::from_leg(LegType::Return, leg)),
        );

        let fare_rules = if self.is_refundable {
            self.fare_rules.clone()
        } else {
            Vec::new()
        };

        Ok(CreateSeriesRequest {
            flight_date,
            sector,
            pnr: self.pnr.clone(),
            booking_cut_off_days: self.booking_cutoff_days,
            naming_cut_off_days: self.naming_cutoff_days,
            seat_allocated: self.seat_allocated,
            seat_booked: 0,
            seat_blocked: 0,
            sell_price: self.price_per_seat,
            infant_price: self.infant_price,
            is_active: true,
            is_refundable: self.is_refundable,
            fare_rules,
            hold_type: self.hold_policy.map(|p| p.unit),
            hold_value: self.hold_policy.map(|p| p.amount),
            hold_booking_days: self.hold_policy.map(|p| p.cutoff_days),
            hold_booking_limit: self.hold_policy.map(|p| p.limit_hours),
            is_return: self.schedule.has_return(),
            details,
        })
    }

    /// The update payload: the create shape plus the top-level PNR status.
    pub fn build_update_request(
        &self,
        pnr_status: Option<String>,
        today: NaiveDate,
    ) -> Result<UpdateSeriesRequest, ValidationReport> {
        Ok(UpdateSeriesRequest {
            body: self.build_create_request(today)?,
            pnr_status,
        })
    }

    /// Rebuilds authoring state from a persisted series, as when the edit
    /// screen opens. The wire carries one date for the whole series, so the
    /// first onward leg takes it and the rest stay with the leg rows.
    pub fn from_record(record: &SeriesRecord) -> Self {
        let body = &record.body;
        let mut builder = Self::new();
        builder.replace_schedule(&body.details, Some(body.flight_date));
        builder.pnr = body.pnr.clone();
        builder.booking_cutoff_days = body.booking_cut_off_days.max(0);
        builder.naming_cutoff_days = body.naming_cut_off_days.max(0);
        builder.seat_allocated = body.seat_allocated.max(0);
        builder.price_per_seat = body.sell_price.max(0);
        builder.infant_price = body.infant_price.max(0);
        builder.is_refundable = body.is_refundable;
        builder.fare_rules = body.fare_rules.clone();
        builder.hold_policy = match (
            body.hold_type,
            body.hold_value,
            body.hold_booking_days,
            body.hold_booking_limit,
        ) {
            (Some(unit), Some(amount), Some(cutoff_days), Some(limit_hours)) => {
                Some(HoldBookingPolicy {
                    unit,
                    amount,
                    cutoff_days,
                    limit_hours,
                })
            }
            _ => None,
        };
        builder
    }

    /// Replaces the leg schedule with rows returned by the bulk spreadsheet
    /// import. Departure dates are not part of the row shape and are filled
    /// in afterwards by the caller.
    pub fn absorb_import_details(&mut self, details: &[LegDetail]) {
        self.replace_schedule(details, None);
    }

    fn replace_schedule(&mut self, details: &[LegDetail], flight_date: Option<NaiveDate>) {
        let mut onward: Vec<FlightLeg> = Vec::new();
        let mut returns: Vec<FlightLeg> = Vec::new();
        for detail in details {
            let leg = detail.to_leg();
            match detail.leg_type {
                LegType::Onward => onward.push(leg),
                LegType::Return => returns.push(leg),
            }
        }
        if let (Some(date), Some(first)) = (flight_date, onward.first_mut()) {
            first.departure_date = Some(date);
        }
        self.schedule = LegScheduleBuilder::from_parts(onward, returns);
    }
}

impl Default for SeriesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
