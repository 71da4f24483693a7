use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use farebloc_core::reference::ReferenceSnapshot;
use farebloc_core::session::SessionContext;
use farebloc_fares::{CancellationQuote, FareRuleEngine};
use farebloc_inventory::seats::{SeatAccount, SeatMutation};
use tracing::{error, info, warn};

use crate::builder::{SeriesBuilder, ValidationReport};
use crate::gateway::{GatewayError, SeriesGateway};
use crate::payload::{SeatAllocatedUpdate, SeatBlockedUpdate, SeriesRecord};

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("The draft has {} unresolved issue(s)", .0.issues().len())]
    Invalid(ValidationReport),

    #[error(transparent)]
    Remote(#[from] GatewayError),

    #[error("No series with id {0} is loaded")]
    UnknownSeries(i64),
}

/// One back-office editing session over the series list.
///
/// The desk holds the last list the server returned, submits drafts the
/// builder has validated, and applies seat mutations clamp-first: the clamped
/// value goes to the server, and a failed write throws the local copy away in
/// favour of a full reload.
pub struct SeriesDesk {
    gateway: Arc<dyn SeriesGateway>,
    context: SessionContext,
    series: Vec<SeriesRecord>,
    reference: Option<ReferenceSnapshot>,
}

impl SeriesDesk {
    pub fn new(gateway: Arc<dyn SeriesGateway>, context: SessionContext) -> Self {
        Self {
            gateway,
            context,
            series: Vec::new(),
            reference: None,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn series(&self) -> &[SeriesRecord] {
        &self.series
    }

    pub fn find(&self, id: i64) -> Option<&SeriesRecord> {
        self.series.iter().find(|record| record.id == id)
    }

    /// The airline/airport lists for this session, fetched on first use and
    /// kept as-is afterwards. Staleness is not detected.
    pub async fn load_reference(&mut self) -> Result<&ReferenceSnapshot, GatewayError> {
        if self.reference.is_none() {
            let gateway = self.gateway.clone();
            let snapshot = gateway.fetch_reference().await?;
            info!(
                session = %self.context.session_id,
                airlines = snapshot.airlines().len(),
                airports = snapshot.airports().len(),
                "loaded reference snapshot"
            );
            self.reference = Some(snapshot);
        }
        Ok(self.reference.as_ref().expect("snapshot cached above"))
    }

    /// The snapshot already loaded for this session, if any.
    pub fn reference(&self) -> Option<&ReferenceSnapshot> {
        self.reference.as_ref()
    }

    /// Replaces the local list with the server's.
    pub async fn refresh(&mut self) -> Result<&[SeriesRecord], GatewayError> {
        let listed = self.gateway.list_series(&self.context).await?;
        info!(
            session = %self.context.session_id,
            count = listed.len(),
            "refreshed series list"
        );
        self.series = listed;
        Ok(&self.series)
    }

    /// Validates and submits a new series. An invalid draft never reaches the
    /// network.
    pub async fn submit_create(
        &mut self,
        builder: &SeriesBuilder,
        today: NaiveDate,
    ) -> Result<SeriesRecord, DeskError> {
        let request = builder
            .build_create_request(today)
            .map_err(DeskError::Invalid)?;
        let record = self.gateway.create_series(&request).await?;
        info!(
            session = %self.context.session_id,
            id = record.id,
            sector = %record.body.sector,
            "created series"
        );
        self.series.push(record.clone());
        Ok(record)
    }

    /// Validates and submits changes to a persisted series.
    pub async fn submit_update(
        &mut self,
        id: i64,
        builder: &SeriesBuilder,
        pnr_status: Option<String>,
        today: NaiveDate,
    ) -> Result<SeriesRecord, DeskError> {
        let request = builder
            .build_update_request(pnr_status, today)
            .map_err(DeskError::Invalid)?;
        let record = self.gateway.update_series(id, &request).await?;
        info!(session = %self.context.session_id, id, "updated series");
        if let Some(existing) = self.series.iter_mut().find(|r| r.id == id) {
            *existing = record.clone();
        }
        Ok(record)
    }

    /// Clamps and writes a blocked-seat count. The clamped value is what the
    /// server is told; if the write fails the whole list is reloaded and the
    /// local clamp is discarded.
    pub async fn set_seat_blocked(
        &mut self,
        id: i64,
        requested: i32,
    ) -> Result<SeatMutation, DeskError> {
        let record = self.find(id).ok_or(DeskError::UnknownSeries(id))?;
        let mut account = SeatAccount::new(
            record.body.seat_allocated,
            record.body.seat_booked,
            record.body.seat_blocked,
        );
        let mutation = account.set_seat_blocked(requested);
        if let Some(correction) = mutation.correction {
            warn!(session = %self.context.session_id, id, %correction, "seat request corrected");
        }
        let update = SeatBlockedUpdate {
            id,
            seat_blocked: mutation.applied,
        };
        let gateway = self.gateway.clone();
        let outcome = gateway.update_seat_blocked(&update).await;
        match outcome {
            Ok(()) => {
                if let Some(existing) = self.series.iter_mut().find(|r| r.id == id) {
                    existing.body.seat_blocked = mutation.applied;
                }
                info!(session = %self.context.session_id, id, seat_blocked = mutation.applied, "seat block confirmed");
                Ok(mutation)
            }
            Err(error) => {
                self.reload_after_failed_write(id, &error).await;
                Err(DeskError::Remote(error))
            }
        }
    }

    /// Clamps and writes an allocation. Same confirm-or-reload contract as
    /// `set_seat_blocked`.
    pub async fn set_seat_allocated(
        &mut self,
        id: i64,
        requested: i32,
    ) -> Result<SeatMutation, DeskError> {
        let record = self.find(id).ok_or(DeskError::UnknownSeries(id))?;
        let mut account = SeatAccount::new(
            record.body.seat_allocated,
            record.body.seat_booked,
            record.body.seat_blocked,
        );
        let mutation = account.set_seat_allocated(requested);
        if let Some(correction) = mutation.correction {
            warn!(session = %self.context.session_id, id, %correction, "seat request corrected");
        }
        let update = SeatAllocatedUpdate {
            id,
            seat_allocated: mutation.applied,
        };
        let gateway = self.gateway.clone();
        let outcome = gateway.update_seat_allocated(&update).await;
        match outcome {
            Ok(()) => {
                if let Some(existing) = self.series.iter_mut().find(|r| r.id == id) {
                    existing.body.seat_allocated = mutation.applied;
                }
                info!(session = %self.context.session_id, id, seat_allocated = mutation.applied, "seat allocation confirmed");
                Ok(mutation)
            }
            Err(error) => {
                self.reload_after_failed_write(id, &error).await;
                Err(DeskError::Remote(error))
            }
        }
    }

    /// Flips a series between active and inactive. The server owns the flag;
    /// whatever it answers is what the list shows.
    pub async fn toggle_status(&mut self, id: i64) -> Result<bool, DeskError> {
        if self.find(id).is_none() {
            return Err(DeskError::UnknownSeries(id));
        }
        let is_active = self.gateway.toggle_status(id).await?;
        if let Some(existing) = self.series.iter_mut().find(|r| r.id == id) {
            existing.body.is_active = is_active;
        }
        info!(session = %self.context.session_id, id, is_active, "toggled series status");
        Ok(is_active)
    }

    /// What cancelling one seat of a listed series refunds as of today's UTC
    /// date.
    pub fn cancellation_quote(&self, id: i64, today: NaiveDate) -> Option<CancellationQuote> {
        let record = self.find(id)?;
        let days = (record.body.flight_date - today).num_days();
        Some(FareRuleEngine::cancellation_quote(
            record.body.is_refundable,
            &record.body.fare_rules,
            days,
        ))
    }

    /// Today's calendar date as the desk sees it. Validators take it as a
    /// plain parameter so they stay pure.
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    async fn reload_after_failed_write(&mut self, id: i64, cause: &GatewayError) {
        error!(session = %self.context.session_id, id, %cause, "seat write failed, reloading list");
        if let Err(reload_error) = self.refresh().await.map(|_| ()) {
            error!(session = %self.context.session_id, %reload_error, "list reload failed");
        }
    }
}
