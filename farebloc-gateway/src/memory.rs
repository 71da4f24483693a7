use async_trait::async_trait;
use farebloc_core::reference::ReferenceSnapshot;
use farebloc_core::session::SessionContext;
use farebloc_series::gateway::{GatewayError, SeriesGateway};
use farebloc_series::payload::{
    CreateSeriesRequest, LegDetail, SeatAllocatedUpdate, SeatBlockedUpdate, SeriesRecord,
    UpdateSeriesRequest,
};
use tokio::sync::Mutex;

#[derive(Default)]
struct MemoryState {
    series: Vec<SeriesRecord>,
    next_id: i64,
    fail_next_seat_write: bool,
    staged_import: Vec<LegDetail>,
    reference: ReferenceSnapshot,
    reference_fetches: u32,
}

/// In-memory inventory service for tests: assigns ids, owns the stored
/// records, and can be scripted to fail the next seat write so the desk's
/// reload path can be exercised.
pub struct InMemorySeriesGateway {
    state: Mutex<MemoryState>,
}

impl InMemorySeriesGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 1,
                ..MemoryState::default()
            }),
        }
    }

    /// Makes the next seat-blocked or seat-allocated write fail once.
    pub async fn fail_next_seat_write(&self) {
        self.state.lock().await.fail_next_seat_write = true;
    }

    /// Scripts the rows the next spreadsheet import returns.
    pub async fn stage_import(&self, details: Vec<LegDetail>) {
        self.state.lock().await.staged_import = details;
    }

    /// Scripts the airline/airport lists the reference fetch returns.
    pub async fn stage_reference(&self, snapshot: ReferenceSnapshot) {
        self.state.lock().await.reference = snapshot;
    }

    /// How many times the reference lists have been fetched.
    pub async fn reference_fetch_count(&self) -> u32 {
        self.state.lock().await.reference_fetches
    }

    /// Simulates the booking subsystem taking seats behind the desk's back.
    pub async fn set_seat_booked(&self, id: i64, seat_booked: i32) {
        let mut state = self.state.lock().await;
        if let Some(record) = state.series.iter_mut().find(|r| r.id == id) {
            record.body.seat_booked = seat_booked;
        }
    }

    pub async fn stored(&self, id: i64) -> Option<SeriesRecord> {
        self.state
            .lock()
            .await
            .series
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}

impl Default for InMemorySeriesGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeriesGateway for InMemorySeriesGateway {
    async fn create_series(
        &self,
        request: &CreateSeriesRequest,
    ) -> Result<SeriesRecord, GatewayError> {
        let mut state = self.state.lock().await;
        let record = SeriesRecord {
            id: state.next_id,
            body: request.clone(),
        };
        state.next_id += 1;
        state.series.push(record.clone());
        Ok(record)
    }

    async fn update_series(
        &self,
        id: i64,
        request: &UpdateSeriesRequest,
    ) -> Result<SeriesRecord, GatewayError> {
        let mut state = self.state.lock().await;
        let existing = state
            .series
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(GatewayError::NotFound(id))?;
        // Seat counts are server-owned during an update; only the authored
        // fields are replaced.
        let mut body = request.body.clone();
        body.seat_booked = existing.body.seat_booked;
        body.seat_blocked = existing.body.seat_blocked;
        existing.body = body;
        Ok(existing.clone())
    }

    async fn list_series(
        &self,
        _context: &SessionContext,
    ) -> Result<Vec<SeriesRecord>, GatewayError> {
        Ok(self.state.lock().await.series.clone())
    }

    async fn update_seat_blocked(&self, update: &SeatBlockedUpdate) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        if state.fail_next_seat_write {
            state.fail_next_seat_write = false;
            return Err(GatewayError::Remote {
                status: 500,
                message: "scripted seat-write failure".to_string(),
            });
        }
        let record = state
            .series
            .iter_mut()
            .find(|r| r.id == update.id)
            .ok_or(GatewayError::NotFound(update.id))?;
        record.body.seat_blocked = update.seat_blocked;
        Ok(())
    }

    async fn update_seat_allocated(
        &self,
        update: &SeatAllocatedUpdate,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        if state.fail_next_seat_write {
            state.fail_next_seat_write = false;
            return Err(GatewayError::Remote {
                status: 500,
                message: "scripted seat-write failure".to_string(),
            });
        }
        let record = state
            .series
            .iter_mut()
            .find(|r| r.id == update.id)
            .ok_or(GatewayError::NotFound(update.id))?;
        record.body.seat_allocated = update.seat_allocated;
        Ok(())
    }

    async fn toggle_status(&self, id: i64) -> Result<bool, GatewayError> {
        let mut state = self.state.lock().await;
        let record = state
            .series
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(GatewayError::NotFound(id))?;
        record.body.is_active = !record.body.is_active;
        Ok(record.body.is_active)
    }

    async fn import_details(&self, _spreadsheet: &[u8]) -> Result<Vec<LegDetail>, GatewayError> {
        Ok(self.state.lock().await.staged_import.clone())
    }

    async fn fetch_reference(&self) -> Result<ReferenceSnapshot, GatewayError> {
        let mut state = self.state.lock().await;
        state.reference_fetches += 1;
        Ok(state.reference.clone())
    }
}
