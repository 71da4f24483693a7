use async_trait::async_trait;
use farebloc_core::reference::ReferenceSnapshot;
use farebloc_core::session::SessionContext;

use crate::payload::{
    CreateSeriesRequest, LegDetail, SeatAllocatedUpdate, SeatBlockedUpdate, SeriesRecord,
    UpdateSeriesRequest,
};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Inventory service returned status {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Could not reach the inventory service: {0}")]
    Transport(String),

    #[error("No series with id {0}")]
    NotFound(i64),

    #[error("Unexpected response body: {0}")]
    InvalidResponse(String),
}

/// The remote flight-inventory collaborator. The engine owns validation and
/// payload assembly; everything behind this seam is opaque, including the
/// spreadsheet transform of the bulk import.
#[async_trait]
pub trait SeriesGateway: Send + Sync {
    /// `POST /flight-inventories`.
    async fn create_series(
        &self,
        request: &CreateSeriesRequest,
    ) -> Result<SeriesRecord, GatewayError>;

    /// `PUT /flight-inventories/{id}`.
    async fn update_series(
        &self,
        id: i64,
        request: &UpdateSeriesRequest,
    ) -> Result<SeriesRecord, GatewayError>;

    /// `GET /flight-inventories`, scoped to the session's agency/supplier.
    async fn list_series(
        &self,
        context: &SessionContext,
    ) -> Result<Vec<SeriesRecord>, GatewayError>;

    /// `PUT /flight-inventories/{id}/seat-blocked`.
    async fn update_seat_blocked(&self, update: &SeatBlockedUpdate) -> Result<(), GatewayError>;

    /// `PUT /flight-inventories/{id}/seat-allocated`.
    async fn update_seat_allocated(&self, update: &SeatAllocatedUpdate)
        -> Result<(), GatewayError>;

    /// `PUT /flight-inventories/{id}/toggle-status`; returns the new flag.
    async fn toggle_status(&self, id: i64) -> Result<bool, GatewayError>;

    /// Uploads a spreadsheet and gets back `details[]`-shaped rows.
    async fn import_details(&self, spreadsheet: &[u8]) -> Result<Vec<LegDetail>, GatewayError>;

    /// `GET /reference-data`: the airline and airport lists. Fetched once
    /// when an authoring session opens; the desk never refreshes it.
    async fn fetch_reference(&self) -> Result<ReferenceSnapshot, GatewayError>;
}
