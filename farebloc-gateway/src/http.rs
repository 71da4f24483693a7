use std::time::Duration;

use async_trait::async_trait;
use farebloc_core::reference::ReferenceSnapshot;
use farebloc_core::session::SessionContext;
use farebloc_series::gateway::{GatewayError, SeriesGateway};
use farebloc_series::payload::{
    CreateSeriesRequest, LegDetail, SeatAllocatedUpdate, SeatBlockedUpdate, SeriesRecord,
    ToggleStatusResponse, UpdateSeriesRequest,
};
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::app_config::AppConfig;

/// Reqwest-backed client for the flight-inventory routes.
#[derive(Clone)]
pub struct HttpSeriesGateway {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl HttpSeriesGateway {
    pub fn new(config: &AppConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.api.request_timeout_seconds))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            page_size: config.listing.page_size,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| String::new());
            error!(status = status.as_u16(), "inventory service rejected the call");
            return Err(GatewayError::Remote {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    async fn read_empty(response: reqwest::Response) -> Result<(), GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| String::new());
            error!(status = status.as_u16(), "inventory service rejected the call");
            return Err(GatewayError::Remote {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

fn transport(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

/// Query string of the list call: the configured page size plus the
/// session's agency/supplier scope. Filtering happens server-side.
fn list_query(context: &SessionContext, page_size: u32) -> Vec<(&'static str, String)> {
    let mut query = vec![("page_size", page_size.to_string())];
    if let Some(agency_id) = context.agency_id {
        query.push(("agency_id", agency_id.to_string()));
    }
    if let Some(supplier_id) = context.supplier_id {
        query.push(("supplier_id", supplier_id.to_string()));
    }
    query
}

#[async_trait]
impl SeriesGateway for HttpSeriesGateway {
    async fn create_series(
        &self,
        request: &CreateSeriesRequest,
    ) -> Result<SeriesRecord, GatewayError> {
        let response = self
            .client
            .post(self.url("/flight-inventories"))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        let record: SeriesRecord = Self::read_json(response).await?;
        info!(id = record.id, sector = %record.body.sector, "series created");
        Ok(record)
    }

    async fn update_series(
        &self,
        id: i64,
        request: &UpdateSeriesRequest,
    ) -> Result<SeriesRecord, GatewayError> {
        let response = self
            .client
            .put(self.url(&format!("/flight-inventories/{}", id)))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        Self::read_json(response).await
    }

    async fn list_series(
        &self,
        context: &SessionContext,
    ) -> Result<Vec<SeriesRecord>, GatewayError> {
        let response = self
            .client
            .get(self.url("/flight-inventories"))
            .query(&list_query(context, self.page_size))
            .send()
            .await
            .map_err(transport)?;
        Self::read_json(response).await
    }

    async fn update_seat_blocked(&self, update: &SeatBlockedUpdate) -> Result<(), GatewayError> {
        let response = self
            .client
            .put(self.url(&format!("/flight-inventories/{}/seat-blocked", update.id)))
            .json(update)
            .send()
            .await
            .map_err(transport)?;
        Self::read_empty(response).await
    }

    async fn update_seat_allocated(
        &self,
        update: &SeatAllocatedUpdate,
    ) -> Result<(), GatewayError> {
        let response = self
            .client
            .put(self.url(&format!(
                "/flight-inventories/{}/seat-allocated",
                update.id
            )))
            .json(update)
            .send()
            .await
            .map_err(transport)?;
        Self::read_empty(response).await
    }

    async fn toggle_status(&self, id: i64) -> Result<bool, GatewayError> {
        let response = self
            .client
            .put(self.url(&format!("/flight-inventories/{}/toggle-status", id)))
            .send()
            .await
            .map_err(transport)?;
        let status: ToggleStatusResponse = Self::read_json(response).await?;
        Ok(status.is_active)
    }

    async fn import_details(&self, spreadsheet: &[u8]) -> Result<Vec<LegDetail>, GatewayError> {
        let response = self
            .client
            .post(self.url("/flight-inventories/import"))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(spreadsheet.to_vec())
            .send()
            .await
            .map_err(transport)?;
        Self::read_json(response).await
    }

    async fn fetch_reference(&self) -> Result<ReferenceSnapshot, GatewayError> {
        let response = self
            .client
            .get(self.url("/reference-data"))
            .send()
            .await
            .map_err(transport)?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_carries_scope_and_page_size() {
        let context = SessionContext::for_agency(42).with_supplier(9);
        let query = list_query(&context, 25);
        assert_eq!(
            query,
            vec![
                ("page_size", "25".to_string()),
                ("agency_id", "42".to_string()),
                ("supplier_id", "9".to_string()),
            ]
        );
    }

    #[test]
    fn test_unscoped_session_sends_only_the_page_size() {
        let context = SessionContext::new();
        assert_eq!(
            list_query(&context, 50),
            vec![("page_size", "50".to_string())]
        );
    }
}
