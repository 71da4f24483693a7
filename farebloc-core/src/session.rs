use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one back-office authoring session. Agency and supplier scoping
/// travels through this context explicitly instead of ambient storage reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub agency_id: Option<i64>,
    pub supplier_id: Option<i64>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            agency_id: None,
            supplier_id: None,
        }
    }

    pub fn for_agency(agency_id: i64) -> Self {
        Self {
            agency_id: Some(agency_id),
            ..Self::new()
        }
    }

    pub fn with_supplier(mut self, supplier_id: i64) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
