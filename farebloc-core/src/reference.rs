use serde::{Deserialize, Serialize};

/// One airline from the carrier reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineRef {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// One airport from the station reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportRef {
    pub code: String,
    pub name: String,
}

/// Reference data fetched once when an authoring session opens. The snapshot
/// is read-only for the life of the session and staleness is not detected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceSnapshot {
    airlines: Vec<AirlineRef>,
    airports: Vec<AirportRef>,
}

impl ReferenceSnapshot {
    pub fn new(airlines: Vec<AirlineRef>, airports: Vec<AirportRef>) -> Self {
        Self { airlines, airports }
    }

    pub fn airlines(&self) -> &[AirlineRef] {
        &self.airlines
    }

    pub fn airports(&self) -> &[AirportRef] {
        &self.airports
    }

    pub fn airline_by_code(&self, code: &str) -> Option<&AirlineRef> {
        self.airlines
            .iter()
            .find(|a| a.code.eq_ignore_ascii_case(code))
    }

    pub fn airline_by_id(&self, id: i64) -> Option<&AirlineRef> {
        self.airlines.iter().find(|a| a.id == id)
    }

    pub fn airport_by_code(&self, code: &str) -> Option<&AirportRef> {
        self.airports
            .iter()
            .find(|a| a.code.eq_ignore_ascii_case(code))
    }
}
