pub mod builder;
pub mod desk;
pub mod gateway;
pub mod payload;

pub use builder::{SeriesBuilder, SeriesError, ValidationIssue, ValidationReport};
pub use desk::{DeskError, SeriesDesk};
pub use gateway::{GatewayError, SeriesGateway};
pub use payload::{
    CreateSeriesRequest, LegDetail, SeatAllocatedUpdate, SeatBlockedUpdate, SeriesRecord,
    ToggleStatusResponse, UpdateSeriesRequest,
};
