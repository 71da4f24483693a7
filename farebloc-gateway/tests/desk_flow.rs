use std::sync::Arc;

use chrono::NaiveDate;
use farebloc_core::reference::{AirlineRef, AirportRef, ReferenceSnapshot};
use farebloc_core::session::SessionContext;
use farebloc_core::time::DayTime;
use farebloc_fares::{FareRule, HoldBookingPolicy, HoldUnit};
use farebloc_gateway::InMemorySeriesGateway;
use farebloc_inventory::legs::LegType;
use farebloc_inventory::seats::SeatCorrection;
use farebloc_series::builder::SeriesBuilder;
use farebloc_series::desk::{DeskError, SeriesDesk};
use farebloc_series::gateway::SeriesGateway;
use farebloc_series::payload::LegDetail;

fn t(value: &str) -> DayTime {
    DayTime::parse(value).unwrap()
}

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn today() -> NaiveDate {
    d(2026, 3, 1)
}

/// A complete BOM-DXB draft departing 45 days out, with 50 seats at 5000.
fn draft() -> SeriesBuilder {
    let mut builder = SeriesBuilder::new();
    {
        let leg = builder.schedule_mut().onward_leg_mut(0).unwrap();
        leg.from_airport = "BOM".to_string();
        leg.to_airport = "DXB".to_string();
        leg.departure_date = Some(d(2026, 4, 15));
        leg.set_departure_time(t("08:00"));
        leg.arrival_time = Some(t("10:30"));
        leg.airline_code = "EK".to_string();
        leg.airline_id = Some(12);
        leg.airline_name = "Emirates".to_string();
        leg.flight_number = "EK-501".to_string();
    }
    builder.set_cutoff_days(3, 1);
    builder.set_seat_allocated(50);
    builder.set_price_per_seat(5000);
    builder.set_infant_price(500);
    builder
}

fn desk_with(gateway: &Arc<InMemorySeriesGateway>) -> SeriesDesk {
    SeriesDesk::new(gateway.clone(), SessionContext::for_agency(42))
}

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let record = desk.submit_create(&draft(), today()).await.unwrap();
    assert_eq!(record.id, 1);
    assert_eq!(record.body.sector, "BOM-DXB");
    assert_eq!(record.body.seat_allocated, 50);
    assert_eq!(record.body.seat_booked, 0);
    assert!(record.body.is_active);

    let listed = desk.refresh().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, 1);
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_the_gateway() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let result = desk.submit_create(&SeriesBuilder::new(), today()).await;
    match result {
        Err(DeskError::Invalid(report)) => assert!(!report.is_ok()),
        other => panic!("expected a validation failure, got {:?}", other.map(|r| r.id)),
    }

    desk.refresh().await.unwrap();
    assert!(desk.series().is_empty());
}

#[tokio::test]
async fn test_cutoff_violation_blocks_creation() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let mut builder = draft();
    builder.schedule_mut().onward_leg_mut(0).unwrap().departure_date =
        Some(today() + chrono::Duration::days(5));
    builder.set_cutoff_days(10, 0);

    let result = desk.submit_create(&builder, today()).await;
    assert!(matches!(result, Err(DeskError::Invalid(_))));
    desk.refresh().await.unwrap();
    assert!(desk.series().is_empty());
}

#[tokio::test]
async fn test_seat_block_clamps_then_confirms_remotely() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let record = desk.submit_create(&draft(), today()).await.unwrap();
    gateway.set_seat_booked(record.id, 40).await;
    desk.refresh().await.unwrap();

    let mutation = desk.set_seat_blocked(record.id, 20).await.unwrap();
    assert_eq!(mutation.applied, 10);
    assert_eq!(
        mutation.correction,
        Some(SeatCorrection::ExceedsAvailable {
            requested: 20,
            available: 10,
        })
    );

    let stored = gateway.stored(record.id).await.unwrap();
    assert_eq!(stored.body.seat_blocked, 10);
    assert!(stored.body.seat_booked + stored.body.seat_blocked <= stored.body.seat_allocated);
    assert_eq!(desk.find(record.id).unwrap().body.seat_blocked, 10);
}

#[tokio::test]
async fn test_allocation_raised_to_cover_committed_seats() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let record = desk.submit_create(&draft(), today()).await.unwrap();
    gateway.set_seat_booked(record.id, 30).await;
    desk.refresh().await.unwrap();
    desk.set_seat_blocked(record.id, 15).await.unwrap();

    let mutation = desk.set_seat_allocated(record.id, 20).await.unwrap();
    assert_eq!(mutation.applied, 45);
    assert_eq!(
        mutation.correction,
        Some(SeatCorrection::BelowBooked {
            requested: 20,
            booked: 30,
        })
    );

    let stored = gateway.stored(record.id).await.unwrap();
    assert_eq!(stored.body.seat_allocated, 45);
    assert!(stored.body.seat_booked + stored.body.seat_blocked <= stored.body.seat_allocated);
}

#[tokio::test]
async fn test_failed_seat_write_reloads_authoritative_state() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let record = desk.submit_create(&draft(), today()).await.unwrap();
    desk.refresh().await.unwrap();

    gateway.fail_next_seat_write().await;
    let result = desk.set_seat_blocked(record.id, 5).await;
    assert!(matches!(result, Err(DeskError::Remote(_))));

    // The local clamp was discarded: the desk shows what the server holds.
    assert_eq!(desk.find(record.id).unwrap().body.seat_blocked, 0);
    assert_eq!(gateway.stored(record.id).await.unwrap().body.seat_blocked, 0);
}

#[tokio::test]
async fn test_negative_seat_request_is_reported_and_floored() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let record = desk.submit_create(&draft(), today()).await.unwrap();
    let mutation = desk.set_seat_blocked(record.id, -4).await.unwrap();
    assert_eq!(mutation.applied, 0);
    assert!(mutation.was_clamped());
    assert_eq!(
        mutation.correction,
        Some(SeatCorrection::NegativeRequest { requested: -4 })
    );
    assert_eq!(gateway.stored(record.id).await.unwrap().body.seat_blocked, 0);
}

#[tokio::test]
async fn test_reference_snapshot_loads_once_per_session() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    gateway
        .stage_reference(ReferenceSnapshot::new(
            vec![AirlineRef {
                id: 12,
                code: "EK".to_string(),
                name: "Emirates".to_string(),
            }],
            vec![AirportRef {
                code: "BOM".to_string(),
                name: "Mumbai".to_string(),
            }],
        ))
        .await;
    let mut desk = desk_with(&gateway);
    assert!(desk.reference().is_none());

    let airline_id = desk
        .load_reference()
        .await
        .unwrap()
        .airline_by_code("ek")
        .map(|a| a.id);
    assert_eq!(airline_id, Some(12));

    // The snapshot is session-scoped: a second load reuses the first fetch.
    desk.load_reference().await.unwrap();
    assert_eq!(gateway.reference_fetch_count().await, 1);
    assert_eq!(desk.reference().unwrap().airports().len(), 1);
}

#[tokio::test]
async fn test_toggle_status_follows_the_server_answer() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let record = desk.submit_create(&draft(), today()).await.unwrap();
    assert!(!desk.toggle_status(record.id).await.unwrap());
    assert!(!desk.find(record.id).unwrap().body.is_active);
    assert!(desk.toggle_status(record.id).await.unwrap());
    assert!(desk.find(record.id).unwrap().body.is_active);
}

#[tokio::test]
async fn test_update_keeps_server_owned_seat_counts() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let record = desk.submit_create(&draft(), today()).await.unwrap();
    gateway.set_seat_booked(record.id, 12).await;
    desk.refresh().await.unwrap();

    let mut builder = SeriesBuilder::from_record(desk.find(record.id).unwrap());
    builder.set_price_per_seat(5500);
    assert!(builder.revalidate_fare_rules(today()).is_empty());

    let updated = desk
        .submit_update(record.id, &builder, Some("CONFIRMED".to_string()), today())
        .await
        .unwrap();
    assert_eq!(updated.body.sell_price, 5500);
    assert_eq!(updated.body.seat_booked, 12);
    assert_eq!(desk.find(record.id).unwrap().body.sell_price, 5500);
}

#[tokio::test]
async fn test_cancellation_quote_from_a_listed_series() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let mut builder = draft();
    builder.set_refundable(true);
    builder
        .add_fare_rule(
            FareRule {
                days_before_departure: 30,
                refundable_amount: 2000,
            },
            today(),
        )
        .unwrap();
    builder
        .add_fare_rule(
            FareRule {
                days_before_departure: 7,
                refundable_amount: 500,
            },
            today(),
        )
        .unwrap();
    let record = desk.submit_create(&builder, today()).await.unwrap();

    // Ten days before the 2026-04-15 departure only the 7-day tier applies.
    let quote = desk.cancellation_quote(record.id, d(2026, 4, 5)).unwrap();
    assert!(quote.eligible);
    assert_eq!(quote.refundable_amount, 500);

    // Three days out no tier applies and the cancellation refunds nothing.
    let quote = desk.cancellation_quote(record.id, d(2026, 4, 12)).unwrap();
    assert!(!quote.eligible);
    assert_eq!(quote.refundable_amount, 0);
}

#[tokio::test]
async fn test_hold_policy_travels_on_the_wire() {
    let gateway = Arc::new(InMemorySeriesGateway::new());
    let mut desk = desk_with(&gateway);

    let mut builder = draft();
    builder
        .set_hold_policy(HoldBookingPolicy {
            unit: HoldUnit::Flat,
            amount: 1500,
            cutoff_days: 5,
            limit_hours: 72,
        })
        .unwrap();
    let record = desk.submit_create(&builder, today()).await.unwrap();

    let json = serde_json::to_value(&record.body).unwrap();
    assert_eq!(json["hold_type"], "F");
    assert_eq!(json["hold_value"], 1500);
    assert_eq!(json["hold_booking_days"], 5);
    assert_eq!(json["hold_booking_limit"], 72);
}

#[tokio::test]
async fn test_bulk_import_rows_hydrate_the_builder() {
    let gateway = Arc::new(InMemorySeriesGateway::new());

    let mut builder = draft();
    builder.schedule_mut().set_has_return(true).unwrap();
    let staged: Vec<LegDetail> = builder
        .schedule()
        .onward_legs()
        .iter()
        .map(|leg| LegDetail::from_leg(LegType::Onward, leg))
        .chain(
            builder
                .schedule()
                .return_legs()
                .iter()
                .map(|leg| LegDetail::from_leg(LegType::Return, leg)),
        )
        .collect();
    gateway.stage_import(staged.clone()).await;

    let rows = gateway.import_details(b"xlsx bytes").await.unwrap();
    assert_eq!(rows, staged);

    let mut fresh = SeriesBuilder::new();
    fresh.absorb_import_details(&rows);
    assert_eq!(fresh.schedule().onward_legs().len(), 1);
    assert_eq!(fresh.schedule().return_legs().len(), 1);
    assert!(fresh.schedule().has_return());
    assert_eq!(fresh.schedule().return_legs()[0].from_airport, "DXB");
}
