use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    #[error("Invalid time format, expected HH:MM: {0:?}")]
    Malformed(String),

    #[error("Time out of range: {hour:02}:{minute:02}")]
    OutOfRange { hour: u8, minute: u8 },
}

/// A validated 24-hour wall-clock time, serialized as "HH:MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayTime {
    hour: u8,
    minute: u8,
}

impl DayTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeError> {
        if hour > 23 || minute > 59 {
            return Err(TimeError::OutOfRange { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// Parses exactly "HH:MM": two digits, a colon, two digits, 00:00 through 23:59.
    pub fn parse(value: &str) -> Result<Self, TimeError> {
        let malformed = || TimeError::Malformed(value.to_string());
        let (h, m) = value.split_once(':').ok_or_else(malformed)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(malformed());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let hour = h.parse::<u8>().map_err(|_| malformed())?;
        let minute = m.parse::<u8>().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight, the ordering key for same-day comparisons.
    pub fn minute_of_day(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    pub fn day_part(&self) -> DayPart {
        DayPart::of(*self)
    }

    /// Anchors this wall-clock time on a calendar date.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .expect("hour and minute are range-checked at construction");
        date.and_time(time)
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for DayTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DayTime {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DayTime> for String {
    fn from(value: DayTime) -> Self {
        value.to_string()
    }
}

/// Display bucket for a wall-clock time. Night wraps midnight: 21:00-23:59 and 00:00-04:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPart {
    /// Bucket order as shown in time pickers.
    pub const DISPLAY_ORDER: [DayPart; 4] = [
        DayPart::Morning,
        DayPart::Afternoon,
        DayPart::Evening,
        DayPart::Night,
    ];

    pub fn of(time: DayTime) -> DayPart {
        match time.minute_of_day() {
            m if m < 5 * 60 => DayPart::Night,
            m if m < 12 * 60 => DayPart::Morning,
            m if m < 17 * 60 => DayPart::Afternoon,
            m if m < 21 * 60 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayPart::Morning => "Morning",
            DayPart::Afternoon => "Afternoon",
            DayPart::Evening => "Evening",
            DayPart::Night => "Night",
        }
    }
}

impl fmt::Display for DayPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Groups times into day-part buckets in display order. Empty buckets are
/// omitted and the input order is preserved within each bucket.
pub fn bucket_by_day_part(times: &[DayTime]) -> Vec<(DayPart, Vec<DayTime>)> {
    DayPart::DISPLAY_ORDER
        .iter()
        .filter_map(|part| {
            let bucket: Vec<DayTime> = times
                .iter()
                .copied()
                .filter(|t| t.day_part() == *part)
                .collect();
            if bucket.is_empty() {
                None
            } else {
                Some((*part, bucket))
            }
        })
        .collect()
}

/// Arrival times selectable once a departure time is fixed: same-day times
/// at or after the departure.
pub fn arrivals_on_or_after(candidates: &[DayTime], departure: DayTime) -> Vec<DayTime> {
    candidates
        .iter()
        .copied()
        .filter(|t| *t >= departure)
        .collect()
}

/// Infers the arrival date from the departure date: an arrival wall-clock
/// earlier than the departure means the flight lands the next day.
pub fn infer_arrival_date(
    departure_date: Option<NaiveDate>,
    departure: DayTime,
    arrival: DayTime,
) -> Option<NaiveDate> {
    let date = departure_date?;
    if arrival.minute_of_day() < departure.minute_of_day() {
        Some(date + Duration::days(1))
    } else {
        Some(date)
    }
}

/// Gap between an arrival and the next departure. Unknown endpoints or a
/// negative gap yield None, shown as an omitted duration.
pub fn connection_time(
    arrival: Option<NaiveDateTime>,
    next_departure: Option<NaiveDateTime>,
) -> Option<Duration> {
    let gap = next_departure? - arrival?;
    if gap < Duration::zero() {
        None
    } else {
        Some(gap)
    }
}

/// Whole days from today until the target date. Negative when the date is past.
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    (target - today).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(value: &str) -> DayTime {
        DayTime::parse(value).unwrap()
    }

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_parse_valid_time() {
        let time = t("07:30");
        assert_eq!(time.hour(), 7);
        assert_eq!(time.minute(), 30);
        assert_eq!(time.to_string(), "07:30");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for bad in [
            "24:00", "7:30", "07:3", "0730", "07:60", "", "a7:30", "07-30", " 7:30", "123:45",
            "07:30:00",
        ] {
            assert!(DayTime::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_new_checks_range() {
        assert!(DayTime::new(23, 59).is_ok());
        assert_eq!(
            DayTime::new(24, 0),
            Err(TimeError::OutOfRange { hour: 24, minute: 0 })
        );
    }

    #[test]
    fn test_minute_of_day() {
        assert_eq!(t("00:00").minute_of_day(), 0);
        assert_eq!(t("07:30").minute_of_day(), 450);
        assert_eq!(t("23:59").minute_of_day(), 1439);
    }

    #[test]
    fn test_day_part_boundaries() {
        let cases = [
            ("00:00", DayPart::Night),
            ("04:59", DayPart::Night),
            ("05:00", DayPart::Morning),
            ("11:59", DayPart::Morning),
            ("12:00", DayPart::Afternoon),
            ("16:59", DayPart::Afternoon),
            ("17:00", DayPart::Evening),
            ("20:59", DayPart::Evening),
            ("21:00", DayPart::Night),
            ("23:59", DayPart::Night),
        ];
        for (value, expected) in cases {
            assert_eq!(t(value).day_part(), expected, "{}", value);
        }
    }

    #[test]
    fn test_bucketing_follows_display_order() {
        let times = [t("22:00"), t("06:15"), t("13:40"), t("06:45")];
        let buckets = bucket_by_day_part(&times);
        assert_eq!(
            buckets,
            vec![
                (DayPart::Morning, vec![t("06:15"), t("06:45")]),
                (DayPart::Afternoon, vec![t("13:40")]),
                (DayPart::Night, vec![t("22:00")]),
            ]
        );
    }

    #[test]
    fn test_arrival_candidates_keep_departure_time_itself() {
        let candidates = [t("06:00"), t("08:00"), t("10:30"), t("23:45")];
        let selectable = arrivals_on_or_after(&candidates, t("08:00"));
        assert_eq!(selectable, vec![t("08:00"), t("10:30"), t("23:45")]);
    }

    #[test]
    fn test_overnight_arrival_rolls_to_next_day() {
        let inferred = infer_arrival_date(Some(d(2026, 3, 10)), t("23:30"), t("01:15"));
        assert_eq!(inferred, Some(d(2026, 3, 11)));
    }

    #[test]
    fn test_same_day_arrival_keeps_departure_date() {
        let inferred = infer_arrival_date(Some(d(2026, 3, 10)), t("08:00"), t("10:30"));
        assert_eq!(inferred, Some(d(2026, 3, 10)));
    }

    #[test]
    fn test_arrival_date_unknown_without_departure_date() {
        assert_eq!(infer_arrival_date(None, t("23:30"), t("01:15")), None);
    }

    #[test]
    fn test_connection_time_between_legs() {
        let arrival = Some(t("14:05").on(d(2026, 3, 10)));
        let departure = Some(t("16:40").on(d(2026, 3, 10)));
        assert_eq!(
            connection_time(arrival, departure),
            Some(Duration::minutes(155))
        );
    }

    #[test]
    fn test_connection_time_unknown_when_negative_or_missing() {
        let arrival = Some(t("16:40").on(d(2026, 3, 10)));
        let departure = Some(t("14:05").on(d(2026, 3, 10)));
        assert_eq!(connection_time(arrival, departure), None);
        assert_eq!(connection_time(None, departure), None);
        assert_eq!(connection_time(arrival, None), None);
    }

    #[test]
    fn test_days_until_target_date() {
        assert_eq!(days_until(d(2026, 3, 20), d(2026, 3, 10)), 10);
        assert_eq!(days_until(d(2026, 3, 10), d(2026, 3, 10)), 0);
        assert_eq!(days_until(d(2026, 3, 8), d(2026, 3, 10)), -2);
    }

    #[test]
    fn test_serde_round_trips_as_string() {
        let time = t("07:30");
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, "\"07:30\"");
        let back: DayTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, time);
        assert!(serde_json::from_str::<DayTime>("\"25:00\"").is_err());
    }
}
