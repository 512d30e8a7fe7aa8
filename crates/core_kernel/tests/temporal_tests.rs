//! Tests for UTC normalization and time windows

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use core_kernel::temporal::{ensure_utc, naive_as_utc, parse_utc, TemporalError, TimeWindow, Timezone};

mod normalization {
    use super::*;

    #[test]
    fn test_ensure_utc_converts_offset() {
        let local = chrono::DateTime::parse_from_rfc3339("2024-06-30T23:30:00-05:00").unwrap();
        let utc = ensure_utc(local);
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 7, 1, 4, 30, 0).unwrap());
    }

    #[test]
    fn test_naive_as_utc_keeps_wall_clock() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(naive_as_utc(naive), Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_utc_z_suffix() {
        let dt = parse_utc("2024-02-29T00:00:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_utc_space_separator() {
        let dt = parse_utc("2024-02-29 08:15:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 2, 29, 8, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_utc_rejects_garbage() {
        assert!(matches!(parse_utc("next tuesday"), Err(TemporalError::Unparseable(_))));
    }
}

mod timezone {
    use super::*;

    #[test]
    fn test_local_to_utc() {
        let tz: Timezone = "America/New_York".parse().unwrap();
        let local = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(tz.to_utc(local).unwrap(), Utc.with_ymd_and_hms(2024, 1, 10, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_nonexistent_local_time_rejected() {
        let tz: Timezone = "America/New_York".parse().unwrap();
        // 02:30 is skipped when clocks spring forward on 2024-03-10
        let local = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert!(matches!(tz.to_utc(local), Err(TemporalError::NonexistentLocalTime { .. })));
    }

    #[test]
    fn test_ambiguous_local_time_rejected() {
        let tz: Timezone = "America/New_York".parse().unwrap();
        // 01:30 happens twice when clocks fall back on 2024-11-03
        let local = NaiveDate::from_ymd_opt(2024, 11, 3)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        assert!(matches!(tz.to_utc(local), Err(TemporalError::AmbiguousLocalTime { .. })));
    }

    #[test]
    fn test_unknown_timezone() {
        assert!(matches!(
            "Mars/Olympus_Mons".parse::<Timezone>(),
            Err(TemporalError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn test_start_of_day() {
        let tz: Timezone = "Europe/Berlin".parse().unwrap();
        let start = tz.start_of_day(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 30, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_serde_round_trip() {
        let tz: Timezone = "Asia/Tokyo".parse().unwrap();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"Asia/Tokyo\"");
        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tz);
    }
}

mod windows {
    use super::*;

    fn window() -> TimeWindow {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TimeWindow::new(start, start + Duration::days(7)).unwrap()
    }

    #[test]
    fn test_contains_start_excludes_end() {
        let w = window();
        assert!(w.contains(w.start));
        assert!(w.contains(w.end - Duration::seconds(1)));
        assert!(!w.contains(w.end));
        assert!(!w.contains(w.start - Duration::seconds(1)));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let w = window();
        assert!(matches!(
            TimeWindow::new(w.end, w.start),
            Err(TemporalError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_overlap_and_duration() {
        let w = window();
        let adjacent = TimeWindow::new(w.end, w.end + Duration::days(1)).unwrap();
        assert!(!w.overlaps(&adjacent));
        assert_eq!(w.duration(), Duration::days(7));
    }
}
