//! Weekly meeting calendar for the school year.

use crate::config::{ScheduleSpec, VacationInterval};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const MEETING_DATE_FORMAT: &str = "%d/%m/%Y";

const WEEKDAY_NAMES: [(&str, Weekday); 7] = [
    ("lunedì", Weekday::Mon),
    ("martedì", Weekday::Tue),
    ("mercoledì", Weekday::Wed),
    ("giovedì", Weekday::Thu),
    ("venerdì", Weekday::Fri),
    ("sabato", Weekday::Sat),
    ("domenica", Weekday::Sun),
];

/// Month labels keyed by calendar month, listed in school-year order.
const ACADEMIC_MONTHS: [(u32, &str); 12] = [
    (10, "Ottobre"),
    (11, "Novembre"),
    (12, "Dicembre"),
    (1, "Gennaio"),
    (2, "Febbraio"),
    (3, "Marzo"),
    (4, "Aprile"),
    (5, "Maggio"),
    (6, "Giugno"),
    (7, "Luglio"),
    (8, "Agosto"),
    (9, "Settembre"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("unknown weekday name: {0:?}")]
    UnknownWeekday(String),
    #[error("calendar month out of range: {0}")]
    MonthOutOfRange(u32),
}

/// Aggregated meeting calendar, serialized with the keys templates use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary {
    #[serde(rename = "totale_incontri")]
    pub total_meetings: u32,
    #[serde(rename = "media_per_mese")]
    pub average_per_month: f64,
    #[serde(rename = "dettaglio_per_mese")]
    pub per_month: IndexMap<String, u32>,
    #[serde(rename = "primo_incontro")]
    pub first_meeting: Option<String>,
    #[serde(rename = "ultimo_incontro")]
    pub last_meeting: Option<String>,
}

/// Resolve an Italian weekday name, ignoring case.
pub fn weekday_from_name(name: &str) -> Result<Weekday, ScheduleError> {
    let lowered = name.to_lowercase();
    WEEKDAY_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == lowered)
        .map(|(_, weekday)| *weekday)
        .ok_or_else(|| ScheduleError::UnknownWeekday(name.to_string()))
}

/// Monday = 0 through Sunday = 6.
pub fn weekday_ordinal(name: &str) -> Result<u32, ScheduleError> {
    weekday_from_name(name).map(|weekday| weekday.num_days_from_monday())
}

pub fn month_label(calendar_month: u32) -> Result<&'static str, ScheduleError> {
    ACADEMIC_MONTHS
        .iter()
        .find(|(month, _)| *month == calendar_month)
        .map(|(_, label)| *label)
        .ok_or(ScheduleError::MonthOutOfRange(calendar_month))
}

/// All meeting dates between `inizio` and `fine` (inclusive) on the configured
/// weekday, minus those falling inside a vacation.
///
/// Skipped dates do not reset the weekly stride.
pub fn meeting_dates(
    spec: &ScheduleSpec,
    vacations: &[VacationInterval],
) -> Result<Vec<NaiveDate>, ScheduleError> {
    let target = weekday_from_name(&spec.giorno_settimana)?;

    let mut cursor = spec.inizio;
    while cursor.weekday() != target {
        cursor += Duration::days(1);
    }

    let mut dates = Vec::new();
    while cursor <= spec.fine {
        if vacations.iter().any(|vacation| vacation.contains(cursor)) {
            debug!(date = %cursor, "Skipping meeting during vacation");
        } else {
            dates.push(cursor);
        }
        cursor += Duration::weeks(1);
    }

    Ok(dates)
}

/// Aggregate meeting dates into totals and a per-month breakdown.
pub fn summarize(dates: &[NaiveDate]) -> Result<ScheduleSummary, ScheduleError> {
    let mut per_month: IndexMap<String, u32> = IndexMap::new();
    for date in dates {
        let label = month_label(date.month())?;
        *per_month.entry(label.to_string()).or_insert(0) += 1;
    }

    let total_meetings = dates.len() as u32;
    let average_per_month = if per_month.is_empty() {
        0.0
    } else {
        round_one_decimal(f64::from(total_meetings) / per_month.len() as f64)
    };

    Ok(ScheduleSummary {
        total_meetings,
        average_per_month,
        per_month,
        first_meeting: dates
            .first()
            .map(|date| date.format(MEETING_DATE_FORMAT).to_string()),
        last_meeting: dates
            .last()
            .map(|date| date.format(MEETING_DATE_FORMAT).to_string()),
    })
}

pub fn calculate_schedule(
    spec: &ScheduleSpec,
    vacations: &[VacationInterval],
) -> Result<ScheduleSummary, ScheduleError> {
    let dates = meeting_dates(spec, vacations)?;
    summarize(&dates)
}

// Ties go to the even digit: 2.25 -> 2.2.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spec(inizio: NaiveDate, fine: NaiveDate, giorno: &str) -> ScheduleSpec {
        ScheduleSpec {
            inizio,
            fine,
            giorno_settimana: giorno.to_string(),
        }
    }

    #[test]
    fn test_weekday_ordinals() {
        let expected = [
            ("lunedì", 0),
            ("martedì", 1),
            ("mercoledì", 2),
            ("giovedì", 3),
            ("venerdì", 4),
            ("sabato", 5),
            ("domenica", 6),
        ];
        for (name, ordinal) in expected {
            assert_eq!(weekday_ordinal(name).unwrap(), ordinal, "{name}");
            assert_eq!(
                weekday_ordinal(&name.to_uppercase()).unwrap(),
                ordinal,
                "{name} upper-case"
            );
        }
    }

    #[test]
    fn test_unknown_weekday() {
        assert_eq!(
            weekday_from_name("wednesday"),
            Err(ScheduleError::UnknownWeekday("wednesday".to_string()))
        );
    }

    #[test]
    fn test_month_labels_wrap_around_school_year() {
        assert_eq!(month_label(10).unwrap(), "Ottobre");
        assert_eq!(month_label(12).unwrap(), "Dicembre");
        assert_eq!(month_label(1).unwrap(), "Gennaio");
        assert_eq!(month_label(5).unwrap(), "Maggio");
        assert_eq!(month_label(9).unwrap(), "Settembre");
        assert_eq!(month_label(13), Err(ScheduleError::MonthOutOfRange(13)));
    }

    #[test]
    fn test_four_wednesdays_in_october() {
        let summary =
            calculate_schedule(&spec(date(2024, 10, 2), date(2024, 10, 23), "mercoledì"), &[])
                .unwrap();

        assert_eq!(summary.total_meetings, 4);
        assert_eq!(summary.average_per_month, 4.0);
        assert_eq!(summary.per_month.get("Ottobre"), Some(&4));
        assert_eq!(summary.first_meeting.as_deref(), Some("02/10/2024"));
        assert_eq!(summary.last_meeting.as_deref(), Some("23/10/2024"));
    }

    #[test]
    fn test_vacation_excludes_inclusive_range() {
        let vacations = [VacationInterval {
            inizio: date(2024, 10, 8),
            fine: date(2024, 10, 10),
        }];
        let dates = meeting_dates(
            &spec(date(2024, 10, 2), date(2024, 10, 23), "mercoledì"),
            &vacations,
        )
        .unwrap();
        assert_eq!(
            dates,
            vec![date(2024, 10, 2), date(2024, 10, 16), date(2024, 10, 23)]
        );

        let summary = summarize(&dates).unwrap();
        assert_eq!(summary.total_meetings, 3);
        assert_eq!(summary.average_per_month, 3.0);
    }

    #[test]
    fn test_vacation_boundaries_touching_meetings() {
        let vacations = [VacationInterval {
            inizio: date(2024, 10, 9),
            fine: date(2024, 10, 16),
        }];
        let dates = meeting_dates(
            &spec(date(2024, 10, 2), date(2024, 10, 23), "mercoledì"),
            &vacations,
        )
        .unwrap();
        assert_eq!(dates, vec![date(2024, 10, 2), date(2024, 10, 23)]);
    }

    #[test]
    fn test_first_meeting_advances_to_weekday() {
        // 2024-10-01 is a Tuesday.
        let dates = meeting_dates(&spec(date(2024, 10, 1), date(2024, 10, 20), "venerdì"), &[])
            .unwrap();
        assert_eq!(dates, vec![date(2024, 10, 4), date(2024, 10, 11), date(2024, 10, 18)]);
    }

    #[test]
    fn test_count_matches_weekly_multiples() {
        let start = date(2024, 9, 30);
        let end = date(2025, 6, 15);
        let dates = meeting_dates(&spec(start, end, "Giovedì"), &[]).unwrap();

        let first = date(2024, 10, 3);
        let expected = (end - first).num_days() / 7 + 1;
        assert_eq!(dates.len() as i64, expected);
        assert!(dates.windows(2).all(|pair| pair[1] - pair[0] == Duration::weeks(1)));
    }

    #[test]
    fn test_breakdown_keeps_first_seen_order() {
        let vacations = [VacationInterval {
            inizio: date(2024, 12, 23),
            fine: date(2025, 1, 6),
        }];
        let schedule = spec(date(2024, 10, 1), date(2025, 2, 28), "mercoledì");

        let first = calculate_schedule(&schedule, &vacations).unwrap();
        let second = calculate_schedule(&schedule, &vacations).unwrap();
        assert_eq!(first, second);

        let months: Vec<&str> = first.per_month.keys().map(String::as_str).collect();
        assert_eq!(
            months,
            vec!["Ottobre", "Novembre", "Dicembre", "Gennaio", "Febbraio"]
        );
        // Dec 25 and Jan 1 fall inside the vacation.
        assert_eq!(first.per_month["Dicembre"], 3);
        assert_eq!(first.per_month["Gennaio"], 4);
        assert_eq!(first.total_meetings, first.per_month.values().sum::<u32>());
    }

    #[test]
    fn test_everything_on_vacation_gives_empty_summary() {
        let vacations = [VacationInterval {
            inizio: date(2024, 10, 1),
            fine: date(2024, 10, 31),
        }];
        let summary = calculate_schedule(
            &spec(date(2024, 10, 2), date(2024, 10, 23), "mercoledì"),
            &vacations,
        )
        .unwrap();

        assert_eq!(summary.total_meetings, 0);
        assert_eq!(summary.average_per_month, 0.0);
        assert!(summary.per_month.is_empty());
        assert_eq!(summary.first_meeting, None);
        assert_eq!(summary.last_meeting, None);
    }

    #[test]
    fn test_end_before_start_is_empty() {
        let dates = meeting_dates(&spec(date(2024, 10, 9), date(2024, 10, 2), "mercoledì"), &[])
            .unwrap();
        assert!(dates.is_empty());
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        assert_eq!(round_one_decimal(9.0 / 4.0), 2.2);
        assert_eq!(round_one_decimal(10.0 / 3.0), 3.3);
        assert_eq!(round_one_decimal(17.0 / 4.0), 4.2);
        assert_eq!(round_one_decimal(4.0), 4.0);
    }

    #[test]
    fn test_summary_serializes_with_template_keys() {
        let summary = summarize(&[date(2024, 10, 2)]).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totale_incontri"], 1);
        assert_eq!(json["dettaglio_per_mese"]["Ottobre"], 1);
        assert_eq!(json["primo_incontro"], "02/10/2024");
    }
}
