//! Schedule validation: cron syntax and time-zone resolution.
//!
//! Only syntactic acceptance is in scope; computing occurrences for actual
//! triggering belongs to the host scheduler. The parsed schedule is still
//! kept around so listings can display the next occurrence.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::AdminError;

/// A syntactically valid cron expression in 5- or 6-field form.
#[derive(Debug, Clone)]
pub struct ParsedSchedule {
    source: String,
    normalized: String,
    schedule: cron::Schedule,
}

impl ParsedSchedule {
    /// The expression as the caller wrote it (trimmed).
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The seconds-prefixed 6-field form handed to the cron parser.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    #[must_use]
    pub fn next_occurrence(&self, time_zone: Tz) -> Option<DateTime<Utc>> {
        self.schedule
            .upcoming(time_zone)
            .next()
            .map(|occurrence| occurrence.with_timezone(&Utc))
    }
}

/// Validate a cron expression.
///
/// Input is split on whitespace. Exactly 5 fields (minute, hour,
/// day-of-month, month, day-of-week) or 6 fields (seconds-prefixed) are
/// accepted; 5-field form is normalized by prefixing a zero seconds field.
/// Numeric days of week use the standard 0-7 numbering (0 and 7 both
/// Sunday) and are renumbered to the parser's 1-7 (1 = Sunday) before
/// parsing. Field grammar (`*`, integers, ranges, steps, lists, value
/// bounds) is enforced by the cron parser on the normalized form.
pub fn validate_cron(text: &str) -> Result<ParsedSchedule, AdminError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let mut normalized: Vec<String> = match fields.len() {
        5 => std::iter::once("0")
            .chain(fields.iter().copied())
            .map(str::to_string)
            .collect(),
        6 => fields.iter().map(|f| (*f).to_string()).collect(),
        n => {
            return Err(AdminError::InvalidCronFormat(format!(
                "expected 5 or 6 fields, got {n}"
            )))
        }
    };
    normalized[5] = normalize_day_of_week(&normalized[5]);
    let normalized = normalized.join(" ");

    let schedule = cron::Schedule::from_str(&normalized)
        .map_err(|e| AdminError::InvalidCronFormat(e.to_string()))?;

    Ok(ParsedSchedule {
        source: fields.join(" "),
        normalized,
        schedule,
    })
}

/// Rewrite numeric day-of-week tokens from the standard 0-7 numbering to
/// the parser's 1-7 numbering, item by item across a list. Named days,
/// wildcards and anything unrecognized pass through for the parser to
/// judge.
fn normalize_day_of_week(field: &str) -> String {
    field
        .split(',')
        .map(translate_dow_item)
        .collect::<Vec<String>>()
        .join(",")
}

fn translate_dow_item(item: &str) -> String {
    let (body, step) = match item.split_once('/') {
        Some((body, step)) => (body, Some(step)),
        None => (item, None),
    };
    let step_by = match step {
        Some(s) => match s.parse::<usize>() {
            Ok(s) if s > 0 => s,
            _ => return item.to_string(),
        },
        None => 1,
    };

    let bounds = match body.split_once('-') {
        Some((start, end)) => parse_standard_dow(start).zip(parse_standard_dow(end)),
        // a bare start with a step runs to the end of the week
        None => parse_standard_dow(body).map(|n| (n, if step.is_some() { n.max(6) } else { n })),
    };
    let Some((start, end)) = bounds else {
        return item.to_string();
    };
    if start > end {
        return item.to_string();
    }

    // Expansion keeps ranges crossing Sunday correct: standard 5-7 is
    // Friday through Sunday, which is 6, 7 and 1 in the parser's numbering.
    let mut days: Vec<u8> = (start..=end).step_by(step_by).map(|n| n % 7 + 1).collect();
    days.sort_unstable();
    days.dedup();
    days.iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(",")
}

fn parse_standard_dow(text: &str) -> Option<u8> {
    text.parse::<u8>().ok().filter(|n| *n <= 7)
}

/// Resolve a time-zone id against the tz database. Blank ids default to UTC.
pub fn resolve_time_zone(id: &str) -> Result<Tz, AdminError> {
    let id = id.trim();
    if id.is_empty() {
        return Ok(Tz::UTC);
    }
    Tz::from_str(id).map_err(|_| AdminError::UnknownTimeZone(id.to_string()))
}

/// Next occurrence of a stored cron expression, for the listing read model.
#[must_use]
pub fn next_execution(cron_text: &str, time_zone_id: &str) -> Option<DateTime<Utc>> {
    let schedule = validate_cron(cron_text).ok()?;
    let time_zone = resolve_time_zone(time_zone_id).ok()?;
    schedule.next_occurrence(time_zone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_field_form_is_seconds_prefixed() {
        let parsed = validate_cron("*/5 * * * *").unwrap();
        assert_eq!(parsed.source(), "*/5 * * * *");
        assert_eq!(parsed.normalized(), "0 */5 * * * *");
    }

    #[test]
    fn test_six_field_form_is_kept() {
        let parsed = validate_cron("30 */5 * * * *").unwrap();
        assert_eq!(parsed.normalized(), "30 */5 * * * *");
    }

    #[test]
    fn test_other_field_counts_are_rejected() {
        for text in ["", "*", "* *", "* * *", "* * * *", "* * * * * * *"] {
            assert!(
                matches!(validate_cron(text), Err(AdminError::InvalidCronFormat(_))),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn test_field_grammar_is_enforced() {
        // out-of-range minute, malformed range, malformed step
        for text in ["90 * * * *", "5-2-7 * * * *", "*/x * * * *"] {
            assert!(
                matches!(validate_cron(text), Err(AdminError::InvalidCronFormat(_))),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn test_standard_sunday_zero_is_accepted() {
        let parsed = validate_cron("0 0 * * 0").unwrap();
        assert_eq!(parsed.source(), "0 0 * * 0");
        assert_eq!(parsed.normalized(), "0 0 0 * * 1");

        // 7 is the other standard spelling of Sunday
        let parsed = validate_cron("0 0 * * 7").unwrap();
        assert_eq!(parsed.normalized(), "0 0 0 * * 1");
    }

    #[test]
    fn test_day_of_week_numbering_is_translated() {
        // full standard week
        let parsed = validate_cron("0 12 * * 0-6").unwrap();
        assert_eq!(parsed.normalized(), "0 0 12 * * 1,2,3,4,5,6,7");

        // standard 5 is Friday, the parser's 6
        let parsed = validate_cron("0 0 * * 5").unwrap();
        assert_eq!(parsed.normalized(), "0 0 0 * * 6");

        // a range crossing Sunday expands instead of wrapping
        let parsed = validate_cron("0 0 * * 5-7").unwrap();
        assert_eq!(parsed.normalized(), "0 0 0 * * 1,6,7");

        // lists and steps translate item by item
        let parsed = validate_cron("0 0 * * 0,2-4").unwrap();
        assert_eq!(parsed.normalized(), "0 0 0 * * 1,3,4,5");
        let parsed = validate_cron("0 0 * * 1-6/2").unwrap();
        assert_eq!(parsed.normalized(), "0 0 0 * * 2,4,6");
    }

    #[test]
    fn test_named_days_and_wildcards_pass_through() {
        let parsed = validate_cron("0 9 * * MON-FRI").unwrap();
        assert_eq!(parsed.normalized(), "0 0 9 * * MON-FRI");
        let parsed = validate_cron("0 0 * * *").unwrap();
        assert_eq!(parsed.normalized(), "0 0 0 * * *");
        // out-of-range numbers are left for the parser to reject
        assert!(matches!(
            validate_cron("0 0 * * 8"),
            Err(AdminError::InvalidCronFormat(_))
        ));
    }

    #[test]
    fn test_lists_ranges_and_steps_are_accepted() {
        for text in [
            "0 0 * * *",
            "1,15,30 * * * *",
            "0-30/5 * * * *",
            "0 12 1-15 * 1-5",
        ] {
            assert!(validate_cron(text).is_ok(), "rejected {text:?}");
        }
    }

    #[test]
    fn test_time_zone_resolution() {
        assert_eq!(resolve_time_zone("").unwrap(), Tz::UTC);
        assert_eq!(resolve_time_zone("UTC").unwrap(), Tz::UTC);
        assert_eq!(
            resolve_time_zone("Europe/Warsaw").unwrap(),
            Tz::Europe__Warsaw
        );
        assert!(matches!(
            resolve_time_zone("Mars/Olympus"),
            Err(AdminError::UnknownTimeZone(_))
        ));
    }

    #[test]
    fn test_next_execution_is_computable() {
        assert!(next_execution("*/5 * * * *", "UTC").is_some());
        assert!(next_execution("bogus", "UTC").is_none());
    }
}
