use chrono::{DateTime, Utc};

/// Human "last updated" text. Elapsed time is taken as an absolute value and
/// truncated to whole days.
pub fn relative_date(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = now.signed_duration_since(then).num_days().abs();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => format!("{} weeks ago", days / 7),
        30..=364 => format!("{} months ago", days / 30),
        _ => then.format("%b %-d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn ago(hours: i64) -> DateTime<Utc> {
        now() - Duration::hours(hours)
    }

    #[test]
    fn same_day_and_previous_day() {
        assert_eq!(relative_date(ago(0), now()), "Today");
        assert_eq!(relative_date(ago(23), now()), "Today");
        assert_eq!(relative_date(ago(24), now()), "Yesterday");
        assert_eq!(relative_date(ago(47), now()), "Yesterday");
    }

    #[test]
    fn days_weeks_and_months() {
        assert_eq!(relative_date(ago(2 * 24), now()), "2 days ago");
        assert_eq!(relative_date(ago(6 * 24), now()), "6 days ago");
        assert_eq!(relative_date(ago(7 * 24), now()), "1 weeks ago");
        assert_eq!(relative_date(ago(29 * 24), now()), "4 weeks ago");
        assert_eq!(relative_date(ago(30 * 24), now()), "1 months ago");
        assert_eq!(relative_date(ago(364 * 24), now()), "12 months ago");
    }

    #[test]
    fn a_year_or_more_prints_the_calendar_date() {
        let then = Utc.with_ymd_and_hms(2023, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(relative_date(then, now()), "Jan 5, 2023");
    }

    #[test]
    fn future_dates_count_like_past_ones() {
        let then = now() + Duration::days(3);
        assert_eq!(relative_date(then, now()), "3 days ago");
    }
}
