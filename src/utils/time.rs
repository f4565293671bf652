use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Short age of a record relative to `now`, e.g. "today", "3 days ago", "2 years ago".
pub fn from_today(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - created_at).num_days().max(0);
    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        2..=29 => format!("{} days ago", days),
        30..=364 => plural(days / 30, "month"),
        _ => plural(days / 365, "year"),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn describes_age_in_coarse_units() {
        let now = Utc::now();
        assert_eq!(from_today(now, now), "today");
        assert_eq!(from_today(now - Duration::hours(30), now), "yesterday");
        assert_eq!(from_today(now - Duration::days(5), now), "5 days ago");
        assert_eq!(from_today(now - Duration::days(31), now), "1 month ago");
        assert_eq!(from_today(now - Duration::days(95), now), "3 months ago");
        assert_eq!(from_today(now - Duration::days(800), now), "2 years ago");
    }

    #[test]
    fn future_timestamps_read_as_today() {
        let now = Utc::now();
        assert_eq!(from_today(now + Duration::days(2), now), "today");
    }
}
