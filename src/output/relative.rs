use chrono::{DateTime, Datelike, Timelike, Utc};

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43200;
const MINUTES_IN_TWO_MONTHS: i64 = 86400;

fn plural(count: i64, one: &str, many: &str) -> String {
    if count == 1 {
        one.to_string()
    } else {
        many.replace("{}", &count.to_string())
    }
}

// calendar months between two instants, `later >= earlier`
fn whole_months(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month())
        - i64::from(earlier.month());
    let later_rest = (later.day(), later.num_seconds_from_midnight());
    let earlier_rest = (earlier.day(), earlier.num_seconds_from_midnight());
    if months > 0 && later_rest < earlier_rest {
        months -= 1;
    }
    months
}

fn distance_words(earlier: DateTime<Utc>, later: DateTime<Utc>) -> String {
    let seconds = (later - earlier).num_seconds();
    let minutes = (seconds as f64 / 60.0).round() as i64;

    if minutes < 2 {
        if minutes == 0 {
            return "less than a minute".to_string();
        }
        return plural(minutes, "1 minute", "{} minutes");
    }
    if minutes < 45 {
        return plural(minutes, "1 minute", "{} minutes");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes as f64 / 60.0).round() as i64;
        return plural(hours, "about 1 hour", "about {} hours");
    }
    if minutes < 2520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes as f64 / MINUTES_IN_DAY as f64).round() as i64;
        return plural(days, "1 day", "{} days");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        let months = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return plural(months, "about 1 month", "about {} months");
    }

    let months = whole_months(earlier, later);
    if months < 12 {
        let nearest = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return plural(nearest, "1 month", "{} months");
    }

    let since_start_of_year = months % 12;
    let years = months / 12;
    if since_start_of_year < 3 {
        plural(years, "about 1 year", "about {} years")
    } else if since_start_of_year < 9 {
        plural(years, "over 1 year", "over {} years")
    } else {
        plural(years + 1, "almost 1 year", "almost {} years")
    }
}

/// Human distance between `date` and `now`, e.g. "3 days ago" or "in about 1 hour".
pub fn time_since(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if date > now {
        format!("in {}", distance_words(now, date))
    } else {
        format!("{} ago", distance_words(date, now))
    }
}
