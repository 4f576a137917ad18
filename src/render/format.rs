// Human-readable formatting for badge values.

use chrono::{Datelike, NaiveDate};

/// Group digits in threes: `1234567` becomes `1,234,567`.
pub fn thousands(value: impl Into<i128>) -> String {
    let value = value.into();
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Calendar difference between two dates as (years, months, days).
pub fn calendar_diff(from: NaiveDate, to: NaiveDate) -> (u32, u32, u32) {
    if to <= from {
        return (0, 0, 0);
    }

    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    let anchor = add_months(from, months);
    let days = (to - anchor).num_days();

    ((months / 12) as u32, (months % 12) as u32, days as u32)
}

/// `date` shifted by whole months, clamped to the end of shorter months.
fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let (year, month) = (total.div_euclid(12), total.rem_euclid(12) as u32 + 1);
    (1..=date.day())
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .unwrap_or(date)
}

/// Account age text, e.g. `17 years, 1 month, 0 days`, with a cake on the birthday.
pub fn age_text(birthday: NaiveDate, today: NaiveDate) -> String {
    let (years, months, days) = calendar_diff(birthday, today);
    let cake = if months == 0 && days == 0 { " 🎂" } else { "" };
    format!(
        "{} year{}, {} month{}, {} day{}{}",
        years,
        plural(years),
        months,
        plural(months),
        days,
        plural(days),
        cake
    )
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}
