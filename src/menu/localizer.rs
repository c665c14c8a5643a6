//! Calendar localization
//!
//! Dates are stored as Gregorian days; users read them in the Persian
//! (Jalali) calendar.

use chrono::{Datelike, NaiveDate};

/// Calendar-aware date labels
pub trait Localizer: Send + Sync {
    /// Weekday name, e.g. "شنبه"
    fn format_weekday(&self, date: NaiveDate) -> String;

    /// Weekday name followed by the day of month, e.g. "شنبه 3ام"
    fn format_day_weekday(&self, date: NaiveDate) -> String;
}

/// Persian weekdays, starting from Saturday
const WEEKDAYS: [&str; 7] = [
    "شنبه",
    "یک‌شنبه",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنج‌شنبه",
    "جمعه",
];

/// Jalali calendar labels in Persian
#[derive(Debug, Clone, Copy, Default)]
pub struct PersianCalendar;

impl Localizer for PersianCalendar {
    fn format_weekday(&self, date: NaiveDate) -> String {
        persian_weekday(date).to_string()
    }

    fn format_day_weekday(&self, date: NaiveDate) -> String {
        let (_, _, day) = to_jalali(date);
        format!("{} {day}ام", persian_weekday(date))
    }
}

fn persian_weekday(date: NaiveDate) -> &'static str {
    // Saturday is day 0 of the Persian week
    let index = (date.weekday().num_days_from_sunday() + 1) % 7;
    WEEKDAYS[index as usize]
}

/// Convert a Gregorian date to a Jalali `(year, month, day)`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_jalali(date: NaiveDate) -> (i32, u32, u32) {
    const MONTH_OFFSETS: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

    let gy = i64::from(date.year());
    let gm = date.month();
    let gd = i64::from(date.day());

    let gy2 = if gm > 2 { gy + 1 } else { gy };
    let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
        + gd
        + MONTH_OFFSETS[(gm - 1) as usize];

    let mut jy = -1595 + 33 * (days / 12_053);
    days %= 12_053;
    jy += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        jy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let (jm, jd) = if days < 186 {
        (1 + days / 31, 1 + days % 31)
    } else {
        (7 + (days - 186) / 30, 1 + (days - 186) % 30)
    };

    (jy as i32, jm as u32, jd as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nowruz() {
        assert_eq!(to_jalali(date(2024, 3, 20)), (1403, 1, 1));
        assert_eq!(to_jalali(date(2023, 3, 21)), (1402, 1, 1));
    }

    #[test]
    fn test_second_half_of_year() {
        // 1 Mehr 1402
        assert_eq!(to_jalali(date(2023, 9, 23)), (1402, 7, 1));
        // Last day of 1402, a common year
        assert_eq!(to_jalali(date(2024, 3, 19)), (1402, 12, 29));
    }

    #[test]
    fn test_weekday_starts_on_saturday() {
        // 2024-03-16 was a Saturday
        assert_eq!(PersianCalendar.format_weekday(date(2024, 3, 16)), "شنبه");
        assert_eq!(PersianCalendar.format_weekday(date(2024, 3, 22)), "جمعه");
    }

    #[test]
    fn test_day_weekday() {
        // Wednesday, 1 Farvardin 1403
        assert_eq!(
            PersianCalendar.format_day_weekday(date(2024, 3, 20)),
            "چهارشنبه 1ام"
        );
    }
}
