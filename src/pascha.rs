use chrono::{Datelike, Duration, NaiveDate};

/// Orthodox Pascha for `year`, expressed as a Gregorian civil date.
///
/// Runs the Meeus Julian Easter algorithm and shifts the result by the
/// Julian/Gregorian drift of the year's century (13 days for 1900-2099).
///
/// Returns `None` when the shifted date falls outside the range
/// `chrono::NaiveDate` can represent, which happens only at its two ends.
pub fn compute(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(4);
    let b = year.rem_euclid(7);
    let c = year.rem_euclid(19);
    let d = (19 * c + 15) % 30;
    let e = (2 * a + 4 * b - d + 34) % 7;
    let month = (d + e + 114) / 31;
    let day = (d + e + 114) % 31 + 1;

    let century = year.div_euclid(100);
    let drift = century - century.div_euclid(4) - 2;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)?
        .checked_add_signed(Duration::days(i64::from(drift)))
}

/// Signed number of days from `pascha` to `date` (negative before Pascha).
pub fn offset(date: NaiveDate, pascha: NaiveDate) -> i64 {
    date.signed_duration_since(pascha).num_days()
}

/// Pascha offset of `date` measured against the Pascha of its own civil year.
pub fn offset_for(date: NaiveDate) -> Option<i64> {
    compute(date.year()).map(|pascha| offset(date, pascha))
}

/// The date lying `days` away from this year's Pascha.
pub fn date_from_offset(year: i32, days: i64) -> Option<NaiveDate> {
    compute(year)?.checked_add_signed(Duration::days(days))
}
