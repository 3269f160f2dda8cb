use crate::dataset::ReferenceDataset;
use crate::fasting::{self, FastingLevel};
use crate::feast::{self, Feast, FeastRank, Saint};
use crate::pascha;
use crate::readings::{self, DayReadings};
use chrono::{Datelike, NaiveDate, Weekday};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Default for Quote {
    fn default() -> Self {
        Self {
            text: "Lord, have mercy.".to_string(),
            author: "The Church".to_string(),
            source: None,
        }
    }
}

/// Everything observed on one civil day.
///
/// `pascha` and `pascha_offset` are `None` only at the far ends of the
/// representable calendar, where that year's Pascha cannot be expressed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayInfo {
    pub date: NaiveDate,
    pub pascha: Option<NaiveDate>,
    pub pascha_offset: Option<i64>,
    pub feasts: Vec<Feast>,
    pub saints: Vec<Saint>,
    pub fasting_level: FastingLevel,
    pub fasting_reason: String,
    pub readings: Vec<DayReadings>,
    pub quote: Quote,
}

impl DayInfo {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn has_great_feast(&self) -> bool {
        self.feasts.iter().any(|f| f.rank == FeastRank::Great)
    }

    /// Highest rank among the day's feasts.
    pub fn top_rank(&self) -> Option<FeastRank> {
        self.feasts.iter().map(|f| f.rank).min()
    }

    /// Name of the first feast, or of the first saint on a day without feasts.
    pub fn headline(&self) -> Option<&str> {
        self.feasts
            .first()
            .map(|f| f.name.as_str())
            .or_else(|| self.saints.first().map(|s| s.name.as_str()))
    }
}

/// Quote of the day, rotating through the table by day of the year.
pub fn select_quote(date: NaiveDate, quotes: &[Quote]) -> Quote {
    if quotes.is_empty() {
        return Quote::default();
    }
    let index = date.ordinal() as usize % quotes.len();
    quotes[index].clone()
}

/// Resolves every observance for `date` against the Pascha of its civil year.
///
/// Total over every `NaiveDate`: a year without a representable Pascha keeps
/// its fixed feasts, saints, civil fasting rules and quote.
pub fn resolve_day(date: NaiveDate, dataset: &ReferenceDataset) -> DayInfo {
    let pascha = pascha::compute(date.year());
    let feasts = feast::find_feasts(date, pascha, dataset);
    let saints = feast::find_saints(date, dataset);
    let (fasting_level, fasting_reason) =
        fasting::resolve_fasting(date, pascha, &dataset.fasting_rules, &feasts);
    let readings = readings::resolve_readings(date, pascha, dataset, &feasts);

    DayInfo {
        date,
        pascha,
        pascha_offset: pascha.map(|pascha| pascha::offset(date, pascha)),
        feasts,
        saints,
        fasting_level,
        fasting_reason,
        readings,
        quote: select_quote(date, &dataset.quotes),
    }
}

/// Resolves each day from `start` to `end` inclusive, returned in date order.
pub fn resolve_range(start: NaiveDate, end: NaiveDate, dataset: &ReferenceDataset) -> Vec<DayInfo> {
    let dates: Vec<NaiveDate> = start.iter_days().take_while(|date| *date <= end).collect();
    dates
        .par_iter()
        .map(|date| resolve_day(*date, dataset))
        .collect()
}

/// First and last day of a month; `None` for a month outside 1..=12.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

pub fn resolve_month(year: i32, month: u32, dataset: &ReferenceDataset) -> Option<Vec<DayInfo>> {
    let (first, last) = month_bounds(year, month)?;
    Some(resolve_range(first, last, dataset))
}
