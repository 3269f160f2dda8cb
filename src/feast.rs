use crate::dataset::ReferenceDataset;
use crate::dates::MonthDay;
use crate::error::RecordError;
use crate::fasting::FastingLevel;
use crate::pascha;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Feast importance; sorts from greatest to least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeastRank {
    Great,
    Major,
    Minor,
}

impl FeastRank {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeastRank::Great => "great",
            FeastRank::Major => "major",
            FeastRank::Minor => "minor",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeastRank::Great => "Great Feast",
            FeastRank::Major => "Major Feast",
            FeastRank::Minor => "Minor Observance",
        }
    }
}

impl fmt::Display for FeastRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a feast sits in the year: a fixed civil day or a distance from Pascha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeastDate {
    Fixed(MonthDay),
    Moveable { pascha_offset: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FeastRecord", into = "FeastRecord")]
pub struct Feast {
    pub name: String,
    pub greek_name: Option<String>,
    pub description: String,
    pub rank: FeastRank,
    pub date: FeastDate,
    pub fasting_override: Option<FastingLevel>,
}

impl Feast {
    pub fn fixed(name: impl Into<String>, rank: FeastRank, month: u32, day: u32) -> Self {
        Self::new(name, rank, FeastDate::Fixed(MonthDay { month, day }))
    }

    pub fn moveable(name: impl Into<String>, rank: FeastRank, pascha_offset: i64) -> Self {
        Self::new(name, rank, FeastDate::Moveable { pascha_offset })
    }

    fn new(name: impl Into<String>, rank: FeastRank, date: FeastDate) -> Self {
        Self {
            name: name.into(),
            greek_name: None,
            description: String::new(),
            rank,
            date,
            fasting_override: None,
        }
    }

    pub fn with_fasting_override(mut self, level: FastingLevel) -> Self {
        self.fasting_override = Some(level);
        self
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.date, FeastDate::Fixed(_))
    }

    /// Whether the feast is celebrated on `date` in the year whose Pascha is
    /// `pascha`. Moveable feasts never fall in a year without one.
    pub fn falls_on(&self, date: NaiveDate, pascha: Option<NaiveDate>) -> bool {
        match self.date {
            FeastDate::Fixed(month_day) => month_day.matches(date),
            FeastDate::Moveable { pascha_offset } => {
                pascha.is_some_and(|pascha| pascha::offset(date, pascha) == pascha_offset)
            }
        }
    }
}

/// On-disk shape of a feast: the location is spread over optional fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeastRecord {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    greek_name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
    rank: FeastRank,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pascha_offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fasting_override: Option<FastingLevel>,
}

impl TryFrom<FeastRecord> for Feast {
    type Error = RecordError;

    fn try_from(record: FeastRecord) -> Result<Self, Self::Error> {
        let date = match (record.month, record.day, record.pascha_offset) {
            (Some(month), Some(day), None) => {
                let month_day = MonthDay::new(month, day).ok_or_else(|| {
                    RecordError::new(format!(
                        "feast '{}' has invalid date {month}/{day}",
                        record.name
                    ))
                })?;
                FeastDate::Fixed(month_day)
            }
            (None, None, Some(pascha_offset)) => FeastDate::Moveable { pascha_offset },
            (None, None, None) => {
                return Err(RecordError::new(format!(
                    "feast '{}' needs either month/day or pascha_offset",
                    record.name
                )));
            }
            _ => {
                return Err(RecordError::new(format!(
                    "feast '{}' must set exactly one of month/day or pascha_offset",
                    record.name
                )));
            }
        };

        Ok(Feast {
            name: record.name,
            greek_name: record.greek_name.filter(|name| !name.is_empty()),
            description: record.description,
            rank: record.rank,
            date,
            fasting_override: record.fasting_override,
        })
    }
}

impl From<Feast> for FeastRecord {
    fn from(feast: Feast) -> Self {
        let (month, day, pascha_offset) = match feast.date {
            FeastDate::Fixed(md) => (Some(md.month), Some(md.day), None),
            FeastDate::Moveable { pascha_offset } => (None, None, Some(pascha_offset)),
        };
        FeastRecord {
            name: feast.name,
            greek_name: feast.greek_name,
            description: feast.description,
            rank: feast.rank,
            month,
            day,
            pascha_offset,
            fasting_override: feast.fasting_override,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Saint {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub month: u32,
    pub day: u32,
}

impl Saint {
    pub fn month_day(&self) -> Option<MonthDay> {
        MonthDay::new(self.month, self.day)
    }

    pub fn falls_on(&self, date: NaiveDate) -> bool {
        MonthDay {
            month: self.month,
            day: self.day,
        }
        .matches(date)
    }
}

/// Feasts celebrated on `date`: fixed feasts first, then moveable ones, each
/// group in dataset order. Coinciding feasts are all returned.
pub fn find_feasts(date: NaiveDate, pascha: Option<NaiveDate>, dataset: &ReferenceDataset) -> Vec<Feast> {
    dataset
        .fixed_feasts
        .iter()
        .chain(dataset.moveable_feasts.iter())
        .filter(|feast| feast.falls_on(date, pascha))
        .cloned()
        .collect()
}

pub fn find_saints(date: NaiveDate, dataset: &ReferenceDataset) -> Vec<Saint> {
    dataset
        .saints
        .iter()
        .filter(|saint| saint.falls_on(date))
        .cloned()
        .collect()
}
