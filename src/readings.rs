use crate::dataset::ReferenceDataset;
use crate::dates::{self, MonthDay};
use crate::error::RecordError;
use crate::feast::{Feast, FeastRank};
use crate::pascha;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Days from Pascha to Pentecost.
pub const PENTECOST: i64 = 49;
/// Clean Monday, the first day of Great Lent.
pub const LENT_START: i64 = -48;
/// Sunday of the Publican and the Pharisee, which opens the Triodion.
pub const TRIODION_START: i64 = -70;
/// Palm Sunday; Holy Week runs from here to Holy Saturday.
pub const HOLY_WEEK_START: i64 = -7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptureReading {
    pub book: String,
    pub passage: String,
}

impl fmt::Display for ScriptureReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.book, self.passage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingSource {
    Feast,
    Cycle,
}

impl fmt::Display for ReadingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingSource::Feast => f.write_str("Feast"),
            ReadingSource::Cycle => f.write_str("Cycle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReadings {
    pub epistle: Option<ScriptureReading>,
    pub gospel: Option<ScriptureReading>,
    pub source: ReadingSource,
}

impl DayReadings {
    fn from_parts(
        epistle: Option<ScriptureReading>,
        gospel: Option<ScriptureReading>,
        source: ReadingSource,
    ) -> Option<Self> {
        if epistle.is_none() && gospel.is_none() {
            return None;
        }
        Some(Self {
            epistle,
            gospel,
            source,
        })
    }

    /// The epistle if there is one, otherwise the gospel.
    pub fn first(&self) -> Option<&ScriptureReading> {
        self.epistle.as_ref().or(self.gospel.as_ref())
    }
}

/// One lectionary series: readings indexed by week number (from 1) and weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, BTreeMap<String, ScriptureReading>>")]
pub struct LectionaryTable {
    weeks: BTreeMap<i64, [Option<ScriptureReading>; 7]>,
}

impl LectionaryTable {
    pub fn get(&self, week: i64, weekday: Weekday) -> Option<&ScriptureReading> {
        self.weeks
            .get(&week)?
            .get(usize::from(dates::weekday_number(weekday)))?
            .as_ref()
    }

    pub fn insert(&mut self, week: i64, weekday: Weekday, reading: ScriptureReading) {
        let days = self.weeks.entry(week).or_default();
        days[usize::from(dates::weekday_number(weekday))] = Some(reading);
    }

    /// Highest week number present.
    pub fn last_week(&self) -> Option<i64> {
        self.weeks.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

impl TryFrom<BTreeMap<String, BTreeMap<String, ScriptureReading>>> for LectionaryTable {
    type Error = RecordError;

    fn try_from(raw: BTreeMap<String, BTreeMap<String, ScriptureReading>>) -> Result<Self, Self::Error> {
        let mut table = LectionaryTable::default();
        for (week_key, days) in raw {
            let week = week_key
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|week| *week >= 1)
                .ok_or_else(|| RecordError::new(format!("week key '{week_key}' is not a positive integer")))?;
            for (day_key, reading) in days {
                let weekday = day_key
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .and_then(dates::weekday_from_number)
                    .ok_or_else(|| {
                        RecordError::new(format!("week {week} has weekday key '{day_key}' outside 0..=6"))
                    })?;
                table.insert(week, weekday, reading);
            }
        }
        Ok(table)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GospelCycle {
    #[serde(default)]
    pub john: LectionaryTable,
    #[serde(default)]
    pub matthew: LectionaryTable,
    #[serde(default)]
    pub luke: LectionaryTable,
    #[serde(default)]
    pub lenten: LectionaryTable,
}

impl GospelCycle {
    pub fn series(&self, series: GospelSeries) -> &LectionaryTable {
        match series {
            GospelSeries::John => &self.john,
            GospelSeries::Matthew => &self.matthew,
            GospelSeries::Luke => &self.luke,
            GospelSeries::Lenten => &self.lenten,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeastReadingEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rank: Option<FeastRank>,
    #[serde(default)]
    pub epistle: Option<ScriptureReading>,
    #[serde(default)]
    pub gospel: Option<ScriptureReading>,
}

/// Proper readings for feast days, keyed by civil day or by Pascha offset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FeastReadingsRecord")]
pub struct FeastReadings {
    pub fixed: HashMap<MonthDay, FeastReadingEntry>,
    pub moveable: HashMap<i64, FeastReadingEntry>,
}

impl FeastReadings {
    /// Fixed entries take precedence over moveable ones falling on the same day.
    pub fn lookup(&self, date: NaiveDate, offset: Option<i64>) -> Option<&FeastReadingEntry> {
        self.fixed
            .get(&MonthDay::of(date))
            .or_else(|| self.moveable.get(&offset?))
    }
}

#[derive(Debug, Deserialize)]
struct FeastReadingsRecord {
    #[serde(default)]
    fixed: HashMap<String, FeastReadingEntry>,
    #[serde(default)]
    moveable: HashMap<String, FeastReadingEntry>,
}

impl TryFrom<FeastReadingsRecord> for FeastReadings {
    type Error = RecordError;

    fn try_from(record: FeastReadingsRecord) -> Result<Self, Self::Error> {
        let fixed = record
            .fixed
            .into_iter()
            .map(|(key, entry)| {
                key.parse::<MonthDay>()
                    .map(|month_day| (month_day, entry))
                    .map_err(|e| RecordError::new(e.to_string()))
            })
            .collect::<Result<_, _>>()?;
        let moveable = record
            .moveable
            .into_iter()
            .map(|(key, entry)| {
                key.trim()
                    .parse::<i64>()
                    .map(|offset| (offset, entry))
                    .map_err(|_| RecordError::new(format!("moveable key '{key}' is not a Pascha offset")))
            })
            .collect::<Result<_, _>>()?;
        Ok(FeastReadings { fixed, moveable })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GospelSeries {
    John,
    Matthew,
    Luke,
    Lenten,
}

impl GospelSeries {
    pub fn as_str(&self) -> &'static str {
        match self {
            GospelSeries::John => "john",
            GospelSeries::Matthew => "matthew",
            GospelSeries::Luke => "luke",
            GospelSeries::Lenten => "lenten",
        }
    }
}

impl fmt::Display for GospelSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GospelPosition {
    pub series: GospelSeries,
    pub week: i64,
}

impl GospelPosition {
    fn new(series: GospelSeries, week: i64) -> Self {
        Self { series, week }
    }
}

/// Week of the epistle cycle in force `offset` days from Pascha.
///
/// The cycle starts over at Pascha; the Triodion and Great Lent borrow its
/// tail (weeks 30-33 and 33-38). Holy Week and the days before the Triodion
/// have no cycle epistle.
pub fn epistle_week(offset: i64) -> Option<i64> {
    if offset >= 0 {
        Some(offset / 7 + 1)
    } else if (LENT_START..HOLY_WEEK_START).contains(&offset) {
        Some((offset - LENT_START) / 7 + 33)
    } else if (TRIODION_START..LENT_START).contains(&offset) {
        Some((offset - TRIODION_START) / 7 + 30)
    } else {
        None
    }
}

/// Gospel series and week for `date`, including the Lukan Jump.
///
/// Days before the Triodion count backwards through Luke from the Pascha of
/// their own civil year, so the week number restarts on 1 January rather
/// than running on from December.
///
/// After Pentecost the Matthew series runs until the week of the Elevation of
/// the Cross (14 September), but never for fewer than 16 weeks. Luke then
/// resumes at the week that keeps the Sunday count aligned: it starts later
/// the shorter the Matthew stretch was.
pub fn gospel_position(date: NaiveDate, pascha: NaiveDate) -> Option<GospelPosition> {
    let offset = pascha::offset(date, pascha);

    if offset < LENT_START {
        // Triodion Sundays continue Luke; earlier days count backwards through it
        let week = (offset - TRIODION_START).div_euclid(7) + 14;
        return Some(GospelPosition::new(GospelSeries::Luke, week));
    }
    if offset < 0 {
        if offset >= HOLY_WEEK_START {
            return None;
        }
        let lent_week = (offset - LENT_START) / 7 + 1;
        return Some(match date.weekday() {
            Weekday::Sat | Weekday::Sun => GospelPosition::new(GospelSeries::Luke, lent_week + 11),
            _ => GospelPosition::new(GospelSeries::Lenten, lent_week),
        });
    }
    if offset <= PENTECOST {
        return Some(GospelPosition::new(GospelSeries::John, offset / 7 + 1));
    }

    let pentecost = pascha.checked_add_signed(Duration::days(PENTECOST))?;
    let elevation = NaiveDate::from_ymd_opt(date.year(), 9, 14)?;
    let matthew_weeks = (pascha::offset(elevation, pentecost).div_euclid(7)).max(1);
    let matthew_week = (offset - PENTECOST) / 7 + 1;
    let lukan_jump = (17 - matthew_weeks).max(0);

    if matthew_week <= matthew_weeks || matthew_week <= 16 {
        Some(GospelPosition::new(GospelSeries::Matthew, matthew_week))
    } else {
        let week = (matthew_week - matthew_weeks + lukan_jump).max(1);
        Some(GospelPosition::new(GospelSeries::Luke, week))
    }
}

fn cycle_readings(date: NaiveDate, pascha: NaiveDate, dataset: &ReferenceDataset) -> Option<DayReadings> {
    let weekday = date.weekday();
    let offset = pascha::offset(date, pascha);

    let epistle = epistle_week(offset)
        .and_then(|week| dataset.epistle_cycle.get(week, weekday))
        .cloned();
    let gospel = gospel_position(date, pascha)
        .and_then(|position| dataset.gospel_cycle.series(position.series).get(position.week, weekday))
        .cloned();

    DayReadings::from_parts(epistle, gospel, ReadingSource::Cycle)
}

fn feast_readings(date: NaiveDate, offset: Option<i64>, dataset: &ReferenceDataset) -> Option<DayReadings> {
    let entry = dataset.feast_readings.lookup(date, offset)?;
    DayReadings::from_parts(entry.epistle.clone(), entry.gospel.clone(), ReadingSource::Feast)
}

/// Readings for `date`: at most one cycle entry and one feast entry.
///
/// A great feast replaces the cycle readings; any lesser feast is read after
/// them. Without a Pascha only fixed feast readings apply.
pub fn resolve_readings(
    date: NaiveDate,
    pascha: Option<NaiveDate>,
    dataset: &ReferenceDataset,
    feasts: &[Feast],
) -> Vec<DayReadings> {
    let offset = pascha.map(|pascha| pascha::offset(date, pascha));
    let feast = feast_readings(date, offset, dataset);
    let cycle = pascha.and_then(|pascha| cycle_readings(date, pascha, dataset));

    match (cycle, feast) {
        (None, None) => Vec::new(),
        (Some(only), None) | (None, Some(only)) => vec![only],
        (Some(cycle), Some(feast)) => {
            if feasts.iter().any(|f| f.rank == FeastRank::Great) {
                vec![feast]
            } else {
                vec![cycle, feast]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epistle_weeks_follow_the_season() {
        assert_eq!(epistle_week(0), Some(1));
        assert_eq!(epistle_week(49), Some(8));
        assert_eq!(epistle_week(-48), Some(33));
        assert_eq!(epistle_week(-8), Some(38));
        assert_eq!(epistle_week(-70), Some(30));
        assert_eq!(epistle_week(-49), Some(33));
        assert_eq!(epistle_week(-7), None);
        assert_eq!(epistle_week(-71), None);
    }

    #[test]
    fn lectionary_keys_must_be_numeric() {
        let bad: Result<LectionaryTable, _> =
            serde_json::from_str(r#"{"one": {"0": {"book": "Acts", "passage": "1:1-8"}}}"#);
        assert!(bad.is_err());
        let bad_day: Result<LectionaryTable, _> =
            serde_json::from_str(r#"{"1": {"7": {"book": "Acts", "passage": "1:1-8"}}}"#);
        assert!(bad_day.is_err());
    }

    #[test]
    fn lectionary_lookup_by_week_and_weekday() {
        let table: LectionaryTable =
            serde_json::from_str(r#"{"2": {"0": {"book": "Acts", "passage": "5:12-20"}}}"#).unwrap();
        assert_eq!(table.get(2, Weekday::Sun).unwrap().to_string(), "Acts 5:12-20");
        assert!(table.get(2, Weekday::Mon).is_none());
        assert!(table.get(0, Weekday::Sun).is_none());
        assert_eq!(table.last_week(), Some(2));
    }
}
