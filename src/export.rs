use crate::calendar::DayInfo;
use crate::readings::{DayReadings, ReadingSource, ScriptureReading};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One flattened CSV row per resolved day.
#[derive(Debug, Serialize)]
struct DayCsvRecord {
    date: String,
    weekday: String,
    pascha_offset: Option<i64>,
    feasts: String,
    saints: String,
    fasting_level: String,
    fasting_reason: String,
    epistle: String,
    gospel: String,
}

impl From<&DayInfo> for DayCsvRecord {
    fn from(day: &DayInfo) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            weekday: day.date.format("%A").to_string(),
            pascha_offset: day.pascha_offset,
            feasts: join_names(day.feasts.iter().map(|f| f.name.as_str())),
            saints: join_names(day.saints.iter().map(|s| s.name.as_str())),
            fasting_level: day.fasting_level.as_str().to_string(),
            fasting_reason: day.fasting_reason.clone(),
            epistle: join_readings(&day.readings, |r| r.epistle.as_ref()),
            gospel: join_readings(&day.readings, |r| r.gospel.as_ref()),
        }
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join("; ")
}

fn join_readings(
    readings: &[DayReadings],
    pick: impl Fn(&DayReadings) -> Option<&ScriptureReading>,
) -> String {
    readings
        .iter()
        .filter_map(|r| {
            pick(r).map(|reading| match r.source {
                ReadingSource::Cycle => reading.to_string(),
                ReadingSource::Feast => format!("{reading} (feast)"),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Writes `days` as CSV with a header row.
pub fn write_days_csv<W: Write>(days: &[DayInfo], writer: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for day in days {
        writer.serialize(DayCsvRecord::from(day))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_days_to_csv<P: AsRef<Path>>(days: &[DayInfo], path: P) -> csv::Result<()> {
    let file = File::create(path)?;
    write_days_csv(days, file)
}

/// Writes `days` as a pretty-printed JSON array.
pub fn write_days_json<W: Write>(days: &[DayInfo], writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, days)
}
