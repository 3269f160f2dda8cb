use crate::calendar::Quote;
use crate::error::{DataError, DataResult};
use crate::fasting::FastingRule;
use crate::feast::{Feast, Saint};
use crate::readings::{FeastReadings, GospelCycle, LectionaryTable};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The JSON tables that make up a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    FixedFeasts,
    MoveableFeasts,
    Saints,
    FastingRules,
    Quotes,
    EpistleCycle,
    GospelCycle,
    FeastReadings,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::FixedFeasts,
        Table::MoveableFeasts,
        Table::Saints,
        Table::FastingRules,
        Table::Quotes,
        Table::EpistleCycle,
        Table::GospelCycle,
        Table::FeastReadings,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Table::FixedFeasts => "fixed_feasts.json",
            Table::MoveableFeasts => "moveable_feasts.json",
            Table::Saints => "saints.json",
            Table::FastingRules => "fasting_rules.json",
            Table::Quotes => "quotes.json",
            Table::EpistleCycle => "epistle_cycle.json",
            Table::GospelCycle => "gospel_cycle.json",
            Table::FeastReadings => "feast_readings.json",
        }
    }
}

/// Where the raw table text comes from.
pub trait TableSource {
    fn read_table(&self, table: Table) -> DataResult<Cow<'static, str>>;
}

/// Tables compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTables;

impl TableSource for EmbeddedTables {
    fn read_table(&self, table: Table) -> DataResult<Cow<'static, str>> {
        let text = match table {
            Table::FixedFeasts => include_str!("../data/fixed_feasts.json"),
            Table::MoveableFeasts => include_str!("../data/moveable_feasts.json"),
            Table::Saints => include_str!("../data/saints.json"),
            Table::FastingRules => include_str!("../data/fasting_rules.json"),
            Table::Quotes => include_str!("../data/quotes.json"),
            Table::EpistleCycle => include_str!("../data/epistle_cycle.json"),
            Table::GospelCycle => include_str!("../data/gospel_cycle.json"),
            Table::FeastReadings => include_str!("../data/feast_readings.json"),
        };
        Ok(Cow::Borrowed(text))
    }
}

/// Tables read from `<root>/<table file name>`.
#[derive(Debug, Clone)]
pub struct DirectoryTables {
    root: PathBuf,
}

impl DirectoryTables {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_of(&self, table: Table) -> PathBuf {
        self.root.join(table.file_name())
    }
}

impl TableSource for DirectoryTables {
    fn read_table(&self, table: Table) -> DataResult<Cow<'static, str>> {
        let path = self.path_of(table);
        debug!(path = %path.display(), "reading table");
        fs::read_to_string(&path)
            .map(Cow::Owned)
            .map_err(|source| DataError::Io {
                table: table.file_name(),
                source,
            })
    }
}

/// Every rule table the resolvers consult. Loaded once, then shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    pub fixed_feasts: Vec<Feast>,
    pub moveable_feasts: Vec<Feast>,
    pub saints: Vec<Saint>,
    pub fasting_rules: Vec<FastingRule>,
    pub quotes: Vec<Quote>,
    pub epistle_cycle: LectionaryTable,
    pub gospel_cycle: GospelCycle,
    pub feast_readings: FeastReadings,
}

impl ReferenceDataset {
    pub fn load<S: TableSource + ?Sized>(source: &S) -> DataResult<Self> {
        let dataset = Self {
            fixed_feasts: parse_table(source, Table::FixedFeasts)?,
            moveable_feasts: parse_table(source, Table::MoveableFeasts)?,
            saints: parse_table(source, Table::Saints)?,
            fasting_rules: parse_table(source, Table::FastingRules)?,
            quotes: parse_table(source, Table::Quotes)?,
            epistle_cycle: parse_table(source, Table::EpistleCycle)?,
            gospel_cycle: parse_table(source, Table::GospelCycle)?,
            feast_readings: parse_table(source, Table::FeastReadings)?,
        };
        dataset.validate()?;

        debug!(
            fixed_feasts = dataset.fixed_feasts.len(),
            moveable_feasts = dataset.moveable_feasts.len(),
            saints = dataset.saints.len(),
            fasting_rules = dataset.fasting_rules.len(),
            quotes = dataset.quotes.len(),
            fixed_feast_readings = dataset.feast_readings.fixed.len(),
            moveable_feast_readings = dataset.feast_readings.moveable.len(),
            "reference dataset loaded"
        );
        Ok(dataset)
    }

    /// Cross-record checks that the per-record decoding cannot express.
    pub fn validate(&self) -> DataResult<()> {
        let fixed = Table::FixedFeasts.file_name();
        let moveable = Table::MoveableFeasts.file_name();

        if let Some(feast) = self.fixed_feasts.iter().find(|f| !f.is_fixed()) {
            return Err(DataError::schema(
                fixed,
                format!("feast '{}' is dated by Pascha offset", feast.name),
            ));
        }
        if let Some(feast) = self.moveable_feasts.iter().find(|f| f.is_fixed()) {
            return Err(DataError::schema(
                moveable,
                format!("feast '{}' is dated by month/day", feast.name),
            ));
        }
        if let Some(saint) = self.saints.iter().find(|s| s.month_day().is_none()) {
            return Err(DataError::schema(
                Table::Saints.file_name(),
                format!("saint '{}' has invalid date {}/{}", saint.name, saint.month, saint.day),
            ));
        }
        if let Some(position) = self.quotes.iter().position(|q| q.text.trim().is_empty()) {
            return Err(DataError::schema(
                Table::Quotes.file_name(),
                format!("quote #{} has no text", position + 1),
            ));
        }
        if let Some(entry) = self
            .feast_readings
            .fixed
            .values()
            .chain(self.feast_readings.moveable.values())
            .find(|entry| entry.epistle.is_none() && entry.gospel.is_none())
        {
            warn!(feast = %entry.name, "feast reading entry carries neither epistle nor gospel");
        }

        if self.quotes.is_empty() {
            warn!("quote table is empty; every day will show the default quote");
        }
        if self.epistle_cycle.is_empty() {
            warn!("epistle cycle is empty; no cycle epistles will be resolved");
        }
        Ok(())
    }
}

fn parse_table<T, S>(source: &S, table: Table) -> DataResult<T>
where
    T: DeserializeOwned,
    S: TableSource + ?Sized,
{
    let text = source.read_table(table)?;
    serde_json::from_str(&text).map_err(|source| DataError::Parse {
        table: table.file_name(),
        source,
    })
}

/// Loads the tables compiled into the crate.
pub fn load_dataset() -> DataResult<ReferenceDataset> {
    ReferenceDataset::load(&EmbeddedTables)
}

/// Loads the same tables from JSON files in `dir`.
pub fn load_dataset_from_dir(dir: impl AsRef<Path>) -> DataResult<ReferenceDataset> {
    ReferenceDataset::load(&DirectoryTables::new(dir.as_ref()))
}
