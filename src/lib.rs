pub mod calendar;
pub mod dataset;
pub mod dates;
pub mod error;
pub mod export;
pub mod fasting;
pub mod feast;
pub mod pascha;
pub mod readings;

pub use calendar::{resolve_day, resolve_month, resolve_range, DayInfo, Quote};
pub use dataset::{load_dataset, load_dataset_from_dir, ReferenceDataset};
pub use error::{DataError, DataResult};
pub use fasting::{FastingLevel, FastingRule, RuleSpan};
pub use feast::{Feast, FeastDate, FeastRank, Saint};
pub use readings::{DayReadings, ReadingSource, ScriptureReading};
