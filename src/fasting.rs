use crate::dates::{self, MonthDay};
use crate::error::RecordError;
use crate::feast::Feast;
use crate::pascha;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fasting discipline, ordered from strictest to most lenient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FastingLevel {
    Strict,
    OilWine,
    Fish,
    DairyFish,
    #[serde(rename = "none")]
    NoFast,
}

impl FastingLevel {
    /// 0 for a strict fast up to 4 for no fast at all.
    pub fn severity(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FastingLevel::Strict => "strict",
            FastingLevel::OilWine => "oil_wine",
            FastingLevel::Fish => "fish",
            FastingLevel::DairyFish => "dairy_fish",
            FastingLevel::NoFast => "none",
        }
    }

    /// What the level allows, for display.
    pub fn label(&self) -> &'static str {
        match self {
            FastingLevel::Strict => "Strict Fast (no meat, dairy, fish, oil, or wine)",
            FastingLevel::OilWine => "Oil and Wine Permitted (no meat, dairy, or fish)",
            FastingLevel::Fish => "Fish, Oil, and Wine Permitted (no meat or dairy)",
            FastingLevel::DairyFish => "Dairy and Fish Permitted (no meat)",
            FastingLevel::NoFast => "No Fast",
        }
    }
}

impl fmt::Display for FastingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayOverride {
    #[serde(with = "dates::weekday_serde")]
    pub weekday: Weekday,
    pub level: FastingLevel,
}

/// The stretch of days a fasting rule covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSpan {
    /// Every occurrence of one weekday.
    Weekday(Weekday),
    /// Inclusive range of Pascha offsets.
    PaschaRange { start: i64, end: i64 },
    /// Inclusive civil range, wrapping over New Year when `start` is later than `end`.
    FixedRange { start: MonthDay, end: MonthDay },
    /// Starts a number of days after Pascha and ends on a fixed civil day.
    PaschaToFixed { start: i64, end: MonthDay },
}

impl RuleSpan {
    /// Whether `date` lies in the span. Spans measured from Pascha never
    /// contain a date whose year has no representable Pascha.
    pub fn contains(&self, date: NaiveDate, pascha: Option<NaiveDate>) -> bool {
        match *self {
            RuleSpan::Weekday(weekday) => date.weekday() == weekday,
            RuleSpan::PaschaRange { start, end } => pascha
                .map(|pascha| pascha::offset(date, pascha))
                .is_some_and(|offset| start <= offset && offset <= end),
            RuleSpan::FixedRange { start, end } => MonthDay::range_contains(start, end, date),
            RuleSpan::PaschaToFixed { start, end } => {
                let Some(end) = end.in_year(date.year()) else {
                    return false;
                };
                let Some(start) =
                    pascha.and_then(|pascha| pascha.checked_add_signed(Duration::days(start)))
                else {
                    return false;
                };
                // a late Pascha can push the start past the end; the period is then skipped
                start < end && start <= date && date <= end
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FastingRuleRecord")]
pub struct FastingRule {
    pub name: String,
    pub level: FastingLevel,
    pub priority: i32,
    pub span: RuleSpan,
    pub weekday_overrides: Vec<WeekdayOverride>,
    pub description: String,
}

impl FastingRule {
    pub fn new(name: impl Into<String>, level: FastingLevel, priority: i32, span: RuleSpan) -> Self {
        Self {
            name: name.into(),
            level,
            priority,
            span,
            weekday_overrides: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_override(mut self, weekday: Weekday, level: FastingLevel) -> Self {
        self.weekday_overrides.push(WeekdayOverride { weekday, level });
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn matches(&self, date: NaiveDate, pascha: Option<NaiveDate>) -> bool {
        self.span.contains(date, pascha)
    }

    /// Base level, replaced by the first override declared for `weekday`.
    pub fn level_on(&self, weekday: Weekday) -> FastingLevel {
        self.weekday_overrides
            .iter()
            .find(|o| o.weekday == weekday)
            .map_or(self.level, |o| o.level)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FastingRuleRecord {
    name: String,
    level: FastingLevel,
    #[serde(default)]
    priority: i32,
    weekday_only: Option<u8>,
    pascha_offset_start: Option<i64>,
    pascha_offset_end: Option<i64>,
    fixed_start_month: Option<u32>,
    fixed_start_day: Option<u32>,
    fixed_end_month: Option<u32>,
    fixed_end_day: Option<u32>,
    #[serde(default)]
    weekday_overrides: Vec<WeekdayOverride>,
    #[serde(default)]
    description: String,
}

fn month_day_pair(
    rule: &str,
    which: &str,
    month: Option<u32>,
    day: Option<u32>,
) -> Result<Option<MonthDay>, RecordError> {
    match (month, day) {
        (None, None) => Ok(None),
        (Some(month), Some(day)) => MonthDay::new(month, day).map(Some).ok_or_else(|| {
            RecordError::new(format!("rule '{rule}' has invalid {which} date {month}/{day}"))
        }),
        _ => Err(RecordError::new(format!(
            "rule '{rule}' sets only half of its {which} month/day"
        ))),
    }
}

impl TryFrom<FastingRuleRecord> for FastingRule {
    type Error = RecordError;

    fn try_from(record: FastingRuleRecord) -> Result<Self, Self::Error> {
        let name = record.name.as_str();
        let fixed_start = month_day_pair(
            name,
            "start",
            record.fixed_start_month,
            record.fixed_start_day,
        )?;
        let fixed_end = month_day_pair(name, "end", record.fixed_end_month, record.fixed_end_day)?;

        let span = match (
            record.weekday_only,
            record.pascha_offset_start,
            record.pascha_offset_end,
            fixed_start,
            fixed_end,
        ) {
            (Some(number), None, None, None, None) => {
                let weekday = dates::weekday_from_number(number).ok_or_else(|| {
                    RecordError::new(format!("rule '{name}' has weekday {number} outside 0..=6"))
                })?;
                RuleSpan::Weekday(weekday)
            }
            (None, Some(start), Some(end), None, None) => RuleSpan::PaschaRange { start, end },
            (None, None, None, Some(start), Some(end)) => RuleSpan::FixedRange { start, end },
            (None, Some(start), None, None, Some(end)) => RuleSpan::PaschaToFixed { start, end },
            (None, None, None, None, None) => {
                return Err(RecordError::new(format!("rule '{name}' has no date span")));
            }
            _ => {
                return Err(RecordError::new(format!(
                    "rule '{name}' must use exactly one of weekday, pascha range, fixed range, or pascha-to-fixed span"
                )));
            }
        };

        Ok(FastingRule {
            name: record.name,
            level: record.level,
            priority: record.priority,
            span,
            weekday_overrides: record.weekday_overrides,
            description: record.description,
        })
    }
}

/// Fasting level for `date` and the reason shown with it.
///
/// The highest-priority matching rule sets the base level (earliest declared
/// wins a tie) and its weekday overrides are applied. Feast overrides then run
/// in feast order: a strict override only ever tightens the fast, any other
/// override only ever relaxes it.
pub fn resolve_fasting(
    date: NaiveDate,
    pascha: Option<NaiveDate>,
    rules: &[FastingRule],
    feasts: &[Feast],
) -> (FastingLevel, String) {
    let mut winner: Option<&FastingRule> = None;
    for rule in rules.iter().filter(|rule| rule.matches(date, pascha)) {
        if winner.is_none_or(|best| rule.priority > best.priority) {
            winner = Some(rule);
        }
    }

    let (mut level, mut reason) = match winner {
        Some(rule) => (rule.level_on(date.weekday()), rule.description.clone()),
        None => (FastingLevel::NoFast, "No fasting today".to_string()),
    };

    for feast in feasts {
        let Some(feast_level) = feast.fasting_override else {
            continue;
        };
        if feast_level == FastingLevel::Strict {
            if feast_level < level {
                level = feast_level;
                reason = format!("{} — strict fast day", feast.name);
            }
        } else if feast_level > level {
            level = feast_level;
            reason = format!("{} — fasting relaxed for the feast", feast.name);
        }
    }

    (level, reason)
}
