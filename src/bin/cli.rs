use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use clap::Parser;
use orthocal::calendar::{self, DayInfo};
use orthocal::dataset::{self, ReferenceDataset};
use orthocal::export;
use orthocal::{FastingLevel, FeastRank};
use std::io::{self, Write};
use std::path::PathBuf;

/// Orthodox calendar: feasts, saints, fasting, and scripture readings for any day.
#[derive(Parser, Debug)]
#[command(name = "orthocal", version)]
struct Cli {
    /// Date to display as YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// One-line output suitable for piping or status bars
    #[arg(long, conflicts_with_all = ["month", "json", "csv"])]
    simple: bool,

    /// Calendar grid of the month containing the date
    #[arg(long)]
    month: bool,

    /// Print JSON (the whole month when combined with --month)
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Print the month containing the date as CSV
    #[arg(long)]
    csv: bool,

    /// Read the calendar tables from this directory instead of the built-in copy
    #[arg(long, env = "ORTHOCAL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log dataset loading details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{input}' (use YYYY-MM-DD)"))
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let dataset = load(&cli)?;
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.csv || (cli.json && cli.month) {
        let days = calendar::resolve_month(date.year(), date.month(), &dataset)
            .with_context(|| format!("no month containing {date}"))?;
        if cli.csv {
            export::write_days_csv(&days, &mut out).context("writing CSV")?;
        } else {
            export::write_days_json(&days, &mut out).context("writing JSON")?;
            writeln!(out)?;
        }
        return Ok(());
    }

    if cli.month {
        let days = calendar::resolve_month(date.year(), date.month(), &dataset)
            .with_context(|| format!("no month containing {date}"))?;
        return render_month(&mut out, &days, Local::now().date_naive());
    }

    let day = calendar::resolve_day(date, &dataset);
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &day).context("writing JSON")?;
        writeln!(out)?;
        Ok(())
    } else if cli.simple {
        render_simple(&mut out, &day)
    } else {
        render_day(&mut out, &day)
    }
}

fn load(cli: &Cli) -> Result<ReferenceDataset> {
    match &cli.data_dir {
        Some(dir) => dataset::load_dataset_from_dir(dir)
            .with_context(|| format!("loading calendar data from {}", dir.display())),
        None => dataset::load_dataset().context("loading built-in calendar data"),
    }
}

fn offset_label(offset: Option<i64>) -> String {
    let Some(offset) = offset else {
        return "Pascha falls outside the supported calendar".to_string();
    };
    match offset {
        0 => "Pascha".to_string(),
        1 => "1 day after Pascha".to_string(),
        -1 => "1 day before Pascha".to_string(),
        n if n > 0 => format!("{n} days after Pascha"),
        n => format!("{} days before Pascha", -n),
    }
}

fn render_day(out: &mut impl Write, day: &DayInfo) -> Result<()> {
    writeln!(out, "☦  Orthodox Calendar")?;
    writeln!(out, "{}", day.date.format("%A, %B %-d, %Y"))?;
    writeln!(out, "{}", offset_label(day.pascha_offset))?;

    if !day.feasts.is_empty() {
        writeln!(out)?;
        writeln!(out, "Feasts")?;
        for feast in &day.feasts {
            writeln!(out, "  ✦ {}", feast.name)?;
            writeln!(out, "    {}", feast.rank.label())?;
            if let Some(greek) = &feast.greek_name {
                writeln!(out, "    {greek}")?;
            }
        }
    }

    if !day.saints.is_empty() {
        writeln!(out)?;
        writeln!(out, "Saints Commemorated")?;
        for saint in &day.saints {
            if saint.title.is_empty() {
                writeln!(out, "  • {}", saint.name)?;
            } else {
                writeln!(out, "  • {} — {}", saint.name, saint.title)?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Fasting")?;
    writeln!(out, "  {}", day.fasting_level.label())?;
    if !day.fasting_reason.is_empty() {
        writeln!(out, "  {}", day.fasting_reason)?;
    }

    if !day.readings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Readings")?;
        for readings in &day.readings {
            if let Some(epistle) = &readings.epistle {
                writeln!(out, "  Epistle: {epistle} ({})", readings.source)?;
            }
            if let Some(gospel) = &readings.gospel {
                writeln!(out, "  Gospel:  {gospel} ({})", readings.source)?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Quote of the Day")?;
    writeln!(out, "  \"{}\"", day.quote.text)?;
    match &day.quote.source {
        Some(source) => writeln!(out, "    — {}, {source}", day.quote.author)?,
        None => writeln!(out, "    — {}", day.quote.author)?,
    }
    Ok(())
}

fn render_simple(out: &mut impl Write, day: &DayInfo) -> Result<()> {
    let reading = day
        .readings
        .first()
        .and_then(|r| r.first())
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        out,
        "{} | {} | {} | {}",
        day.date.format("%Y-%m-%d"),
        day.headline().unwrap_or("-"),
        day.fasting_level,
        reading
    )?;
    Ok(())
}

fn fasting_glyph(level: FastingLevel) -> char {
    match level {
        FastingLevel::Strict => 'S',
        FastingLevel::OilWine => 'O',
        FastingLevel::Fish => 'F',
        FastingLevel::DairyFish => 'D',
        FastingLevel::NoFast => '.',
    }
}

const CELL_WIDTH: usize = 6;

fn render_month(out: &mut impl Write, days: &[DayInfo], today: NaiveDate) -> Result<()> {
    let Some(first) = days.first() else {
        return Ok(());
    };

    writeln!(out, "☦  Orthodox Calendar: {}", first.date.format("%B %Y"))?;
    writeln!(out)?;

    let header: String = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ]
    .iter()
    .map(|weekday| format!("{:<CELL_WIDTH$}", weekday.to_string()))
    .collect();
    writeln!(out, "{}", header.trim_end())?;

    let lead = first.date.weekday().num_days_from_sunday() as usize;
    let mut row = " ".repeat(lead * CELL_WIDTH);
    for day in days {
        let feast = if day.feasts.is_empty() { ' ' } else { '*' };
        let today = if day.date == today { '<' } else { ' ' };
        let cell = format!(
            "{:>2}{}{feast}{today}",
            day.date.day(),
            fasting_glyph(day.fasting_level),
        );
        row.push_str(&format!("{cell:<CELL_WIDTH$}"));
        if day.date.weekday() == Weekday::Sat {
            writeln!(out, "{}", row.trim_end())?;
            row.clear();
        }
    }
    if !row.trim().is_empty() {
        writeln!(out, "{}", row.trim_end())?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "S strict  O oil/wine  F fish  D dairy/fish  . no fast  * feast  < today"
    )?;

    let notable: Vec<_> = days
        .iter()
        .flat_map(|day| day.feasts.iter().map(move |feast| (day.date, feast)))
        .filter(|(_, feast)| feast.rank <= FeastRank::Major)
        .collect();
    if !notable.is_empty() {
        writeln!(out)?;
        writeln!(out, "Feasts this month:")?;
        for (date, feast) in notable {
            writeln!(out, "  {} — {}", date.format("%b %-d"), feast.name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(today: NaiveDate) -> String {
        let dataset = dataset::load_dataset().unwrap();
        let days = calendar::resolve_month(2026, 9, &dataset).unwrap();
        let mut out = Vec::new();
        render_month(&mut out, &days, today).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn today_keeps_the_feast_marker() {
        let grid = render(NaiveDate::from_ymd_opt(2026, 9, 14).unwrap());
        assert!(grid.contains("14S*<"), "{grid}");
    }

    #[test]
    fn today_marker_only_on_today() {
        let grid = render(NaiveDate::from_ymd_opt(2026, 9, 16).unwrap());
        assert!(grid.contains("14S*"), "{grid}");
        assert!(!grid.contains("14S*<"), "{grid}");
        assert_eq!(grid.matches('<').count(), 2, "{grid}");
    }

    #[test]
    fn offset_label_without_pascha() {
        assert_eq!(offset_label(Some(-7)), "7 days before Pascha");
        assert_eq!(offset_label(None), "Pascha falls outside the supported calendar");
    }
}
