use chrono::{Datelike, NaiveDate};
use orthocal::calendar::{resolve_day, resolve_month, resolve_range, select_quote, Quote};
use orthocal::feast::{find_feasts, find_saints, Feast, FeastRank, Saint};
use orthocal::readings::ReadingSource;
use orthocal::{load_dataset, pascha, FastingLevel, ReferenceDataset};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn pascha_day_info() {
    let dataset = load_dataset().unwrap();
    let info = resolve_day(d(2026, 4, 12), &dataset);
    assert_eq!(info.pascha, Some(d(2026, 4, 12)));
    assert_eq!(info.pascha_offset, Some(0));
    assert_eq!(info.headline(), Some("Pascha (Resurrection of Christ)"));
    assert!(info.has_great_feast());
    assert_eq!(info.fasting_level, FastingLevel::NoFast);
    assert!(!info.quote.text.is_empty());
}

#[test]
fn beheading_has_feast_saint_and_strict_fast() {
    let dataset = load_dataset().unwrap();
    let info = resolve_day(d(2026, 8, 29), &dataset);
    assert_eq!(info.feasts[0].name, "Beheading of John the Baptist");
    assert_eq!(info.top_rank(), Some(FeastRank::Major));
    assert!(info.saints.iter().any(|s| s.name == "St. John the Baptist"));
    assert_eq!(info.fasting_level, FastingLevel::Strict);
}

#[test]
fn moveable_feasts_follow_pascha() {
    let dataset = load_dataset().unwrap();
    for year in [2024, 2025, 2026, 2027] {
        let ascension = pascha::date_from_offset(year, 39).unwrap();
        let info = resolve_day(ascension, &dataset);
        assert!(
            info.feasts.iter().any(|f| f.name.contains("Ascension")),
            "no Ascension on {ascension}"
        );
    }
}

#[test]
fn find_feasts_lists_fixed_before_moveable() {
    let dataset = ReferenceDataset {
        fixed_feasts: vec![
            Feast::fixed("Fixed A", FeastRank::Minor, 3, 25),
            Feast::fixed("Fixed B", FeastRank::Major, 3, 25),
            Feast::fixed("Elsewhere", FeastRank::Great, 3, 26),
        ],
        moveable_feasts: vec![Feast::moveable("Moveable", FeastRank::Great, -18)],
        ..Default::default()
    };
    let pascha = pascha::compute(2026);
    let date = d(2026, 3, 25);
    let names: Vec<_> = find_feasts(date, pascha, &dataset)
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, ["Fixed A", "Fixed B", "Moveable"]);
    assert_eq!(find_feasts(date, pascha, &dataset), find_feasts(date, pascha, &dataset));
}

#[test]
fn find_saints_matches_month_and_day() {
    let dataset = ReferenceDataset {
        saints: vec![
            Saint {
                name: "St. Nicholas".into(),
                title: "Wonderworker".into(),
                description: String::new(),
                month: 12,
                day: 6,
            },
            Saint {
                name: "St. Spyridon".into(),
                title: String::new(),
                description: String::new(),
                month: 12,
                day: 12,
            },
        ],
        ..Default::default()
    };
    let saints = find_saints(d(2026, 12, 6), &dataset);
    assert_eq!(saints.len(), 1);
    assert_eq!(saints[0].name, "St. Nicholas");
    assert!(find_saints(d(2026, 12, 7), &dataset).is_empty());
}

#[test]
fn resolve_day_is_idempotent() {
    let dataset = load_dataset().unwrap();
    for date in [d(2026, 1, 1), d(2026, 4, 5), d(2026, 9, 14), d(2028, 2, 29)] {
        assert_eq!(resolve_day(date, &dataset), resolve_day(date, &dataset));
    }
}

#[test]
fn empty_dataset_still_resolves() {
    let dataset = ReferenceDataset::default();
    let info = resolve_day(d(2026, 7, 1), &dataset);
    assert!(info.feasts.is_empty());
    assert!(info.readings.is_empty());
    assert_eq!(info.fasting_level, FastingLevel::NoFast);
    assert_eq!(info.fasting_reason, "No fasting today");
    assert_eq!(info.quote, Quote::default());
}

#[test]
fn quote_rotates_by_day_of_year() {
    let quotes: Vec<Quote> = ["a", "b", "c"]
        .iter()
        .map(|text| Quote {
            text: text.to_string(),
            author: "someone".into(),
            source: None,
        })
        .collect();
    // 1 January is ordinal 1
    assert_eq!(select_quote(d(2026, 1, 1), &quotes).text, "b");
    assert_eq!(select_quote(d(2026, 1, 3), &quotes).text, "a");
    assert_eq!(select_quote(d(2027, 1, 3), &quotes), select_quote(d(2026, 1, 3), &quotes));
}

#[test]
fn resolve_range_is_ordered_and_inclusive() {
    let dataset = load_dataset().unwrap();
    let days = resolve_range(d(2026, 12, 20), d(2027, 1, 10), &dataset);
    assert_eq!(days.len(), 22);
    assert!(days.windows(2).all(|pair| pair[0].date < pair[1].date));
    assert_eq!(days.first().unwrap().date, d(2026, 12, 20));
    assert_eq!(days.last().unwrap().date, d(2027, 1, 10));
    // each day is measured against its own year's Pascha
    assert_eq!(days.last().unwrap().pascha, pascha::compute(2027));
    for day in &days {
        assert_eq!(*day, resolve_day(day.date, &dataset));
    }
}

#[test]
fn resolve_range_with_reversed_bounds_is_empty() {
    let dataset = ReferenceDataset::default();
    assert!(resolve_range(d(2026, 5, 2), d(2026, 5, 1), &dataset).is_empty());
}

#[test]
fn resolve_month_covers_every_day() {
    let dataset = load_dataset().unwrap();
    let february = resolve_month(2028, 2, &dataset).unwrap();
    assert_eq!(february.len(), 29);
    assert!(february.iter().all(|day| day.date.month() == 2));
    assert!(resolve_month(2028, 0, &dataset).is_none());
}

#[test]
fn calendar_extremes_resolve_without_panicking() {
    let dataset = load_dataset().unwrap();
    for date in [NaiveDate::MAX, NaiveDate::MIN] {
        let info = resolve_day(date, &dataset);
        assert_eq!(info.pascha, None, "{date}");
        assert_eq!(info.pascha_offset, None, "{date}");
        assert_eq!(info.saints, find_saints(date, &dataset));
        assert!(info.feasts.iter().all(|f| f.is_fixed()), "{date}");
        assert!(info.readings.iter().all(|r| r.source == ReadingSource::Feast));
    }
    // far from the ends the Pascha cycle still applies
    let info = resolve_day(d(262_000, 6, 1), &dataset);
    assert!(info.pascha.is_some());
}
