use chrono::{Datelike, NaiveDate};
use pretty_assertions::assert_eq;
use saas_dataset::{read_csv, write_csv, DatasetGenerator, YEAR_PROFILES};
use tempfile::NamedTempFile;

#[test]
fn test_default_generator_covers_five_years() {
    let records = DatasetGenerator::default().with_seed(1).generate().unwrap();

    assert_eq!(records.len(), 60);
    assert_eq!(records[0].month, NaiveDate::from_ymd_opt(2019, 1, 31).unwrap());
    assert_eq!(records[1].month, NaiveDate::from_ymd_opt(2019, 2, 28).unwrap());
    assert_eq!(records[13].month, NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
    assert_eq!(records[59].month, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
}

#[test]
fn test_months_are_strictly_increasing() {
    let records = DatasetGenerator::new(2021, 6, 30).unwrap().with_seed(3).generate().unwrap();

    for pair in records.windows(2) {
        assert!(pair[0].month < pair[1].month);
        assert_ne!(
            (pair[0].month.year(), pair[0].month.month()),
            (pair[1].month.year(), pair[1].month.month())
        );
    }
}

#[test]
fn test_values_respect_year_profiles() {
    let records = DatasetGenerator::default().with_seed(42).generate().unwrap();

    for record in &records {
        let profile = &YEAR_PROFILES[(record.month.year() - 2019) as usize];
        let (lo, hi) = profile.mrr_enterprise;
        assert!(record.mrr_enterprise >= lo && record.mrr_enterprise < hi);
        let (lo, hi) = profile.churn_rate_basic;
        assert!(record.churn_rate_basic >= lo && record.churn_rate_basic < hi);
        assert!(record.upsell_completed == 0 || record.upsell_completed == 1);
        assert!((0..10).contains(&record.nps_score));
        assert_eq!(record.monthly_active_users, record.net_new_subscribers());
    }
}

#[test]
fn test_profiles_follow_twelve_month_blocks() {
    // A December start still draws its first twelve rows from the first profile.
    let records = DatasetGenerator::new(2019, 12, 24)
        .unwrap()
        .with_seed(3)
        .generate()
        .unwrap();

    for (offset, record) in records.iter().enumerate() {
        let profile = &YEAR_PROFILES[offset / 12];
        let (lo, hi) = profile.new_subscribers_basic;
        assert!(
            record.new_subscribers_basic >= lo && record.new_subscribers_basic < hi,
            "row {} drew {} outside {:?}",
            offset,
            record.new_subscribers_basic,
            profile.new_subscribers_basic
        );
        let (lo, hi) = profile.mrr_enterprise;
        assert!(record.mrr_enterprise >= lo && record.mrr_enterprise < hi);
    }
    assert_eq!(records[1].month, NaiveDate::from_ymd_opt(2020, 1, 31).unwrap());
}

#[test]
fn test_seed_makes_generation_reproducible() {
    let first = DatasetGenerator::default().with_seed(99).generate().unwrap();
    let second = DatasetGenerator::default().with_seed(99).generate().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_parameters() {
    assert!(DatasetGenerator::new(2019, 13, 12).is_err());
    assert!(DatasetGenerator::new(2019, 1, 0).is_err());
}

#[test]
fn test_csv_file_can_be_read_back() {
    let records = DatasetGenerator::new(2019, 1, 6).unwrap().with_seed(5).generate().unwrap();
    let file = NamedTempFile::new().unwrap();

    write_csv(file.path(), &records).unwrap();
    let header = std::fs::read_to_string(file.path()).unwrap();
    assert!(header.starts_with("Month,New_Subscribers_Basic,"));

    let loaded = read_csv(file.path()).unwrap();
    assert_eq!(loaded.len(), records.len());
    assert_eq!(loaded[0].month, records[0].month);
    assert_eq!(loaded[5].mrr_premium, records[5].mrr_premium);
}
