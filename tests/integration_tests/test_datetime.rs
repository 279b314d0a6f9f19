// integration tests for date-time aware ordering

use jsonmatch::{MatchOptions, Policy};

use crate::common::check;

#[test]
fn test_date_time_layout() {
    let opts = MatchOptions::new().with_date_time_format("%Y-%m-%d %H:%M:%S");
    let value = r#"{"time":"2024-01-01 12:34:56"}"#;
    assert_match!(value, r#"["time",">=","2024-01-01 12:34:56"]"#, true, &opts);
    assert_match!(value, r#"["time",">","2024-01-01 12:34:56"]"#, false, &opts);
    assert_match!(value, r#"["time","<","2024-01-01 12:34:57"]"#, true, &opts);
}

#[test]
fn test_date_only_layout() {
    let opts = MatchOptions::new().with_date_time_format("%Y-%m-%d");
    let value = r#"{"time":"2024-01-01"}"#;
    assert_match!(value, r#"["time",">=","2024-01-01"]"#, true, &opts);
    assert_match!(value, r#"["time","<=","2024-01-01"]"#, true, &opts);
    assert_match!(value, r#"["time",">","2024-01-01"]"#, false, &opts);
    assert_match!(value, r#"["time","<","2024-01-01"]"#, false, &opts);
}

#[test]
fn test_month_day_layout() {
    let opts = MatchOptions::new().with_date_time_format("%m-%d");
    let value = r#"{"time":"01-01"}"#;
    assert_match!(value, r#"["time",">=","01-01"]"#, true, &opts);
    assert_match!(value, r#"["time","<=","01-01"]"#, true, &opts);
    assert_match!(value, r#"["time","<","12-31"]"#, true, &opts);
}

#[test]
fn test_dates_compare_chronologically_not_lexically() {
    let opts = MatchOptions::new().with_date_time_format("%d/%m/%Y");
    // lexically "02/01/2024" < "15/12/2023", chronologically it is later
    assert_match!(r#"{"d":"02/01/2024"}"#, r#"["d",">","15/12/2023"]"#, true, &opts);
}

#[test]
fn test_unparseable_date_is_type_mismatch() {
    let opts = MatchOptions::new().with_date_time_format("%Y-%m-%d");
    let err = check(r#"{"time":"yesterday"}"#, r#"["time",">","2024-01-01"]"#, &opts).unwrap_err();
    assert!(err.is_type_mismatch());

    let opts = opts.with_type_mismatch(Policy::ReturnFalse);
    assert_match!(r#"{"time":"yesterday"}"#, r#"["time",">","2024-01-01"]"#, false, &opts);
}

#[test]
fn test_strings_without_layout_are_not_ordered() {
    let err = check(
        r#"{"time":"2024-01-01"}"#,
        r#"["time",">=","2024-01-01"]"#,
        &MatchOptions::new(),
    )
    .unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn test_rejected_layout_has_no_effect() {
    let opts = MatchOptions::new().with_date_time_format("not a layout");
    assert!(opts.date_time_format().is_none());
    let err = check(r#"{"time":"2024-01-01"}"#, r#"["time",">=","2024-01-01"]"#, &opts).unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn test_equality_ignores_layout() {
    let opts = MatchOptions::new().with_date_time_format("%Y-%m-%d");
    assert_match!(r#"{"time":"2024-01-01"}"#, r#"["time","=","2024-01-01"]"#, true, &opts);
    assert_match!(
        r#"{"time":"2024-01-01"}"#,
        r#"["time","in",["2024-01-01","2024-01-02"]]"#,
        true,
        &opts
    );
}

#[test]
fn test_layout_applies_through_quantifiers() {
    let opts = MatchOptions::new().with_date_time_format("%Y-%m-%d");
    let value = r#"{"orders":[{"at":"2023-12-30"},{"at":"2024-02-11"}]}"#;
    assert_match!(value, r#"["orders.[+].at",">=","2024-01-01"]"#, true, &opts);
    assert_match!(value, r#"["orders.[*].at",">=","2024-01-01"]"#, false, &opts);
    assert_match!(value, r#"["orders.[-1].at",">=","2024-01-01"]"#, true, &opts);
}

#[test]
fn test_hour_only_layout_keeps_the_hour() {
    let opts = MatchOptions::new().with_date_time_format("%Y-%m-%d %H");
    assert!(opts.date_time_format().is_some());
    let value = r#"{"t":"2024-01-01 23"}"#;
    assert_match!(value, r#"["t",">","2024-01-01 05"]"#, true, &opts);
    assert_match!(value, r#"["t","<","2024-01-01 05"]"#, false, &opts);
}

#[test]
fn test_year_month_layout() {
    let opts = MatchOptions::new().with_date_time_format("%Y-%m");
    assert!(opts.date_time_format().is_some());
    let value = r#"{"billing":[{"month":"2023-12"},{"month":"2024-02"}]}"#;
    assert_match!(value, r#"["billing.[+].month",">=","2024-01"]"#, true, &opts);
    assert_match!(value, r#"["billing.[*].month",">=","2024-01"]"#, false, &opts);
    assert_match!(value, r#"["billing.[0].month","<","2024-01"]"#, true, &opts);
}
