use std::fs;
use std::path::PathBuf;

use broker::{BarSource, BrokerError, CsvSource};
use chrono::{NaiveDate, TimeZone, Utc};
use resonix::ExchangeTz;

fn beijing() -> ExchangeTz {
    "Asia/Shanghai".parse().expect("tz")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("resonix-replay-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 28).expect("date")
}

#[tokio::test]
async fn replays_day_file_in_time_order() {
    let dir = scratch_dir("ordered");
    fs::write(
        dir.join("600038_20250728.csv"),
        "time,open,close,high,low,volume,amount\n\
         2025-07-28 09:32,10.3,10.5,10.5,10.2,300,3150\n\
         2025-07-28 09:31,10.0,10.3,10.3,10.0,200,2060\n",
    )
    .expect("write csv");

    let source = CsvSource::new(&dir, beijing());
    let bars = source.fetch("600038", date()).await.expect("bars");
    assert_eq!(bars.len(), 2);
    assert_eq!(
        bars[0].datetime,
        Utc.with_ymd_and_hms(2025, 7, 28, 1, 31, 0).single().expect("dt")
    );
    assert_eq!(bars[1].close_price, 10.5);
    assert_eq!(bars[1].high_price, 10.5);
    assert_eq!(bars[1].low_price, 10.2);

    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn missing_file_is_empty_data() {
    let dir = scratch_dir("missing");
    let source = CsvSource::new(&dir, beijing());
    assert_eq!(
        source.fetch("000001", date()).await,
        Err(BrokerError::EmptyData("000001".to_string()))
    );
    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn bad_row_is_reported() {
    let dir = scratch_dir("bad");
    fs::write(
        dir.join("600038_20250728.csv"),
        "time,open,close,high,low,volume,amount\n2025-07-28 09:31,abc,1,1,1,1,1\n",
    )
    .expect("write csv");
    let source = CsvSource::new(&dir, beijing());
    assert!(matches!(
        source.fetch("600038", date()).await,
        Err(BrokerError::Csv(_))
    ));
    let _ = fs::remove_dir_all(dir);
}
