use chrono::{DateTime, TimeZone, Utc};
use resonix::{Bar, Signal};
use strategy::{
    BuyRule, BuyThreshold, SellThreshold, SignalPipeline, StrategyError, Threshold, ThresholdBook,
};

fn at(minute: u32) -> DateTime<Utc> {
    // 09:xx 北京时间
    Utc.with_ymd_and_hms(2025, 7, 28, 1, minute, 0)
        .single()
        .expect("valid dt")
}

fn bar(minute: u32, close: f64, high: f64, low: f64) -> Bar {
    Bar {
        symbol: "600038".to_string(),
        datetime: at(minute),
        open_price: close,
        high_price: high,
        low_price: low,
        close_price: close,
        volume: 100.0,
        amount: 100.0 * close,
    }
}

fn sell_book() -> ThresholdBook {
    ThresholdBook::default().with_default(Threshold {
        buy: None,
        sell: Some(SellThreshold {
            k_min: 70.0,
            d_min: 60.0,
            j_min: 70.0,
            require_turn_down: false,
        }),
    })
}

#[test]
fn rising_open_classifies_sell_on_third_bar() {
    let bars = vec![
        bar(30, 10.0, 10.1, 9.9),
        bar(31, 10.3, 10.3, 10.0),
        bar(32, 10.5, 10.5, 10.2),
    ];
    let pipeline = SignalPipeline::with_defaults(sell_book());
    let rows = pipeline.rebuild("600038", &bars).expect("rebuild");

    assert_eq!(rows.len(), 3);
    let ks = rows.iter().map(|x| x.row.k().expect("k")).collect::<Vec<_>>();
    let ds = rows.iter().map(|x| x.row.d().expect("d")).collect::<Vec<_>>();
    let js = rows.iter().map(|x| x.row.j().expect("j")).collect::<Vec<_>>();
    for series in [&ks, &ds, &js] {
        assert!(series.windows(2).all(|w| w[1] > w[0]));
    }

    assert_eq!(rows[0].kdj_signal, Signal::None);
    assert_eq!(rows[1].kdj_signal, Signal::None);
    assert_eq!(rows[2].kdj_signal, Signal::Sell);
    assert!(rows[2].realtime);
    assert!(!rows[0].realtime && !rows[1].realtime);
}

#[test]
fn rebuild_is_repeatable() {
    let bars = vec![
        bar(30, 10.0, 10.1, 9.9),
        bar(31, 10.3, 10.3, 10.0),
        bar(32, 10.5, 10.5, 10.2),
        bar(33, 10.2, 10.5, 10.1),
    ];
    let pipeline = SignalPipeline::with_defaults(sell_book());
    let first = pipeline.rebuild("600038", &bars).expect("first");
    let second = pipeline.rebuild("600038", &bars).expect("second");
    assert_eq!(first, second);
}

#[test]
fn missing_threshold_fails_rebuild() {
    let mut book = ThresholdBook::default();
    book.insert("000001", Threshold::default());
    let pipeline = SignalPipeline::with_defaults(book);
    let bars = vec![bar(30, 10.0, 10.1, 9.9)];
    assert_eq!(
        pipeline.rebuild("600038", &bars),
        Err(StrategyError::MissingThreshold("600038".to_string()))
    );
}

#[test]
fn empty_day_yields_no_rows() {
    let pipeline = SignalPipeline::with_defaults(sell_book());
    assert!(pipeline.rebuild("600038", &[]).expect("empty").is_empty());
}

#[test]
fn flat_bars_never_fire_kdj_even_with_permissive_thresholds() {
    let book = ThresholdBook::default().with_default(Threshold {
        buy: Some(BuyThreshold {
            k_max: 100.0,
            d_max: 100.0,
            j_max: 100.0,
            require_turn_up: false,
            rule: BuyRule::Independent,
        }),
        sell: Some(SellThreshold {
            k_min: 0.0,
            d_min: 0.0,
            j_min: 0.0,
            require_turn_down: false,
        }),
    });
    let bars = (30..40).map(|minute| bar(minute, 10.0, 10.0, 10.0)).collect::<Vec<_>>();

    let rows = SignalPipeline::with_defaults(book)
        .rebuild("600038", &bars)
        .expect("rebuild");

    assert_eq!(rows.len(), bars.len());
    assert!(rows.iter().all(|x| x.row.kdj.is_none()));
    assert!(rows.iter().all(|x| x.kdj_signal == Signal::None));
}
