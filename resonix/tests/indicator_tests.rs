use chrono::{DateTime, TimeZone, Utc};

use resonix::{Bar, IndicatorEngine, KdjParams, MacdParams};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    // 北京时间 = UTC + 8
    Utc.with_ymd_and_hms(2025, 7, 28, hour - 8, minute, 0)
        .single()
        .expect("valid dt")
}

fn bar(hour: u32, minute: u32, close: f64, high: f64, low: f64) -> Bar {
    Bar {
        symbol: "600038".to_string(),
        datetime: at(hour, minute),
        open_price: close,
        high_price: high,
        low_price: low,
        close_price: close,
        volume: 1000.0,
        amount: 1000.0 * close,
    }
}

fn sample_bars(count: usize) -> Vec<Bar> {
    let mut price: f64 = 10.0;
    (0..count)
        .map(|i| {
            let wave = if i % 3 == 0 { 0.08 } else { -0.05 };
            let close = price + wave;
            let high = price.max(close) + 0.03;
            let low = price.min(close) - 0.02;
            price = close;
            let minute = 30 + i as u32;
            bar(9 + minute / 60, minute % 60, close, high, low)
        })
        .collect()
}

#[test]
fn constant_high_low_leaves_kdj_undefined() {
    let engine = IndicatorEngine::default();
    let bars = (0..5)
        .map(|i| bar(9, 30 + i, 10.0, 10.0, 10.0))
        .collect::<Vec<_>>();

    let rows = engine.compute(&bars);
    assert_eq!(rows.len(), 5);
    for row in &rows {
        assert!(row.kdj.is_none());
        assert!(row.k().is_none());
        assert!(row.d().is_none());
        assert!(row.j().is_none());
    }
}

#[test]
fn indicator_engine_is_idempotent() {
    let engine = IndicatorEngine::new(KdjParams::default(), MacdParams::default());
    let bars = sample_bars(120);

    let first = engine.compute(&bars);
    let second = engine.compute(&bars);

    assert_eq!(first.len(), bars.len());
    assert_eq!(first, second);
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.k().map(f64::to_bits), b.k().map(f64::to_bits));
        assert_eq!(a.dif().map(f64::to_bits), b.dif().map(f64::to_bits));
    }
}

#[test]
fn kdj_rises_toward_overbought_in_reference_scenario() {
    let engine = IndicatorEngine::new(KdjParams { n: 9, m1: 3, m2: 3 }, MacdParams::default());
    let bars = vec![
        bar(9, 30, 10.0, 10.1, 9.9),
        bar(9, 31, 10.3, 10.3, 10.0),
        bar(9, 32, 10.5, 10.5, 10.2),
    ];

    let rows = engine.compute(&bars);
    let kdj = rows
        .iter()
        .map(|x| x.kdj.expect("defined"))
        .collect::<Vec<_>>();

    assert!((kdj[0].rsv - 50.0).abs() < 1e-9);
    assert!((kdj[1].rsv - 100.0).abs() < 1e-9);
    assert!((kdj[2].rsv - 100.0).abs() < 1e-9);

    for pair in kdj.windows(2) {
        assert!(pair[1].k > pair[0].k);
        assert!(pair[1].d > pair[0].d);
        assert!(pair[1].j > pair[0].j);
    }

    assert!((kdj[2].k - 700.0 / 9.0).abs() < 1e-9);
    assert!((kdj[2].d - 1700.0 / 27.0).abs() < 1e-9);
    assert!((kdj[2].j - (3.0 * kdj[2].k - 2.0 * kdj[2].d)).abs() < 1e-9);
}

#[test]
fn macd_spans_are_configurable() {
    let bars = sample_bars(60);
    let short = IndicatorEngine::new(KdjParams::default(), MacdParams::default()).compute(&bars);
    let long = IndicatorEngine::new(
        KdjParams::default(),
        MacdParams {
            fast: 12,
            slow: 26,
            signal: 9,
        },
    )
    .compute(&bars);

    let last_short = short.last().and_then(|x| x.dif()).expect("defined");
    let last_long = long.last().and_then(|x| x.dif()).expect("defined");
    assert_ne!(last_short.to_bits(), last_long.to_bits());
    for row in &short {
        let macd = row.macd.expect("defined");
        assert!((macd.macd - (macd.dif - macd.dea)).abs() < 1e-12);
    }
}
