use strategy::{BuyRule, StrategyError, Threshold, ThresholdBook};

fn book() -> ThresholdBook {
    serde_json::from_str(
        r#"{
            "default": {
                "buy": {"k_max": 20, "d_max": 25, "j_max": 10, "require_turn_up": true},
                "sell": {"k_min": 80, "d_min": 75, "j_min": 90}
            },
            "600038": {
                "sell": {"k_min": 70, "d_min": 60, "j_min": 70, "require_turn_down": false}
            }
        }"#,
    )
    .expect("threshold json")
}

#[test]
fn exact_key_wins_over_default() {
    let book = book();
    let exact = book.resolve("600038").expect("exact");
    assert!(exact.buy.is_none());
    assert_eq!(exact.sell.map(|x| x.k_min), Some(70.0));

    let fallback = book.resolve("000001").expect("default");
    assert_eq!(fallback.buy.map(|x| x.k_max), Some(20.0));
    assert_eq!(fallback.buy.map(|x| x.require_turn_up), Some(true));
    assert_eq!(fallback.sell.map(|x| x.require_turn_down), Some(false));
}

#[test]
fn missing_default_is_error() {
    let mut book = ThresholdBook::default();
    book.insert("600038", Threshold::default());
    assert!(!book.has_default());
    assert_eq!(
        book.resolve("000001"),
        Err(StrategyError::MissingThreshold("000001".to_string()))
    );
    assert!(book.resolve("600038").is_ok());
}

#[test]
fn buy_rule_defaults_to_independent() {
    let book = book();
    let buy = book.resolve("default").expect("default").buy.expect("buy");
    assert_eq!(buy.rule, BuyRule::Independent);

    let parsed: Threshold =
        serde_json::from_str(r#"{"buy": {"k_max": 20, "d_max": 20, "j_max": 0, "rule": "kd_sum"}}"#)
            .expect("kd_sum json");
    assert_eq!(parsed.buy.map(|x| x.rule), Some(BuyRule::KdSum));
    assert!(parsed.sell.is_none());
}
