use crate::bar::Bar;

use super::core::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    name: String,
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    /// `alpha = 2 / (span + 1)`。
    pub fn new(span: usize) -> Self {
        let span = span.max(1);
        Self {
            name: format!("ema_{span}"),
            alpha: 2.0 / (span as f64 + 1.0),
            value: None,
        }
    }

    /// `alpha = 1 / period`，KDJ 的 K/D 平滑使用。
    pub fn smoothing(name: impl Into<String>, period: usize) -> Self {
        Self {
            name: name.into(),
            alpha: 1.0 / period.max(1) as f64,
            value: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// 首个输入作为种子，此后 `prev + alpha * (x - prev)`。
    pub fn next(&mut self, input: f64) -> f64 {
        let value = match self.value {
            None => input,
            Some(prev) => prev + self.alpha * (input - prev),
        };
        self.value = Some(value);
        value
    }

    /// 非有限输入不推进状态，直接返回 `None`。
    pub fn next_defined(&mut self, input: Option<f64>) -> Option<f64> {
        let input = input.filter(|x| x.is_finite())?;
        Some(self.next(input))
    }
}

impl Indicator for Ema {
    type Output = Option<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.value = None;
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.next_defined(Some(bar.close_price))
    }
}

#[cfg(test)]
mod tests {
    use super::Ema;
    use crate::utils::approx_eq_f64;

    #[test]
    fn ema_is_seeded_with_first_value() {
        let mut ema = Ema::new(3);
        assert!(approx_eq_f64(ema.next(10.0), 10.0));
        assert!(approx_eq_f64(ema.next(20.0), 15.0));
        assert!(approx_eq_f64(ema.next(20.0), 17.5));
    }

    #[test]
    fn smoothing_uses_reciprocal_alpha() {
        let mut ema = Ema::smoothing("k", 3);
        assert!(approx_eq_f64(ema.alpha(), 1.0 / 3.0));
        ema.next(50.0);
        assert!(approx_eq_f64(ema.next(100.0), 50.0 + 50.0 / 3.0));
    }

    #[test]
    fn undefined_input_keeps_state() {
        let mut ema = Ema::new(5);
        ema.next(10.0);
        assert_eq!(ema.next_defined(Some(f64::NAN)), None);
        assert_eq!(ema.next_defined(None), None);
        assert_eq!(ema.value(), Some(10.0));
    }
}
