use crate::bar::Bar;

pub trait Indicator: Send {
    type Output;

    fn name(&self) -> &str;
    fn reset(&mut self);
    fn update(&mut self, bar: &Bar) -> Self::Output;

    /// 从头重算整段序列，结果只取决于 `bars`。
    fn backfill(&mut self, bars: &[Bar]) -> Vec<Self::Output> {
        self.reset();
        bars.iter().map(|bar| self.update(bar)).collect()
    }
}
