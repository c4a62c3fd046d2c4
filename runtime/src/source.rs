use broker::{AnySource, CsvSource, EastMoneySource, MockSource};
use config::{AppConfig, SourceKind};

use crate::error::RuntimeError;

/// 按 `source.kind` 构造数据源。
pub fn build_source(config: &AppConfig) -> Result<AnySource, RuntimeError> {
	let timezone = config.timezone()?;
	let source = match config.source.kind {
		SourceKind::Eastmoney => AnySource::EastMoney(EastMoneySource::new(config.eastmoney()?)?),
		SourceKind::Csv => AnySource::Csv(CsvSource::new(config.source.csv_dir.clone(), timezone)),
		SourceKind::Mock => AnySource::Mock(MockSource::new(
			timezone,
			config.trading_session()?.windows().to_vec(),
			config.source.mock_start_price,
		)),
	};
	Ok(source)
}
