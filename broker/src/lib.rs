pub mod adapters;
pub mod error;
pub mod protocol;
pub mod retry;

pub use adapters::{AnySource, CsvSource, EastMoneyConfig, EastMoneySource, MockSource};
pub use error::BrokerError;
pub use protocol::BarSource;
pub use retry::{compute_backoff_ms, RetryPolicy};

#[cfg(test)]
mod tests {
	use super::{AnySource, BarSource, BrokerError, MockSource};
	use chrono::{FixedOffset, NaiveDate};
	use resonix::ExchangeTz;
	use resonix::SessionWindow;

	fn mock() -> MockSource {
		let windows = vec!["09:30-11:30".parse::<SessionWindow>().expect("window")];
		MockSource::new(ExchangeTz::from(FixedOffset::east_opt(8 * 3600).expect("offset")), windows, 20.0)
	}

	#[tokio::test]
	async fn any_source_dispatches_to_inner_source() {
		let source = AnySource::Mock(mock());
		assert_eq!(source.name(), "mock");

		let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
		let bars = source.fetch("600038", date).await.expect("bars");
		assert_eq!(bars.len(), 121);
		assert!(bars.iter().all(|x| x.symbol == "600038"));
	}

	#[tokio::test]
	async fn mock_without_windows_reports_empty_data() {
		let source = MockSource::new(ExchangeTz::from(FixedOffset::east_opt(0).expect("offset")), Vec::new(), 1.0);
		let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
		assert_eq!(
			source.fetch("000001", date).await,
			Err(BrokerError::EmptyData("000001".to_string()))
		);
	}
}
