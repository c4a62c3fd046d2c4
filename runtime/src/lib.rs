mod broadcast;
mod error;
mod scheduler;
mod server;
mod source;

use std::sync::Arc;

use config::AppConfig;
use market::{Distributor, LiveState, Publisher};
use tracing::info;

pub use broadcast::{run_broadcast, spawn_broadcast};
pub use error::RuntimeError;
pub use scheduler::{CycleReport, InstrumentOutcome, SchedulerSettings, SessionScheduler};
pub use server::{bind, serve};
pub use source::build_source;

/// 启动调度器、广播任务与监听服务，直到其中任一任务退出。
///
/// 只有启动阶段的错误（数据源构造、监听地址不可用）会返回；运行中的单标的错误只记日志。
pub async fn run_live(config: AppConfig) -> Result<(), RuntimeError> {
	let source = build_source(&config)?;
	let state = Arc::new(LiveState::new());
	let distributor = Arc::new(Distributor::new(config.server.channel_capacity));
	let publisher = Publisher::new(Arc::clone(&state), Arc::clone(&distributor));

	let listener = bind(config.bind_addr()?).await?;
	let scheduler = SessionScheduler::from_config(&config, source, Arc::clone(&state))?;
	info!(
		instruments = config.stocks.len(),
		source = ?config.source.kind,
		push_interval_ms = config.server.push_interval_ms,
		"runtime started"
	);

	let mut server_task = tokio::spawn(serve(listener, distributor));
	let mut broadcast_task = spawn_broadcast(publisher, config.push_interval());
	let mut scheduler_task = tokio::spawn(scheduler.run());

	let ended = tokio::select! {
		result = &mut server_task => match result {
			Ok(Err(err)) => return Err(err),
			_ => "listener",
		},
		_ = &mut broadcast_task => "broadcast",
		_ = &mut scheduler_task => "scheduler",
	};
	server_task.abort();
	broadcast_task.abort();
	scheduler_task.abort();
	Err(RuntimeError::TaskEnded(ended.to_string()))
}
