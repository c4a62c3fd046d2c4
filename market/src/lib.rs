//! `market` crate 入口。
//!
//! 职责：把信号流水线的结果投影为对外快照、持有实时状态，并向监听者扇出。
//! 该文件只做模块装配与统一导出，具体实现位于各子模块。
//!
//! 模块分工：
//! - `snapshot`：`SnapshotRow` 对外行结构。
//! - `state`：`LiveState`，按标的整体替换的共享映射。
//! - `distributor`：基于 tokio broadcast 的扇出。
//! - `publisher`：广播任务每个周期的统一入口。
//! - `metrics`：运行指标快照。
//!
//! 快速示例：
//! ```rust
//! use std::sync::Arc;
//! use market::{Distributor, LiveState, Publisher};
//!
//! let publisher = Publisher::new(Arc::new(LiveState::new()), Arc::new(Distributor::default()));
//! let mut rx = publisher.distributor().subscribe();
//!
//! // 状态为空时不推送
//! assert_eq!(publisher.tick().unwrap(), None);
//! assert!(rx.try_recv().is_err());
//! ```

mod distributor;
mod metrics;
mod publisher;
mod snapshot;
mod state;

pub use distributor::{Distributor, Frame};
pub use metrics::PublishMetrics;
pub use publisher::Publisher;
pub use snapshot::{project, SnapshotRow};
pub use state::{InstrumentRows, LiveState};
