//! 关系型 Sink 模块
//!
//! 此模块提供了将频道活动写入 PostgreSQL 或 SQLite 的功能。

pub mod ban_target;
pub mod models;
pub mod resolve;
pub mod schema;
pub mod sink;
pub mod store;

pub use ban_target::BanTarget;
pub use models::*;
pub use sink::{RecordOutcome, RelationalSink, OCCUPANCY_INTERVAL};
pub use store::{ChannelStore, Connector, DieselConnector, DieselStore, StoreConnection};
