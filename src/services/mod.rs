//! 服务层模块
//!
//! 逐步执行的最短路径算法、度量记录、批量对比与展示分类

pub mod algorithm;
pub mod batch;
pub mod metrics;
pub mod view;

// 重新导出常用服务
pub use algorithm::{Algorithm, RunOptions, RunReport, Snapshot, StepKind, StepRun};
pub use batch::{compare, AlgorithmStats, BatchReport, BatchRunner, ComparisonRow};
pub use metrics::{Metrics, MetricsRecorder, MetricsSummary, Outcome};
pub use view::{classify, classify_all, NodeCategory};
