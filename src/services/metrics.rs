//! 算法度量记录器
//!
//! 与具体算法无关的计数器/计时器，贯穿一次运行：比较次数、松弛次数、耗时与最终结果。
//! 运行开始时创建，运行期间累加，`finish_*` 之后冻结，消费方只读。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::core::Distance;

/// 一次运行的终止状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Running,
    GoalReached,
    Unreachable,
    NegativeCycle,
    NotADag,
    Completed,
}

impl Outcome {
    /// 是否属于异常终止（负权环、非 DAG）
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::NegativeCycle | Outcome::NotADag)
    }
}

/// 算法度量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// 严格改进距离的次数
    pub relaxations: u64,
    /// 距离检查次数（无论是否成功）
    pub comparisons: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed: Option<Duration>,
    pub final_cost: Distance,
    pub path_found: bool,
    pub outcome: Outcome,
}

impl Metrics {
    fn new() -> Self {
        Self {
            relaxations: 0,
            comparisons: 0,
            started_at: Utc::now(),
            finished_at: None,
            elapsed: None,
            final_cost: Distance::Unreachable,
            path_found: false,
            outcome: Outcome::Running,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome != Outcome::Running
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.map(|d| d.as_secs_f64()).unwrap_or(0.0)
    }

    /// 展示用的汇总行
    pub fn summary(&self) -> MetricsSummary {
        let final_cost = if self.final_cost.is_finite() {
            self.final_cost.to_string()
        } else {
            "∞".to_string()
        };
        MetricsSummary {
            relaxations: self.relaxations,
            comparisons: self.comparisons,
            time_secs: (self.elapsed_secs() * 1e5).round() / 1e5,
            final_cost,
            path_found: if self.path_found { "✅" } else { "❌" }.to_string(),
        }
    }
}

/// 比较表中的一行度量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    #[serde(rename = "Relaxations")]
    pub relaxations: u64,
    #[serde(rename = "Comparisons")]
    pub comparisons: u64,
    #[serde(rename = "Time (s)")]
    pub time_secs: f64,
    #[serde(rename = "Final Cost")]
    pub final_cost: String,
    #[serde(rename = "Path Found")]
    pub path_found: String,
}

/// 度量记录器
#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    metrics: Metrics,
    timer: Instant,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::start()
    }
}

impl MetricsRecorder {
    /// 开始记录
    pub fn start() -> Self {
        Self {
            metrics: Metrics::new(),
            timer: Instant::now(),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn comparison(&mut self) {
        if self.frozen("comparison") {
            return;
        }
        self.metrics.comparisons += 1;
    }

    pub fn relaxation(&mut self) {
        if self.frozen("relaxation") {
            return;
        }
        self.metrics.relaxations += 1;
    }

    pub fn finish_found(&mut self, cost: Distance) {
        self.finish(Outcome::GoalReached, cost, cost.is_finite());
    }

    pub fn finish_unreachable(&mut self) {
        self.finish(Outcome::Unreachable, Distance::Unreachable, false);
    }

    /// 负权环：无论距离表看起来如何，都不报告路径
    pub fn finish_negative_cycle(&mut self) {
        self.finish(Outcome::NegativeCycle, Distance::Unreachable, false);
    }

    pub fn finish_not_dag(&mut self) {
        self.finish(Outcome::NotADag, Distance::Unreachable, false);
    }

    /// 全程跑完的运行（如全源算法），代价有限即视为找到路径
    pub fn finish_completed(&mut self, cost: Distance) {
        self.finish(Outcome::Completed, cost, cost.is_finite());
    }

    fn finish(&mut self, outcome: Outcome, cost: Distance, path_found: bool) {
        if self.frozen("finish") {
            return;
        }
        self.metrics.elapsed = Some(self.timer.elapsed());
        self.metrics.finished_at = Some(Utc::now());
        self.metrics.final_cost = cost;
        self.metrics.path_found = path_found;
        self.metrics.outcome = outcome;
    }

    fn frozen(&self, op: &str) -> bool {
        if self.metrics.is_finished() {
            log::debug!("度量已冻结，忽略 {} 操作", op);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_finish() {
        let mut recorder = MetricsRecorder::start();
        recorder.comparison();
        recorder.comparison();
        recorder.relaxation();
        recorder.finish_found(Distance::Finite(11.0));

        let metrics = recorder.metrics();
        assert_eq!(metrics.comparisons, 2);
        assert_eq!(metrics.relaxations, 1);
        assert!(metrics.path_found);
        assert_eq!(metrics.outcome, Outcome::GoalReached);
        assert!(metrics.elapsed.is_some());
        assert!(metrics.finished_at.is_some());
    }

    #[test]
    fn test_frozen_after_finish() {
        let mut recorder = MetricsRecorder::start();
        recorder.finish_unreachable();
        recorder.comparison();
        recorder.relaxation();
        recorder.finish_found(Distance::Finite(1.0));

        let metrics = recorder.metrics();
        assert_eq!(metrics.comparisons, 0);
        assert_eq!(metrics.relaxations, 0);
        assert_eq!(metrics.outcome, Outcome::Unreachable);
        assert!(!metrics.path_found);
        assert!(metrics.final_cost.is_unreachable());
    }

    #[test]
    fn test_negative_cycle_forces_no_path() {
        let mut recorder = MetricsRecorder::start();
        recorder.finish_negative_cycle();
        assert!(!recorder.metrics().path_found);
        assert!(recorder.metrics().outcome.is_failure());
    }

    #[test]
    fn test_summary() {
        let mut recorder = MetricsRecorder::start();
        recorder.finish_unreachable();
        let summary = recorder.metrics().summary();
        assert_eq!(summary.final_cost, "∞");
        assert_eq!(summary.path_found, "❌");

        let json = serde_json::to_value(&summary).expect("Summary should serialize in test");
        assert!(json.get("Final Cost").is_some());
    }

    #[test]
    fn test_metrics_serialize_unreachable_sentinel() {
        let recorder = MetricsRecorder::start();
        let json = serde_json::to_value(recorder.metrics()).expect("Metrics should serialize in test");
        assert_eq!(json["final_cost"], "inf");
        assert_eq!(json["outcome"], "running");
    }
}
