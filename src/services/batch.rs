//! 批量对比模块
//!
//! - [`compare`]：在同一张图上依次运行多个算法，生成对比表
//! - [`BatchRunner`]：生成多张随机图，以 Dijkstra（含负权边时为 Bellman-Ford）为基准，
//!   统计每个算法的成功率、平均代价与次优次数
//!
//! 单次运行的失败（负权环、非 DAG、超出预算、客户端错误）只计入统计，不会中断批量任务。

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::config::{BatchConfig, GeneratorConfig};
use crate::core::{Distance, VizResult};
use crate::graph::{builders, Graph, NodeId};
use crate::services::algorithm::{Algorithm, RunOptions};
use crate::services::metrics::MetricsSummary;

/// 对比表中的一行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub algorithm: Algorithm,
    pub summary: Option<MetricsSummary>,
    pub snapshots: usize,
    pub path: Option<Vec<NodeId>>,
    pub error: Option<String>,
}

/// 在同一张图上运行多个算法
pub fn compare(
    graph: &Graph,
    start: &NodeId,
    end: &NodeId,
    algorithms: &[Algorithm],
    options: &RunOptions,
) -> Vec<ComparisonRow> {
    algorithms
        .iter()
        .map(|&algorithm| match algorithm.run_with(graph, start, end, options) {
            Ok(run) => {
                let report = run.into_report();
                ComparisonRow {
                    algorithm,
                    summary: Some(report.metrics.summary()),
                    snapshots: report.snapshots.len(),
                    path: report.path,
                    error: None,
                }
            }
            Err(err) => {
                log::debug!("{} 无法运行: {}", algorithm.name(), err);
                ComparisonRow {
                    algorithm,
                    summary: None,
                    snapshots: 0,
                    path: None,
                    error: Some(err.to_string()),
                }
            }
        })
        .collect()
}

/// 单个算法在整个批量任务中的统计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStats {
    pub algorithm: Algorithm,
    pub runs: usize,
    pub successes: usize,
    /// 相对实际运行的图数
    pub success_rate: f64,
    /// 仅统计成功的运行；没有成功时为 `None`
    pub avg_cost: Option<f64>,
    pub avg_snapshots: f64,
    pub avg_elapsed_secs: f64,
    /// 成功但代价高于基准的次数
    pub suboptimal: usize,
    pub failures: usize,
}

/// 批量任务结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub graphs_requested: usize,
    pub graphs_run: usize,
    /// 起点到终点无路径（或基准检测到负权环）而被跳过的图
    pub graphs_skipped: usize,
    pub stats: Vec<AlgorithmStats>,
}

impl BatchReport {
    pub fn stats_for(&self, algorithm: Algorithm) -> Option<&AlgorithmStats> {
        self.stats.iter().find(|s| s.algorithm == algorithm)
    }
}

enum Verdict {
    Found(Distance),
    NotFound,
    Failed(String),
}

struct Attempt {
    snapshots: usize,
    elapsed_secs: f64,
    verdict: Verdict,
}

#[derive(Default)]
struct Tally {
    runs: usize,
    successes: usize,
    cost_sum: f64,
    snapshot_sum: usize,
    elapsed_sum: f64,
    suboptimal: usize,
    failures: usize,
}

impl Tally {
    fn record(&mut self, attempt: &Attempt, baseline: f64) {
        self.runs += 1;
        self.snapshot_sum += attempt.snapshots;
        self.elapsed_sum += attempt.elapsed_secs;
        match &attempt.verdict {
            Verdict::Found(cost) => {
                self.successes += 1;
                self.cost_sum += cost.value();
                if cost.value() > baseline + 1e-9 {
                    self.suboptimal += 1;
                }
            }
            Verdict::NotFound => {}
            Verdict::Failed(_) => self.failures += 1,
        }
    }

    fn into_stats(self, algorithm: Algorithm) -> AlgorithmStats {
        let per_run = |total: f64| {
            if self.runs == 0 {
                0.0
            } else {
                total / self.runs as f64
            }
        };
        AlgorithmStats {
            algorithm,
            runs: self.runs,
            successes: self.successes,
            success_rate: per_run(self.successes as f64),
            avg_cost: (self.successes > 0).then(|| self.cost_sum / self.successes as f64),
            avg_snapshots: per_run(self.snapshot_sum as f64),
            avg_elapsed_secs: per_run(self.elapsed_sum),
            suboptimal: self.suboptimal,
            failures: self.failures,
        }
    }
}

/// 批量对比执行器
#[derive(Debug, Clone)]
pub struct BatchRunner {
    batch: BatchConfig,
    generator: GeneratorConfig,
    options: RunOptions,
}

impl BatchRunner {
    pub fn new(batch: BatchConfig, generator: GeneratorConfig, options: RunOptions) -> Self {
        Self {
            batch,
            generator,
            options,
        }
    }

    /// 执行批量任务；只有图生成失败（配置错误）才返回错误
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> VizResult<BatchReport> {
        log::info!(
            "批量对比开始: {} 张图, {} 个算法, 生成器 {:?}",
            self.batch.num_graphs,
            self.batch.algorithms.len(),
            self.generator.builder
        );

        let mut tallies: Vec<(Algorithm, Tally)> = self
            .batch
            .algorithms
            .iter()
            .map(|&a| (a, Tally::default()))
            .collect();
        let mut graphs_run = 0;
        let mut graphs_skipped = 0;

        for index in 0..self.batch.num_graphs {
            let graph = builders::generate(rng, &self.generator)?;
            let start = NodeId::from(0usize);
            let end = NodeId::from(graph.node_count().saturating_sub(1));

            let Some(baseline) = self.baseline(&graph, &start, &end)? else {
                log::debug!("第 {} 张图: {} 到 {} 无路径，跳过", index, start, end);
                graphs_skipped += 1;
                continue;
            };
            graphs_run += 1;

            for (algorithm, tally) in tallies.iter_mut() {
                let attempt = self.attempt(*algorithm, &graph, &start, &end);
                match &attempt.verdict {
                    Verdict::Found(cost) => {
                        log::debug!("第 {} 张图: {} 代价 {}", index, algorithm.name(), cost)
                    }
                    Verdict::NotFound => {
                        log::debug!("第 {} 张图: {} 未找到路径", index, algorithm.name())
                    }
                    Verdict::Failed(reason) => {
                        log::debug!("第 {} 张图: {} 失败: {}", index, algorithm.name(), reason)
                    }
                }
                tally.record(&attempt, baseline);
            }
        }

        log::info!(
            "批量对比完成: 运行 {} 张图, 跳过 {} 张",
            graphs_run,
            graphs_skipped
        );

        Ok(BatchReport {
            graphs_requested: self.batch.num_graphs,
            graphs_run,
            graphs_skipped,
            stats: tallies
                .into_iter()
                .map(|(algorithm, tally)| tally.into_stats(algorithm))
                .collect(),
        })
    }

    /// 基准最优代价；无路径或存在负权环时返回 `None`
    fn baseline(&self, graph: &Graph, start: &NodeId, end: &NodeId) -> VizResult<Option<f64>> {
        let algorithm = if graph.has_negative_weights() {
            Algorithm::BellmanFord
        } else {
            Algorithm::Dijkstra
        };
        let report = algorithm.run_with(graph, start, end, &self.options)?.into_report();
        Ok(report
            .metrics
            .path_found
            .then(|| report.metrics.final_cost.value()))
    }

    /// 在预算内拉取快照直到序列结束；超出预算即停止拉取
    fn attempt(&self, algorithm: Algorithm, graph: &Graph, start: &NodeId, end: &NodeId) -> Attempt {
        let timer = Instant::now();
        let mut run = match algorithm.run_with(graph, start, end, &self.options) {
            Ok(run) => run,
            Err(err) => {
                return Attempt {
                    snapshots: 0,
                    elapsed_secs: 0.0,
                    verdict: Verdict::Failed(err.to_string()),
                }
            }
        };

        let time_budget = self.batch.time_budget_ms.map(Duration::from_millis);
        let mut snapshots = 0;
        while run.next().is_some() {
            snapshots += 1;
            if run.metrics().is_finished() {
                continue;
            }
            let over_steps = self.batch.step_budget.is_some_and(|b| snapshots >= b);
            let over_time = time_budget.is_some_and(|b| timer.elapsed() >= b);
            if over_steps || over_time {
                return Attempt {
                    snapshots,
                    elapsed_secs: timer.elapsed().as_secs_f64(),
                    verdict: Verdict::Failed(format!("超出预算 ({} 个快照)", snapshots)),
                };
            }
        }

        let metrics = run.metrics();
        let verdict = if metrics.outcome.is_failure() {
            Verdict::Failed(format!("{:?}", metrics.outcome))
        } else if metrics.path_found {
            Verdict::Found(metrics.final_cost)
        } else {
            Verdict::NotFound
        };
        Attempt {
            snapshots,
            elapsed_secs: metrics.elapsed_secs(),
            verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BuilderKind;
    use crate::services::algorithm::fixtures::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_batch(algorithms: Vec<Algorithm>) -> BatchConfig {
        BatchConfig {
            num_graphs: 5,
            algorithms,
            ..BatchConfig::default()
        }
    }

    fn create_generator() -> GeneratorConfig {
        GeneratorConfig {
            num_nodes: 12,
            density: 0.3,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_compare_classic_graph() {
        let graph = create_classic_graph();
        let rows = compare(
            &graph,
            &"A".into(),
            &"E".into(),
            &[Algorithm::Dijkstra, Algorithm::Bfs, Algorithm::FloydWarshall],
            &RunOptions::default(),
        );

        assert_eq!(rows.len(), 3);
        let dijkstra = &rows[0];
        assert_eq!(dijkstra.snapshots, 13);
        assert_eq!(dijkstra.path, Some(ids(&["A", "B", "D", "E"])));
        let summary = dijkstra.summary.as_ref().expect("Summary should exist in test");
        assert_eq!(summary.final_cost, "11");
        assert_eq!(summary.relaxations, 6);

        assert_eq!(rows[2].path, None);
        assert!(rows.iter().all(|r| r.error.is_none()));
    }

    #[test]
    fn test_compare_unknown_node_becomes_error_row() {
        let graph = create_classic_graph();
        let rows = compare(
            &graph,
            &"A".into(),
            &"Z".into(),
            &[Algorithm::Dijkstra, Algorithm::Spfa],
            &RunOptions::default(),
        );
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert!(row.error.is_some());
            assert!(row.summary.is_none());
            assert_eq!(row.snapshots, 0);
        }
    }

    #[test]
    fn test_batch_connected_graphs() {
        let runner = BatchRunner::new(
            create_batch(vec![
                Algorithm::Dijkstra,
                Algorithm::AStar,
                Algorithm::Bidirectional,
                Algorithm::GreedyBestFirst,
            ]),
            create_generator(),
            RunOptions::default(),
        );
        let report = runner
            .run(&mut StdRng::seed_from_u64(42))
            .expect("Batch should run in test");

        // 连通图的起点与终点之间总有路径
        assert_eq!(report.graphs_run, 5);
        assert_eq!(report.graphs_skipped, 0);
        assert_eq!(report.stats.len(), 4);

        for algorithm in [Algorithm::Dijkstra, Algorithm::AStar, Algorithm::Bidirectional] {
            let stats = report.stats_for(algorithm).expect("Stats should exist in test");
            assert_eq!(stats.runs, 5);
            assert_eq!(stats.successes, 5);
            assert_eq!(stats.success_rate, 1.0);
            assert_eq!(stats.suboptimal, 0);
            assert_eq!(stats.failures, 0);
            assert!(stats.avg_snapshots > 0.0);
        }
        let greedy = report
            .stats_for(Algorithm::GreedyBestFirst)
            .expect("Stats should exist in test");
        assert_eq!(greedy.successes, 5);
        assert!(greedy.avg_cost >= report.stats[0].avg_cost);
    }

    #[test]
    fn test_step_budget_counts_as_failure() {
        let mut batch = create_batch(vec![Algorithm::Dijkstra, Algorithm::BellmanFord]);
        batch.step_budget = Some(1);
        let runner = BatchRunner::new(batch, create_generator(), RunOptions::default());
        let report = runner
            .run(&mut StdRng::seed_from_u64(7))
            .expect("Batch should run in test");

        for stats in &report.stats {
            assert_eq!(stats.failures, stats.runs);
            assert_eq!(stats.successes, 0);
            assert_eq!(stats.avg_cost, None);
            assert_eq!(stats.avg_snapshots, 1.0);
        }
    }

    #[test]
    fn test_negative_weights_use_bellman_ford_baseline() {
        let generator = GeneratorConfig {
            builder: BuilderKind::NegativeEdgeDag,
            num_nodes: 10,
            density: 0.5,
            directed: true,
            weight_min: -5,
            weight_max: 10,
            ..GeneratorConfig::default()
        };
        let runner = BatchRunner::new(
            create_batch(vec![
                Algorithm::BellmanFord,
                Algorithm::Spfa,
                Algorithm::DagShortest,
            ]),
            generator,
            RunOptions::default(),
        );
        let report = runner
            .run(&mut StdRng::seed_from_u64(3))
            .expect("Batch should run in test");

        assert_eq!(report.graphs_run + report.graphs_skipped, 5);
        for stats in &report.stats {
            assert_eq!(stats.runs, report.graphs_run);
            assert_eq!(stats.successes, report.graphs_run);
            assert_eq!(stats.suboptimal, 0);
        }
    }

    #[test]
    fn test_not_a_dag_counts_as_failure() {
        // 默认生成无向图，DAG 算法必然失败
        let runner = BatchRunner::new(
            create_batch(vec![Algorithm::DagShortest]),
            create_generator(),
            RunOptions::default(),
        );
        let report = runner
            .run(&mut StdRng::seed_from_u64(1))
            .expect("Batch should run in test");
        let stats = &report.stats[0];
        assert_eq!(stats.failures, report.graphs_run);
        assert_eq!(stats.success_rate, 0.0);
    }
}
