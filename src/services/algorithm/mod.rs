//! 算法模块
//!
//! 每个最短路径算法都实现为惰性的快照序列：消费方每拉取一次，算法推进到下一个
//! 有意义的状态迁移并产出一个快照。序列耗尽后度量冻结。
//! 消费方可以随时停止拉取并丢弃序列，不需要任何清理。

pub mod astar;
pub mod bellman_ford;
pub mod best_first;
pub mod bfs;
pub mod bidirectional;
pub mod dag_shortest;
pub mod dijkstra;
pub mod floyd_warshall;
pub mod greedy_best_first;
pub mod heuristic;
pub mod queue;
pub mod spfa;
pub mod state;
pub mod topological_sort;
pub mod uniform_cost;

#[cfg(test)]
pub(crate) mod fixtures;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{GraphError, VizError, VizResult};
use crate::graph::{Graph, NodeId};
use crate::services::metrics::Metrics;

pub use astar::AStar;
pub use bellman_ford::BellmanFord;
pub use best_first::BestFirstSearch;
pub use bfs::Bfs;
pub use bidirectional::Bidirectional;
pub use dag_shortest::DagShortest;
pub use dijkstra::Dijkstra;
pub use floyd_warshall::FloydWarshall;
pub use greedy_best_first::GreedyBestFirst;
pub use heuristic::{Heuristic, HeuristicKind};
pub use queue::PriorityFrontier;
pub use spfa::Spfa;
pub use state::{RunState, Snapshot, StepKind};
pub use topological_sort::TopologicalSort;
pub use uniform_cost::UniformCost;

/// 逐步执行的算法：快照序列 + 可随时读取的度量
pub trait StepSequence: Iterator<Item = Snapshot> {
    fn metrics(&self) -> &Metrics;
}

/// 可选的最短路径算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "dijkstra")]
    Dijkstra,
    #[serde(rename = "ucs")]
    UniformCost,
    #[serde(rename = "astar")]
    AStar,
    #[serde(rename = "greedy")]
    GreedyBestFirst,
    #[serde(rename = "bellman-ford")]
    BellmanFord,
    #[serde(rename = "spfa")]
    Spfa,
    #[serde(rename = "bfs")]
    Bfs,
    #[serde(rename = "dag")]
    DagShortest,
    #[serde(rename = "floyd-warshall")]
    FloydWarshall,
    #[serde(rename = "bidirectional")]
    Bidirectional,
}

impl Algorithm {
    pub const ALL: [Algorithm; 10] = [
        Algorithm::Dijkstra,
        Algorithm::UniformCost,
        Algorithm::AStar,
        Algorithm::GreedyBestFirst,
        Algorithm::BellmanFord,
        Algorithm::Spfa,
        Algorithm::Bfs,
        Algorithm::DagShortest,
        Algorithm::FloydWarshall,
        Algorithm::Bidirectional,
    ];

    /// 展示名称
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::UniformCost => "Uniform Cost Search",
            Algorithm::AStar => "A*",
            Algorithm::GreedyBestFirst => "Greedy Best-First",
            Algorithm::BellmanFord => "Bellman-Ford",
            Algorithm::Spfa => "SPFA",
            Algorithm::Bfs => "BFS",
            Algorithm::DagShortest => "DAG Shortest Path",
            Algorithm::FloydWarshall => "Floyd-Warshall",
            Algorithm::Bidirectional => "Bidirectional Dijkstra",
        }
    }

    /// 命令行与配置中使用的标识
    pub fn key(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::UniformCost => "ucs",
            Algorithm::AStar => "astar",
            Algorithm::GreedyBestFirst => "greedy",
            Algorithm::BellmanFord => "bellman-ford",
            Algorithm::Spfa => "spfa",
            Algorithm::Bfs => "bfs",
            Algorithm::DagShortest => "dag",
            Algorithm::FloydWarshall => "floyd-warshall",
            Algorithm::Bidirectional => "bidirectional",
        }
    }

    /// 是否要求边权非负
    pub fn requires_non_negative(&self) -> bool {
        matches!(
            self,
            Algorithm::Dijkstra
                | Algorithm::UniformCost
                | Algorithm::AStar
                | Algorithm::GreedyBestFirst
                | Algorithm::Bidirectional
        )
    }

    pub fn run<'g>(&self, graph: &'g Graph, start: &NodeId, end: &NodeId) -> VizResult<StepRun<'g>> {
        self.run_with(graph, start, end, &RunOptions::default())
    }

    /// 创建一次运行；起点或终点不在图中时在产出任何快照之前报错
    pub fn run_with<'g>(
        &self,
        graph: &'g Graph,
        start: &NodeId,
        end: &NodeId,
        options: &RunOptions,
    ) -> VizResult<StepRun<'g>> {
        for node in [start, end] {
            if !graph.contains(node) {
                return Err(GraphError::UnknownNode(node.clone()).into());
            }
        }
        if self.requires_non_negative() && graph.has_negative_weights() {
            log::warn!("{} 要求非负边权，但图中存在负权边，结果可能不正确", self.name());
        }
        log::debug!("开始运行 {}: {} -> {}", self.name(), start, end);

        let steps: Box<dyn StepSequence + 'g> = match self {
            Algorithm::Dijkstra => Box::new(Dijkstra::steps(graph, start, end)),
            Algorithm::UniformCost => Box::new(UniformCost::steps(graph, start, end)),
            Algorithm::AStar => Box::new(AStar::steps(graph, start, end, options.heuristic)),
            Algorithm::GreedyBestFirst => {
                let heuristic = match options.heuristic {
                    HeuristicKind::Auto => HeuristicKind::Euclidean,
                    other => other,
                };
                Box::new(GreedyBestFirst::steps(graph, start, end, heuristic))
            }
            Algorithm::BellmanFord => Box::new(BellmanFord::steps(graph, start, end)),
            Algorithm::Spfa => Box::new(Spfa::steps(graph, start, end)),
            Algorithm::Bfs => Box::new(Bfs::steps(graph, start, end)),
            Algorithm::DagShortest => Box::new(DagShortest::steps(graph, start, end)),
            Algorithm::FloydWarshall => Box::new(FloydWarshall::steps(graph, start, end)),
            Algorithm::Bidirectional => Box::new(Bidirectional::steps(graph, start, end)),
        };

        Ok(StepRun {
            algorithm: *self,
            end: end.clone(),
            steps,
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Algorithm {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        let algorithm = match normalized.as_str() {
            "dijkstra" => Algorithm::Dijkstra,
            "ucs" | "uniform-cost" | "uniform-cost-search" => Algorithm::UniformCost,
            "a*" | "astar" | "a-star" => Algorithm::AStar,
            "greedy" | "greedy-best-first" | "gbfs" => Algorithm::GreedyBestFirst,
            "bellman-ford" | "bellmanford" | "bf" => Algorithm::BellmanFord,
            "spfa" => Algorithm::Spfa,
            "bfs" | "bfs-equal" => Algorithm::Bfs,
            "dag" | "dag-shortest" | "dag-shortest-path" => Algorithm::DagShortest,
            "floyd-warshall" | "floyd" | "fw" => Algorithm::FloydWarshall,
            "bidirectional" | "bidirectional-dijkstra" | "bidi" => Algorithm::Bidirectional,
            _ => return Err(VizError::UnknownAlgorithm(s.to_string())),
        };
        Ok(algorithm)
    }
}

/// 运行选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// A* 与贪心搜索使用的启发式
    #[serde(default)]
    pub heuristic: HeuristicKind,
}

/// 一次惰性运行
pub struct StepRun<'g> {
    algorithm: Algorithm,
    end: NodeId,
    steps: Box<dyn StepSequence + 'g>,
}

impl StepRun<'_> {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// 当前度量；序列耗尽后冻结
    pub fn metrics(&self) -> &Metrics {
        self.steps.metrics()
    }

    /// 耗尽序列并汇总结果
    pub fn into_report(mut self) -> RunReport {
        let snapshots: Vec<Snapshot> = self.steps.by_ref().collect();
        let metrics = self.steps.metrics().clone();
        let path = if metrics.path_found {
            snapshots.last().and_then(|s| s.path_to(&self.end))
        } else {
            None
        };
        RunReport {
            algorithm: self.algorithm,
            snapshots,
            metrics,
            path,
        }
    }
}

impl Iterator for StepRun<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        self.steps.next()
    }
}

/// 一次完整运行的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub snapshots: Vec<Snapshot>,
    pub metrics: Metrics,
    /// 重建出的路径；Floyd-Warshall、负权环、非 DAG 与不可达时为 `None`
    pub path: Option<Vec<NodeId>>,
}
