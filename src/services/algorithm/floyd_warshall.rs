//! Floyd-Warshall算法模块
//!
//! 全源最短路径，O(V^3)，适用于稠密图。
//! 三重循环过于细碎，只每隔 `max(1, V*V/100)` 次内层迭代采样一次快照；
//! 快照只投影起点所在的一行距离。该算法不维护父指针，`parents` 恒为空，
//! 因此无法从快照中重建路径。

use std::collections::HashMap;

use super::state::{RunState, Snapshot, StepKind};
use super::StepSequence;
use crate::core::Distance;
use crate::graph::{Graph, NodeId};
use crate::services::metrics::{Metrics, MetricsRecorder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Sweep,
    Done,
}

/// Floyd-Warshall算法结构体
pub struct FloydWarshall {
    nodes: Vec<NodeId>,
    /// 距离矩阵，不可达为 `f64::INFINITY`
    dist: Vec<Vec<f64>>,
    start: NodeId,
    end: NodeId,
    /// 端点不在图中时为 `None`
    start_idx: Option<usize>,
    end_idx: Option<usize>,
    k: usize,
    i: usize,
    j: usize,
    count: u64,
    sample_every: u64,
    state: RunState,
    recorder: MetricsRecorder,
    phase: Phase,
}

impl FloydWarshall {
    pub fn steps(graph: &Graph, start: &NodeId, end: &NodeId) -> Self {
        let nodes: Vec<NodeId> = graph.nodes().cloned().collect();
        let n = nodes.len();
        let index: HashMap<&NodeId, usize> =
            nodes.iter().enumerate().map(|(i, id)| (id, i)).collect();

        let mut dist = vec![vec![f64::INFINITY; n]; n];
        for (i, row) in dist.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        for edge in graph.edges() {
            if let (Some(&u), Some(&v)) = (index.get(&edge.source), index.get(&edge.target)) {
                dist[u][v] = dist[u][v].min(edge.weight);
            }
        }
        let start_idx = index.get(start).copied();
        let end_idx = index.get(end).copied();

        Self {
            start: start.clone(),
            end: end.clone(),
            start_idx,
            end_idx,
            sample_every: ((n * n) as u64 / 100).max(1),
            nodes,
            dist,
            k: 0,
            i: 0,
            j: 0,
            count: 0,
            state: RunState::without_parents(graph, start),
            recorder: MetricsRecorder::start(),
            phase: Phase::Init,
        }
    }

    /// 把起点所在行投影到运行状态
    fn project_row(&mut self) {
        let Some(start_idx) = self.start_idx else {
            return;
        };
        let row = &self.dist[start_idx];
        self.state.distances = self
            .nodes
            .iter()
            .zip(row)
            .map(|(node, &d)| (node.clone(), Distance::from_f64(d)))
            .collect();
    }

    /// 执行一次内层迭代，返回本次处理的 (k, i, j)
    fn step_once(&mut self) -> (usize, usize, usize) {
        let (k, i, j) = (self.k, self.i, self.j);
        self.recorder.comparison();
        let via = self.dist[i][k] + self.dist[k][j];
        if self.dist[i][j] > via {
            self.dist[i][j] = via;
            self.recorder.relaxation();
        }
        self.count += 1;

        let n = self.nodes.len();
        self.j += 1;
        if self.j == n {
            self.j = 0;
            self.i += 1;
            if self.i == n {
                self.i = 0;
                self.k += 1;
            }
        }
        (k, i, j)
    }

    fn finish(&mut self) -> Snapshot {
        self.project_row();
        self.state.frontier.clear();
        self.state.visited = self.nodes.iter().cloned().collect();

        let negative = (0..self.nodes.len()).find(|&x| self.dist[x][x] < 0.0);
        if let Some(x) = negative {
            self.recorder.finish_negative_cycle();
            let node = self.nodes[x].clone();
            log::warn!("Floyd-Warshall 检测到负权环，经过节点 {}", node);
            let message = format!(
                "Negative cycle detected at {} (dist[{}][{}] = {})",
                node,
                node,
                node,
                Distance::from_f64(self.dist[x][x])
            );
            return self.state.snapshot(StepKind::NegativeCycle, [node], message);
        }

        let cost = match (self.start_idx, self.end_idx) {
            (Some(s), Some(e)) => Distance::from_f64(self.dist[s][e]),
            _ => Distance::Unreachable,
        };
        self.recorder.finish_completed(cost);
        log::debug!("Floyd-Warshall 完成，{} 次迭代", self.count);
        let message = format!(
            "Floyd-Warshall Completed. dist({} -> {}) = {}",
            self.start, self.end, cost
        );
        self.state.snapshot(StepKind::Completed, [], message)
    }
}

impl Iterator for FloydWarshall {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        match self.phase {
            Phase::Init => {
                self.phase = Phase::Sweep;
                self.project_row();
                let start = self.start.clone();
                let message = format!(
                    "Initialized Floyd-Warshall. {} nodes, sampling every {} iterations",
                    self.nodes.len(),
                    self.sample_every
                );
                Some(self.state.snapshot(StepKind::Init, [start], message))
            }
            Phase::Sweep => {
                while self.k < self.nodes.len() {
                    let (k, i, j) = self.step_once();
                    if self.count % self.sample_every == 0 {
                        self.project_row();
                        self.state.frontier = vec![self.nodes[k].clone()];
                        let message = format!(
                            "Pivot k={}, checking i={}, j={}",
                            self.nodes[k], self.nodes[i], self.nodes[j]
                        );
                        let processing = [self.nodes[i].clone(), self.nodes[j].clone()];
                        return Some(self.state.snapshot(StepKind::Pivot, processing, message));
                    }
                }
                self.phase = Phase::Done;
                Some(self.finish())
            }
            Phase::Done => None,
        }
    }
}

impl StepSequence for FloydWarshall {
    fn metrics(&self) -> &Metrics {
        self.recorder.metrics()
    }
}
