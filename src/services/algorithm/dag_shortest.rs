//! DAG 最短路径模块
//!
//! 先求拓扑序，再按拓扑序对每个节点的出边各松弛一次，O(V+E)。
//! 图中有环时立即以 `NotADag` 结束，不计算任何距离。

use super::state::{RunState, Snapshot, StepKind};
use super::topological_sort::TopologicalSort;
use super::StepSequence;
use crate::graph::{Graph, NodeId};
use crate::services::metrics::{Metrics, MetricsRecorder};

#[derive(Debug)]
enum Phase {
    Init,
    Walk(usize),
    Expand {
        index: usize,
        current: NodeId,
        edges: Vec<(NodeId, f64)>,
        cursor: usize,
    },
    Finish,
    Done,
}

/// DAG 最短路径结构体
pub struct DagShortest<'g> {
    graph: &'g Graph,
    end: NodeId,
    order: Vec<NodeId>,
    state: RunState,
    recorder: MetricsRecorder,
    phase: Phase,
}

impl<'g> DagShortest<'g> {
    pub fn steps(graph: &'g Graph, start: &NodeId, end: &NodeId) -> Self {
        Self {
            graph,
            end: end.clone(),
            order: Vec::new(),
            state: RunState::new(graph, start),
            recorder: MetricsRecorder::start(),
            phase: Phase::Init,
        }
    }

    fn finish(&mut self) -> Snapshot {
        self.state.visited = self.graph.nodes().cloned().collect();
        let cost = self.state.distance(&self.end);
        if cost.is_finite() {
            self.recorder.finish_found(cost);
            log::debug!("DAG 最短路径完成，{} 的代价为 {}", self.end, cost);
            let message = format!("DAG Shortest Path Complete. Cost to {}: {}", self.end, cost);
            self.state.snapshot(StepKind::GoalReached, [], message)
        } else {
            self.recorder.finish_unreachable();
            log::debug!("DAG 最短路径完成，{} 不可达", self.end);
            let message = format!("DAG Shortest Path Complete. Target {} unreachable.", self.end);
            self.state.snapshot(StepKind::Unreachable, [], message)
        }
    }
}

impl Iterator for DagShortest<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Init => match TopologicalSort::sort_kahn(self.graph) {
                    Ok(order) => {
                        self.order = order;
                        self.state.frontier = self.order.clone();
                        self.phase = Phase::Walk(0);
                        let listed: Vec<String> = self.order.iter().map(|n| n.to_string()).collect();
                        let message = format!("Topological Sort Computed: [{}]", listed.join(", "));
                        return Some(self.state.snapshot(StepKind::Init, [], message));
                    }
                    Err(err) => {
                        self.recorder.finish_not_dag();
                        log::warn!("DAG 最短路径无法运行: {}", err);
                        self.state.distances.clear();
                        self.state.parents.clear();
                        return Some(self.state.snapshot(
                            StepKind::NotADag,
                            [],
                            "Error: Graph is not a DAG (Cycle detected).".to_string(),
                        ));
                    }
                },
                Phase::Walk(index) => {
                    let Some(current) = self.order.get(index).cloned() else {
                        self.phase = Phase::Finish;
                        continue;
                    };
                    // 从起点不可达的节点无法经由它到达任何邻居
                    if self.state.distance(&current).is_unreachable() {
                        self.phase = Phase::Walk(index + 1);
                        continue;
                    }

                    self.state.frontier.clear();
                    let message = format!(
                        "Processing {} (dist: {})",
                        current,
                        self.state.distance(&current)
                    );
                    let snapshot =
                        self.state
                            .snapshot(StepKind::Processing, [current.clone()], message);
                    let edges = self
                        .graph
                        .neighbors(&current)
                        .map(|(n, w)| (n.clone(), w))
                        .collect();
                    self.phase = Phase::Expand {
                        index,
                        current,
                        edges,
                        cursor: 0,
                    };
                    return Some(snapshot);
                }
                Phase::Expand {
                    index,
                    current,
                    edges,
                    mut cursor,
                } => {
                    while cursor < edges.len() {
                        let (neighbor, weight) = edges[cursor].clone();
                        cursor += 1;
                        self.recorder.comparison();

                        let candidate = self.state.distance(&current).extend(weight);
                        if !candidate.improves_on(&self.state.distance(&neighbor)) {
                            continue;
                        }
                        self.state.relax(&neighbor, candidate, &current);
                        self.recorder.relaxation();
                        let message =
                            format!("Relaxed {}->{}. New dist: {}", current, neighbor, candidate);
                        let snapshot = self.state.snapshot(
                            StepKind::Relaxing,
                            [current.clone(), neighbor],
                            message,
                        );
                        self.phase = Phase::Expand {
                            index,
                            current,
                            edges,
                            cursor,
                        };
                        return Some(snapshot);
                    }
                    self.phase = Phase::Walk(index + 1);
                }
                Phase::Finish => return Some(self.finish()),
                Phase::Done => return None,
            }
        }
    }
}

impl StepSequence for DagShortest<'_> {
    fn metrics(&self) -> &Metrics {
        self.recorder.metrics()
    }
}
