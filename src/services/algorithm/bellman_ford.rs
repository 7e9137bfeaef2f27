//! Bellman-Ford算法模块
//!
//! 按轮次松弛所有边，最多 |V|-1 轮；某一轮没有任何改进时提前结束。
//! 轮次结束后再扫描一遍所有边，仍能改进说明存在可达的负权环，
//! 此时距离表不可信，强制报告未找到路径。

use super::state::{RunState, Snapshot, StepKind};
use super::StepSequence;
use crate::graph::{Edge, Graph, NodeId};
use crate::services::metrics::{Metrics, MetricsRecorder};

#[derive(Debug)]
enum Phase {
    Init,
    Epoch(usize),
    Scan {
        epoch: usize,
        cursor: usize,
        changed: bool,
    },
    Check,
    Done,
}

/// Bellman-Ford算法结构体
pub struct BellmanFord {
    start: NodeId,
    end: NodeId,
    /// 稳定的边枚举顺序
    edges: Vec<Edge>,
    epochs: usize,
    state: RunState,
    recorder: MetricsRecorder,
    phase: Phase,
}

impl BellmanFord {
    pub fn steps(graph: &Graph, start: &NodeId, end: &NodeId) -> Self {
        Self {
            start: start.clone(),
            end: end.clone(),
            edges: graph.edges(),
            epochs: graph.node_count().saturating_sub(1),
            state: RunState::new(graph, start),
            recorder: MetricsRecorder::start(),
            phase: Phase::Init,
        }
    }

    /// 第一条仍能改进的边
    fn find_improving_edge(&self) -> Option<&Edge> {
        self.edges.iter().find(|edge| {
            let via = self.state.distance(&edge.source).extend(edge.weight);
            self.state.distance(&edge.source).is_finite()
                && via.improves_on(&self.state.distance(&edge.target))
        })
    }

    fn terminal(&mut self) -> Snapshot {
        let cost = self.state.distance(&self.end);
        if cost.is_finite() {
            self.recorder.finish_found(cost);
            log::debug!("Bellman-Ford 完成，{} 的代价为 {}", self.end, cost);
            let message = format!("Shortest path to {} found (cost: {})", self.end, cost);
            self.state.snapshot(StepKind::GoalReached, [], message)
        } else {
            self.recorder.finish_unreachable();
            log::debug!("Bellman-Ford 完成，{} 不可达", self.end);
            let message = format!("Target {} unreachable.", self.end);
            self.state.snapshot(StepKind::Unreachable, [], message)
        }
    }
}

impl Iterator for BellmanFord {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Init => {
                    self.phase = if self.epochs > 0 {
                        Phase::Epoch(1)
                    } else {
                        Phase::Check
                    };
                    let message = format!("Initialized Bellman-Ford. Start node: {}", self.start);
                    return Some(self.state.snapshot(
                        StepKind::Init,
                        [self.start.clone()],
                        message,
                    ));
                }
                Phase::Epoch(epoch) => {
                    self.phase = Phase::Scan {
                        epoch,
                        cursor: 0,
                        changed: false,
                    };
                    let message = format!("Starting Iteration {}/{}", epoch, self.epochs);
                    return Some(self.state.snapshot(StepKind::Epoch, [], message));
                }
                Phase::Scan {
                    epoch,
                    mut cursor,
                    changed,
                } => {
                    while cursor < self.edges.len() {
                        let Edge {
                            source,
                            target,
                            weight,
                        } = self.edges[cursor].clone();
                        cursor += 1;
                        self.recorder.comparison();

                        let from = self.state.distance(&source);
                        let candidate = from.extend(weight);
                        if from.is_finite() && candidate.improves_on(&self.state.distance(&target)) {
                            self.state.relax(&target, candidate, &source);
                            self.recorder.relaxation();
                            self.phase = Phase::Scan {
                                epoch,
                                cursor,
                                changed: true,
                            };
                            let message =
                                format!("Relaxed {}->{}. New dist: {}", source, target, candidate);
                            return Some(self.state.snapshot(
                                StepKind::Relaxing,
                                [source, target],
                                message,
                            ));
                        }
                    }

                    if !changed {
                        self.phase = Phase::Check;
                        return Some(self.state.snapshot(
                            StepKind::Completed,
                            [],
                            "Optimization: No changes in this iteration. Stopping early."
                                .to_string(),
                        ));
                    }
                    self.phase = if epoch < self.epochs {
                        Phase::Epoch(epoch + 1)
                    } else {
                        Phase::Check
                    };
                }
                Phase::Check => {
                    if let Some(edge) = self.find_improving_edge().cloned() {
                        self.recorder.finish_negative_cycle();
                        log::warn!("Bellman-Ford 检测到负权环: {}->{}", edge.source, edge.target);
                        let message =
                            format!("Negative Cycle Detected at {}->{}!", edge.source, edge.target);
                        return Some(self.state.snapshot(
                            StepKind::NegativeCycle,
                            [edge.source, edge.target],
                            message,
                        ));
                    }
                    return Some(self.terminal());
                }
                Phase::Done => return None,
            }
        }
    }
}

impl StepSequence for BellmanFord {
    fn metrics(&self) -> &Metrics {
        self.recorder.metrics()
    }
}
