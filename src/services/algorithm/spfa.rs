//! SPFA 算法模块
//!
//! 基于队列的 Bellman-Ford：只有距离改进且不在队列中的节点才会入队。
//! 某个节点的入队次数超过 |V| 时判定存在可达负权环，立即中止。

use std::collections::{HashMap, HashSet, VecDeque};

use super::state::{RunState, Snapshot, StepKind};
use super::StepSequence;
use crate::graph::{Graph, NodeId};
use crate::services::metrics::{Metrics, MetricsRecorder};

#[derive(Debug)]
enum Phase {
    Init,
    Pop,
    Expand {
        current: NodeId,
        edges: Vec<(NodeId, f64)>,
        cursor: usize,
    },
    Done,
}

/// SPFA 算法结构体
pub struct Spfa<'g> {
    graph: &'g Graph,
    start: NodeId,
    end: NodeId,
    queue: VecDeque<NodeId>,
    in_queue: HashSet<NodeId>,
    enqueue_count: HashMap<NodeId, usize>,
    state: RunState,
    recorder: MetricsRecorder,
    phase: Phase,
}

impl<'g> Spfa<'g> {
    pub fn steps(graph: &'g Graph, start: &NodeId, end: &NodeId) -> Self {
        Self {
            graph,
            start: start.clone(),
            end: end.clone(),
            queue: VecDeque::new(),
            in_queue: HashSet::new(),
            enqueue_count: HashMap::new(),
            state: RunState::new(graph, start),
            recorder: MetricsRecorder::start(),
            phase: Phase::Init,
        }
    }

    fn refresh_frontier(&mut self) {
        self.state.frontier = self.queue.iter().cloned().collect();
    }

    fn terminal(&mut self) -> Snapshot {
        let cost = self.state.distance(&self.end);
        if cost.is_finite() {
            self.recorder.finish_found(cost);
            log::debug!("SPFA 完成，{} 的代价为 {}", self.end, cost);
            let message = format!("SPFA Complete. Shortest path to {}: {}", self.end, cost);
            self.state.snapshot(StepKind::GoalReached, [], message)
        } else {
            self.recorder.finish_unreachable();
            log::debug!("SPFA 完成，{} 不可达", self.end);
            let message = format!("SPFA Complete. Target {} unreachable.", self.end);
            self.state.snapshot(StepKind::Unreachable, [], message)
        }
    }

    /// 检查一条出边；距离改进时产生快照
    fn examine(&mut self, current: &NodeId, neighbor: &NodeId, weight: f64) -> Option<Snapshot> {
        self.recorder.comparison();
        let candidate = self.state.distance(current).extend(weight);
        if !candidate.improves_on(&self.state.distance(neighbor)) {
            return None;
        }

        self.state.relax(neighbor, candidate, current);
        self.recorder.relaxation();

        if !self.in_queue.contains(neighbor) {
            self.queue.push_back(neighbor.clone());
            self.in_queue.insert(neighbor.clone());
            let count = self.enqueue_count.entry(neighbor.clone()).or_insert(0);
            *count += 1;

            if *count > self.graph.node_count() {
                self.recorder.finish_negative_cycle();
                log::warn!("SPFA 检测到负权环: {} 入队 {} 次", neighbor, count);
                self.phase = Phase::Done;
                self.state.frontier.clear();
                let message = format!("Negative Cycle Detected at {}!", neighbor);
                return Some(self.state.snapshot(
                    StepKind::NegativeCycle,
                    [current.clone(), neighbor.clone()],
                    message,
                ));
            }
        }

        self.refresh_frontier();
        let message = format!("Relaxed {}->{}. New dist: {}", current, neighbor, candidate);
        Some(self.state.snapshot(
            StepKind::Relaxing,
            [current.clone(), neighbor.clone()],
            message,
        ))
    }
}

impl Iterator for Spfa<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Init => {
                    self.queue.push_back(self.start.clone());
                    self.in_queue.insert(self.start.clone());
                    self.refresh_frontier();
                    self.phase = Phase::Pop;
                    let message = format!("Initialized SPFA. Start node: {}", self.start);
                    return Some(self.state.snapshot(
                        StepKind::Init,
                        [self.start.clone()],
                        message,
                    ));
                }
                Phase::Pop => {
                    let Some(current) = self.queue.pop_front() else {
                        return Some(self.terminal());
                    };
                    self.in_queue.remove(&current);
                    self.refresh_frontier();

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
                        current,
                        edges,
                        cursor: 0,
                    };
                    return Some(snapshot);
                }
                Phase::Expand {
                    current,
                    edges,
                    mut cursor,
                } => {
                    while cursor < edges.len() {
                        let (neighbor, weight) = &edges[cursor];
                        cursor += 1;
                        if let Some(snapshot) = self.examine(&current, neighbor, *weight) {
                            if snapshot.kind != StepKind::NegativeCycle {
                                self.phase = Phase::Expand {
                                    current,
                                    edges,
                                    cursor,
                                };
                            }
                            return Some(snapshot);
                        }
                    }
                    self.phase = Phase::Pop;
                }
                Phase::Done => return None,
            }
        }
    }
}

impl StepSequence for Spfa<'_> {
    fn metrics(&self) -> &Metrics {
        self.recorder.metrics()
    }
}
