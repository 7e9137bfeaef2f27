//! BFS算法模块
//!
//! 等权图上的最短路径：按层次遍历，边权被忽略，距离即跳数。
//! 节点入队时即标记为已访问，之后不再更新。

use std::collections::VecDeque;

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
        neighbors: Vec<NodeId>,
        cursor: usize,
    },
    Goal,
    Done,
}

/// BFS算法结构体
pub struct Bfs<'g> {
    graph: &'g Graph,
    start: NodeId,
    end: NodeId,
    queue: VecDeque<NodeId>,
    state: RunState,
    recorder: MetricsRecorder,
    phase: Phase,
}

impl<'g> Bfs<'g> {
    pub fn steps(graph: &'g Graph, start: &NodeId, end: &NodeId) -> Self {
        Self {
            graph,
            start: start.clone(),
            end: end.clone(),
            queue: VecDeque::new(),
            state: RunState::new(graph, start),
            recorder: MetricsRecorder::start(),
            phase: Phase::Init,
        }
    }

    fn refresh_frontier(&mut self) {
        self.state.frontier = self.queue.iter().cloned().collect();
    }
}

impl Iterator for Bfs<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Init => {
                    self.state.visited.insert(self.start.clone());
                    self.queue.push_back(self.start.clone());
                    self.refresh_frontier();
                    self.phase = Phase::Pop;
                    let message = format!("Initialized BFS. Start node: {}", self.start);
                    return Some(self.state.snapshot(
                        StepKind::Init,
                        [self.start.clone()],
                        message,
                    ));
                }
                Phase::Pop => {
                    let Some(current) = self.queue.pop_front() else {
                        self.recorder.finish_unreachable();
                        log::debug!("BFS 队列耗尽，目标 {} 不可达", self.end);
                        let message = format!("Target {} unreachable.", self.end);
                        return Some(self.state.snapshot(StepKind::Unreachable, [], message));
                    };
                    self.refresh_frontier();
                    let message = format!(
                        "Processing {} (dist: {})",
                        current,
                        self.state.distance(&current)
                    );
                    let snapshot =
                        self.state
                            .snapshot(StepKind::Processing, [current.clone()], message);

                    self.phase = if current == self.end {
                        Phase::Goal
                    } else {
                        let neighbors = self
                            .graph
                            .neighbors(&current)
                            .map(|(n, _)| n.clone())
                            .collect();
                        Phase::Expand {
                            current,
                            neighbors,
                            cursor: 0,
                        }
                    };
                    return Some(snapshot);
                }
                Phase::Expand {
                    current,
                    neighbors,
                    mut cursor,
                } => {
                    while cursor < neighbors.len() {
                        let neighbor = neighbors[cursor].clone();
                        cursor += 1;
                        self.recorder.comparison();
                        if self.state.visited.contains(&neighbor) {
                            continue;
                        }

                        let hops = self.state.distance(&current).extend(1.0);
                        self.state.visited.insert(neighbor.clone());
                        self.state.relax(&neighbor, hops, &current);
                        self.queue.push_back(neighbor.clone());
                        self.recorder.relaxation();
                        self.refresh_frontier();

                        let message = format!("Discovered {}. Dist: {}", neighbor, hops);
                        let snapshot = self.state.snapshot(
                            StepKind::Discovered,
                            [current.clone(), neighbor],
                            message,
                        );
                        self.phase = Phase::Expand {
                            current,
                            neighbors,
                            cursor,
                        };
                        return Some(snapshot);
                    }
                    self.phase = Phase::Pop;
                }
                Phase::Goal => {
                    let hops = self.state.distance(&self.end);
                    self.recorder.finish_found(hops);
                    log::debug!("BFS 到达目标 {}，跳数 {}", self.end, hops);
                    self.state.frontier.clear();
                    let message = format!("Target {} reached!", self.end);
                    return Some(self.state.snapshot(StepKind::GoalReached, [], message));
                }
                Phase::Done => return None,
            }
        }
    }
}

impl StepSequence for Bfs<'_> {
    fn metrics(&self) -> &Metrics {
        self.recorder.metrics()
    }
}
