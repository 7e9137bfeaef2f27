//! 最佳优先搜索引擎
//!
//! Dijkstra、一致代价搜索、A* 与贪心最佳优先共享同一个优先队列骨架，
//! 区别只在于排序键和入队规则：
//! - Dijkstra / UCS：键为 g(n)，距离严格改进时入队
//! - A*：键为 g(n) + h(n)，距离严格改进时入队
//! - 贪心：键为 h(n)，节点只在首次发现时入队，之后不再更新
//!
//! 目标节点在出队时检查，而不是在入队时。

use std::collections::HashSet;

use super::heuristic::Heuristic;
use super::queue::PriorityFrontier;
use super::state::{RunState, Snapshot, StepKind};
use super::StepSequence;
use crate::core::Distance;
use crate::graph::{Graph, NodeId};
use crate::services::metrics::{Metrics, MetricsRecorder};

/// 搜索变体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Dijkstra,
    UniformCost,
    AStar,
    Greedy,
}

#[derive(Debug)]
enum Phase {
    Init,
    Pop,
    Expand {
        current: NodeId,
        edges: Vec<(NodeId, f64)>,
        cursor: usize,
    },
    Goal,
    Done,
}

/// 逐步执行的最佳优先搜索
pub struct BestFirstSearch<'g> {
    graph: &'g Graph,
    start: NodeId,
    end: NodeId,
    variant: Variant,
    heuristic: Heuristic<'g>,
    state: RunState,
    queue: PriorityFrontier,
    /// 贪心搜索中已经入过队的节点
    discovered: HashSet<NodeId>,
    recorder: MetricsRecorder,
    phase: Phase,
}

impl<'g> BestFirstSearch<'g> {
    pub fn new(
        graph: &'g Graph,
        start: NodeId,
        end: NodeId,
        variant: Variant,
        heuristic: Heuristic<'g>,
    ) -> Self {
        let state = RunState::new(graph, &start);
        Self {
            graph,
            start,
            end,
            variant,
            heuristic,
            state,
            queue: PriorityFrontier::new(),
            discovered: HashSet::new(),
            recorder: MetricsRecorder::start(),
            phase: Phase::Init,
        }
    }

    fn key(&self, node: &NodeId, g: Distance) -> f64 {
        match self.variant {
            Variant::Dijkstra | Variant::UniformCost => g.value(),
            Variant::AStar => g.value() + self.heuristic.estimate(node),
            Variant::Greedy => self.heuristic.estimate(node),
        }
    }

    fn refresh_frontier(&mut self) {
        let visited = &self.state.visited;
        self.state.frontier = self.queue.pending(|n| !visited.contains(n));
    }

    fn init_message(&self) -> String {
        match self.variant {
            Variant::Dijkstra => format!("Initialized Dijkstra. Start node: {}", self.start),
            Variant::UniformCost => format!("Initialized UCS. Start: {}", self.start),
            Variant::AStar => format!(
                "Initialized A*. h(start)={:.2}",
                self.heuristic.estimate(&self.start)
            ),
            Variant::Greedy => format!(
                "Initialized Greedy Best-First. h(start)={:.2}",
                self.heuristic.estimate(&self.start)
            ),
        }
    }

    fn processing_message(&self, node: &NodeId) -> String {
        let g = self.state.distance(node);
        match self.variant {
            Variant::Dijkstra => format!("Processing node {} (dist: {})", node, g),
            Variant::UniformCost => format!("Processing node {} (Cost: {})", node, g),
            Variant::AStar => format!(
                "Processing {} (g={}, h={:.2})",
                node,
                g,
                self.heuristic.estimate(node)
            ),
            Variant::Greedy => format!(
                "Processing {} (h={:.2})",
                node,
                self.heuristic.estimate(node)
            ),
        }
    }

    fn relax_message(&self, from: &NodeId, to: &NodeId, g: Distance) -> String {
        match self.variant {
            Variant::Dijkstra => format!("Relaxing edge {}->{}. New dist: {}", from, to, g),
            Variant::UniformCost => format!("Updated neighbor {}. New cost: {}", to, g),
            Variant::AStar => format!("Relaxing {}->{}. New g: {}", from, to, g),
            Variant::Greedy => format!(
                "Discovered {}. h: {:.2}",
                to,
                self.heuristic.estimate(to)
            ),
        }
    }

    fn goal_message(&self) -> String {
        match self.variant {
            Variant::UniformCost => format!("Goal {} reached!", self.end),
            _ => format!("Target {} reached!", self.end),
        }
    }

    /// 检查一条出边；产生快照时返回 `Some`
    fn examine(&mut self, current: &NodeId, neighbor: &NodeId, weight: f64) -> Option<Snapshot> {
        self.recorder.comparison();
        let candidate = self.state.distance(current).extend(weight);

        if self.variant == Variant::Greedy {
            if self.discovered.contains(neighbor) {
                return None;
            }
            self.discovered.insert(neighbor.clone());
            self.state.relax(neighbor, candidate, current);
            self.recorder.relaxation();
            let key = self.key(neighbor, candidate);
            self.queue.push(neighbor.clone(), key);
            self.refresh_frontier();
            let message = self.relax_message(current, neighbor, candidate);
            return Some(self.state.snapshot(
                StepKind::Discovered,
                [current.clone(), neighbor.clone()],
                message,
            ));
        }

        if !candidate.improves_on(&self.state.distance(neighbor)) {
            return None;
        }
        self.state.relax(neighbor, candidate, current);
        self.recorder.relaxation();
        let key = self.key(neighbor, candidate);
        self.queue.push(neighbor.clone(), key);
        self.refresh_frontier();
        let message = self.relax_message(current, neighbor, candidate);
        Some(self.state.snapshot(
            StepKind::Relaxing,
            [current.clone(), neighbor.clone()],
            message,
        ))
    }
}

impl Iterator for BestFirstSearch<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Init => {
                    let key = self.key(&self.start, Distance::ZERO);
                    self.queue.push(self.start.clone(), key);
                    self.discovered.insert(self.start.clone());
                    self.refresh_frontier();
                    self.phase = Phase::Pop;
                    let message = self.init_message();
                    return Some(self.state.snapshot(
                        StepKind::Init,
                        [self.start.clone()],
                        message,
                    ));
                }
                Phase::Pop => {
                    let Some((current, _)) = self.queue.pop() else {
                        self.recorder.finish_unreachable();
                        log::debug!("{:?} 队列耗尽，目标 {} 不可达", self.variant, self.end);
                        let message = format!("Target {} unreachable.", self.end);
                        return Some(self.state.snapshot(StepKind::Unreachable, [], message));
                    };
                    if self.state.visited.contains(&current) {
                        self.phase = Phase::Pop;
                        continue;
                    }

                    self.state.visited.insert(current.clone());
                    self.refresh_frontier();
                    let message = self.processing_message(&current);
                    let snapshot =
                        self.state
                            .snapshot(StepKind::Processing, [current.clone()], message);

                    self.phase = if current == self.end {
                        Phase::Goal
                    } else {
                        let edges = self
                            .graph
                            .neighbors(&current)
                            .map(|(n, w)| (n.clone(), w))
                            .collect();
                        Phase::Expand {
                            current,
                            edges,
                            cursor: 0,
                        }
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
                            self.phase = Phase::Expand {
                                current,
                                edges,
                                cursor,
                            };
                            return Some(snapshot);
                        }
                    }
                    self.phase = Phase::Pop;
                }
                Phase::Goal => {
                    let cost = self.state.distance(&self.end);
                    self.recorder.finish_found(cost);
                    log::debug!("{:?} 到达目标 {}，代价 {}", self.variant, self.end, cost);
                    if self.variant != Variant::Greedy {
                        self.state.frontier.clear();
                    }
                    let message = self.goal_message();
                    return Some(self.state.snapshot(StepKind::GoalReached, [], message));
                }
                Phase::Done => return None,
            }
        }
    }
}

impl StepSequence for BestFirstSearch<'_> {
    fn metrics(&self) -> &Metrics {
        self.recorder.metrics()
    }
}
