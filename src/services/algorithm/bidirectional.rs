//! 双向 Dijkstra 模块
//!
//! 正向搜索从起点出发遍历原图，反向搜索从终点出发遍历反向图（无向图即原图）。
//! 每一轮先走一步正向、再走一步反向。`mu` 记录经过两侧都已标号的节点的最优总代价，
//! 每次出队或检查边时都会更新；当两个队首之和不小于 `mu` 时停止。

use std::borrow::Cow;
use std::collections::BTreeSet;

use super::queue::PriorityFrontier;
use super::state::{RunState, Snapshot, StepKind};
use super::StepSequence;
use crate::core::Distance;
use crate::graph::{Graph, NodeId};
use crate::services::metrics::{Metrics, MetricsRecorder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn label(&self) -> &'static str {
        match self {
            Direction::Forward => "Forward",
            Direction::Backward => "Backward",
        }
    }
}

#[derive(Debug)]
enum Phase {
    Init,
    Check,
    Pop(Direction),
    Expand {
        direction: Direction,
        current: NodeId,
        edges: Vec<(NodeId, f64)>,
        cursor: usize,
    },
    Finish,
    Done,
}

/// 单侧搜索的状态
struct Side {
    run: RunState,
    queue: PriorityFrontier,
}

impl Side {
    fn new(graph: &Graph, root: &NodeId) -> Self {
        let mut queue = PriorityFrontier::new();
        queue.push(root.clone(), 0.0);
        Self {
            run: RunState::new(graph, root),
            queue,
        }
    }

    fn pending(&self) -> Vec<NodeId> {
        let visited = &self.run.visited;
        self.queue.pending(|n| !visited.contains(n))
    }
}

/// 双向 Dijkstra 结构体
pub struct Bidirectional<'g> {
    graph: &'g Graph,
    reversed: Cow<'g, Graph>,
    start: NodeId,
    end: NodeId,
    forward: Side,
    backward: Side,
    /// 当前最优总代价
    mu: f64,
    meeting: Option<NodeId>,
    recorder: MetricsRecorder,
    phase: Phase,
}

impl<'g> Bidirectional<'g> {
    pub fn steps(graph: &'g Graph, start: &NodeId, end: &NodeId) -> Self {
        let reversed = if graph.is_directed() {
            Cow::Owned(graph.reversed())
        } else {
            Cow::Borrowed(graph)
        };
        Self {
            graph,
            reversed,
            start: start.clone(),
            end: end.clone(),
            forward: Side::new(graph, start),
            backward: Side::new(graph, end),
            mu: f64::INFINITY,
            meeting: None,
            recorder: MetricsRecorder::start(),
            phase: Phase::Init,
        }
    }

    fn side(&self, direction: Direction) -> &Side {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }

    fn side_mut(&mut self, direction: Direction) -> &mut Side {
        match direction {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
        }
    }

    /// 一侧走完之后的下一个阶段
    fn after(direction: Direction) -> Phase {
        match direction {
            Direction::Forward => Phase::Pop(Direction::Backward),
            Direction::Backward => Phase::Check,
        }
    }

    /// 节点在两侧都有有限标号时尝试更新 mu
    fn meet_at(&mut self, node: &NodeId) {
        let total =
            self.forward.run.distance(node).value() + self.backward.run.distance(node).value();
        if total.is_finite() && total < self.mu {
            self.mu = total;
            self.meeting = Some(node.clone());
        }
    }

    /// 以正向状态为底，合并两侧的已访问集合与前沿产生快照
    fn emit<I>(&mut self, kind: StepKind, processing: I, message: String) -> Snapshot
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut frontier = self.forward.pending();
        for node in self.backward.pending() {
            if !frontier.contains(&node) {
                frontier.push(node);
            }
        }
        let union: BTreeSet<NodeId> = self
            .forward
            .run
            .visited
            .union(&self.backward.run.visited)
            .cloned()
            .collect();

        let own_visited = std::mem::replace(&mut self.forward.run.visited, union);
        self.forward.run.frontier = frontier;
        self.forward.run.best_cost = Some(Distance::from_f64(self.mu));
        let snapshot = self.forward.run.snapshot(kind, processing, message);
        self.forward.run.visited = own_visited;
        snapshot
    }

    /// 沿反向搜索的父指针把相遇点之后的路径接到正向状态上
    fn stitch(&mut self) {
        let Some(meeting) = self.meeting.clone() else {
            return;
        };
        let mut current = meeting;
        while let Some(Some(next)) = self.backward.run.parents.get(&current).cloned() {
            let remaining = self.backward.run.distance(&next).value();
            let distance = Distance::from_f64(self.mu - remaining);
            self.forward.run.relax(&next, distance, &current);
            current = next;
        }
    }

    fn finish(&mut self) -> Snapshot {
        if self.mu.is_finite() {
            self.stitch();
            let cost = Distance::from_f64(self.mu);
            self.recorder.finish_found(cost);
            log::debug!(
                "双向 Dijkstra 完成，代价 {}，相遇节点 {:?}",
                cost,
                self.meeting
            );
            let message = format!("Optimal path found with cost {}", cost);
            let mut snapshot = self.emit(StepKind::GoalReached, [], message);
            snapshot.frontier.clear();
            snapshot
        } else {
            self.recorder.finish_unreachable();
            log::debug!("双向 Dijkstra 完成，{} 不可达", self.end);
            let message = format!("Target {} unreachable.", self.end);
            self.emit(StepKind::Unreachable, [], message)
        }
    }

    fn examine(
        &mut self,
        direction: Direction,
        current: &NodeId,
        neighbor: &NodeId,
        weight: f64,
    ) -> Option<Snapshot> {
        self.recorder.comparison();
        let side = self.side(direction);
        let candidate = side.run.distance(current).extend(weight);
        if !candidate.improves_on(&side.run.distance(neighbor)) {
            self.meet_at(neighbor);
            return None;
        }

        let side = self.side_mut(direction);
        side.run.relax(neighbor, candidate, current);
        side.queue.push(neighbor.clone(), candidate.value());
        self.recorder.relaxation();
        self.meet_at(neighbor);

        // 反向搜索沿反向边前进，消息中按原图方向展示
        let (from, to) = match direction {
            Direction::Forward => (current, neighbor),
            Direction::Backward => (neighbor, current),
        };
        let message = format!(
            "{}: Relaxing {}->{}. New dist: {}",
            direction.label(),
            from,
            to,
            candidate
        );
        Some(self.emit(
            StepKind::Relaxing,
            [current.clone(), neighbor.clone()],
            message,
        ))
    }
}

impl Iterator for Bidirectional<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Init => {
                    self.phase = Phase::Check;
                    let message = format!(
                        "Initialized Bidirectional Dijkstra. Start: {}, target: {}",
                        self.start, self.end
                    );
                    let processing = [self.start.clone(), self.end.clone()];
                    return Some(self.emit(StepKind::Init, processing, message));
                }
                Phase::Check => {
                    let (Some(f_top), Some(b_top)) =
                        (self.forward.queue.peek_key(), self.backward.queue.peek_key())
                    else {
                        self.phase = Phase::Finish;
                        continue;
                    };
                    self.phase = if f_top + b_top >= self.mu {
                        Phase::Finish
                    } else {
                        Phase::Pop(Direction::Forward)
                    };
                }
                Phase::Pop(direction) => {
                    let Some((current, _)) = self.side_mut(direction).queue.pop() else {
                        self.phase = Self::after(direction);
                        continue;
                    };
                    if !self.side_mut(direction).run.visited.insert(current.clone()) {
                        self.phase = Self::after(direction);
                        continue;
                    }
                    self.meet_at(&current);

                    let graph: &Graph = match direction {
                        Direction::Forward => self.graph,
                        Direction::Backward => &*self.reversed,
                    };
                    let edges = graph
                        .neighbors(&current)
                        .map(|(n, w)| (n.clone(), w))
                        .collect();
                    let message = format!("{}: Processing {}", direction.label(), current);
                    let snapshot = self.emit(StepKind::Processing, [current.clone()], message);
                    self.phase = Phase::Expand {
                        direction,
                        current,
                        edges,
                        cursor: 0,
                    };
                    return Some(snapshot);
                }
                Phase::Expand {
                    direction,
                    current,
                    edges,
                    mut cursor,
                } => {
                    while cursor < edges.len() {
                        let (neighbor, weight) = &edges[cursor];
                        cursor += 1;
                        if let Some(snapshot) = self.examine(direction, &current, neighbor, *weight) {
                            self.phase = Phase::Expand {
                                direction,
                                current,
                                edges,
                                cursor,
                            };
                            return Some(snapshot);
                        }
                    }
                    self.phase = Self::after(direction);
                }
                Phase::Finish => return Some(self.finish()),
                Phase::Done => return None,
            }
        }
    }
}

impl StepSequence for Bidirectional<'_> {
    fn metrics(&self) -> &Metrics {
        self.recorder.metrics()
    }
}
