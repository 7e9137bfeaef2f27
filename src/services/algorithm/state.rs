//! 运行状态与快照
//!
//! `RunState` 是一次算法运行独占的可变工作集；`Snapshot` 是它在某一时刻的不可变投影。
//! 快照在产生时深拷贝运行状态，之后对运行状态的任何修改都不会影响已经产生的快照。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::core::Distance;
use crate::graph::{Graph, NodeId};

/// 快照对应的状态迁移类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// 初始化
    Init,
    /// 节点出队开始扩展
    Processing,
    /// 边松弛严格改进了距离
    Relaxing,
    /// 首次发现节点（BFS、贪心）
    Discovered,
    /// Bellman-Ford 新一轮开始
    Epoch,
    /// Floyd-Warshall 采样
    Pivot,
    GoalReached,
    Unreachable,
    /// 运行完成但没有单一目标语义（Floyd-Warshall、Bellman-Ford 提前收敛）
    Completed,
    NegativeCycle,
    NotADag,
}

impl StepKind {
    /// 是否为终止快照
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepKind::GoalReached
                | StepKind::Unreachable
                | StepKind::NegativeCycle
                | StepKind::NotADag
        )
    }
}

/// 算法状态的不可变快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// 在序列中的序号，从 0 开始
    pub step: usize,
    pub kind: StepKind,
    /// 已确定的节点
    pub visited: BTreeSet<NodeId>,
    /// 正在扩展的节点
    pub processing: BTreeSet<NodeId>,
    /// 待处理节点，按出队顺序
    pub frontier: Vec<NodeId>,
    pub distances: BTreeMap<NodeId, Distance>,
    pub parents: BTreeMap<NodeId, Option<NodeId>>,
    /// 双向搜索当前的最优总代价 (mu)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_cost: Option<Distance>,
    pub message: String,
}

impl Snapshot {
    pub fn distance(&self, node: &NodeId) -> Distance {
        self.distances.get(node).copied().unwrap_or_default()
    }

    /// 沿父指针从 `end` 回溯出路径
    ///
    /// 只有当回溯到父指针为 `None` 的根节点、且 `end` 距离有限时才返回路径；
    /// 父指针缺失（如 Floyd-Warshall）或出现环时返回 `None`
    pub fn path_to(&self, end: &NodeId) -> Option<Vec<NodeId>> {
        if !self.distance(end).is_finite() {
            return None;
        }

        let mut path = vec![end.clone()];
        let mut seen: HashSet<&NodeId> = HashSet::new();
        seen.insert(end);
        let mut current = end;

        loop {
            match self.parents.get(current) {
                Some(Some(parent)) => {
                    if !seen.insert(parent) {
                        return None;
                    }
                    path.push(parent.clone());
                    current = parent;
                }
                Some(None) => break,
                None => return None,
            }
        }

        path.reverse();
        Some(path)
    }
}

/// 一次运行的可变工作集
#[derive(Debug, Clone)]
pub struct RunState {
    pub distances: BTreeMap<NodeId, Distance>,
    pub parents: BTreeMap<NodeId, Option<NodeId>>,
    pub visited: BTreeSet<NodeId>,
    pub frontier: Vec<NodeId>,
    pub best_cost: Option<Distance>,
    step: usize,
}

impl RunState {
    /// 所有节点距离为无穷、父指针为空，起点距离为 0
    pub fn new(graph: &Graph, start: &NodeId) -> Self {
        let mut distances: BTreeMap<NodeId, Distance> = graph
            .nodes()
            .map(|n| (n.clone(), Distance::Unreachable))
            .collect();
        distances.insert(start.clone(), Distance::ZERO);
        let parents = graph.nodes().map(|n| (n.clone(), None)).collect();

        Self {
            distances,
            parents,
            visited: BTreeSet::new(),
            frontier: Vec::new(),
            best_cost: None,
            step: 0,
        }
    }

    /// 不跟踪父指针的状态（全源矩阵算法）
    pub fn without_parents(graph: &Graph, start: &NodeId) -> Self {
        let mut state = Self::new(graph, start);
        state.parents.clear();
        state
    }

    pub fn distance(&self, node: &NodeId) -> Distance {
        self.distances.get(node).copied().unwrap_or_default()
    }

    /// 记录一次严格改进
    pub fn relax(&mut self, node: &NodeId, distance: Distance, parent: &NodeId) {
        self.distances.insert(node.clone(), distance);
        self.parents.insert(node.clone(), Some(parent.clone()));
    }

    /// 深拷贝当前状态，产生一个快照
    pub fn snapshot<I>(&mut self, kind: StepKind, processing: I, message: String) -> Snapshot
    where
        I: IntoIterator<Item = NodeId>,
    {
        let snapshot = Snapshot {
            step: self.step,
            kind,
            visited: self.visited.clone(),
            processing: processing.into_iter().collect(),
            frontier: self.frontier.clone(),
            distances: self.distances.clone(),
            parents: self.parents.clone(),
            best_cost: self.best_cost,
            message,
        };
        self.step += 1;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_chain() -> Graph {
        let mut graph = Graph::directed();
        graph.add_edge("A", "B", 1.0);
        graph.add_edge("B", "C", 2.0);
        graph.add_node("D");
        graph
    }

    #[test]
    fn test_new_state() {
        let graph = create_chain();
        let state = RunState::new(&graph, &"A".into());
        assert_eq!(state.distance(&"A".into()), Distance::ZERO);
        assert!(state.distance(&"D".into()).is_unreachable());
        assert_eq!(state.parents.len(), 4);
        assert!(state.parents.values().all(|p| p.is_none()));
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let graph = create_chain();
        let mut state = RunState::new(&graph, &"A".into());
        let before = state.snapshot(StepKind::Init, vec!["A".into()], "init".to_string());

        state.relax(&"B".into(), Distance::Finite(1.0), &"A".into());
        state.visited.insert("A".into());
        let after = state.snapshot(StepKind::Relaxing, vec![], "relax".to_string());

        assert!(before.distance(&"B".into()).is_unreachable());
        assert_eq!(before.parents.get(&NodeId::from("B")), Some(&None));
        assert!(before.visited.is_empty());
        assert_eq!(after.distance(&"B".into()), Distance::Finite(1.0));
        assert_eq!(before.step, 0);
        assert_eq!(after.step, 1);
    }

    #[test]
    fn test_path_to() {
        let graph = create_chain();
        let mut state = RunState::new(&graph, &"A".into());
        state.relax(&"B".into(), Distance::Finite(1.0), &"A".into());
        state.relax(&"C".into(), Distance::Finite(3.0), &"B".into());
        let snapshot = state.snapshot(StepKind::GoalReached, vec![], String::new());

        assert_eq!(
            snapshot.path_to(&"C".into()),
            Some(vec!["A".into(), "B".into(), "C".into()])
        );
        assert_eq!(snapshot.path_to(&"A".into()), Some(vec!["A".into()]));
        assert_eq!(snapshot.path_to(&"D".into()), None);
    }

    #[test]
    fn test_path_to_guards_cycles_and_missing_parents() {
        let graph = create_chain();
        let mut state = RunState::new(&graph, &"A".into());
        state.relax(&"B".into(), Distance::Finite(1.0), &"C".into());
        state.relax(&"C".into(), Distance::Finite(1.0), &"B".into());
        let snapshot = state.snapshot(StepKind::NegativeCycle, vec![], String::new());
        assert_eq!(snapshot.path_to(&"C".into()), None);

        let mut matrix_state = RunState::without_parents(&graph, &"A".into());
        matrix_state.distances.insert("C".into(), Distance::Finite(3.0));
        let snapshot = matrix_state.snapshot(StepKind::Completed, vec![], String::new());
        assert_eq!(snapshot.path_to(&"C".into()), None);
    }

    #[test]
    fn test_snapshot_json_uses_sentinel() {
        let graph = create_chain();
        let mut state = RunState::new(&graph, &"A".into());
        let snapshot = state.snapshot(StepKind::Init, vec!["A".into()], "init".to_string());
        let json = serde_json::to_value(&snapshot).expect("Snapshot should serialize in test");
        assert_eq!(json["distances"]["D"], "inf");
        assert_eq!(json["distances"]["A"], 0.0);
        assert_eq!(json["kind"], "init");
    }
}
