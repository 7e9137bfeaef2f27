//! 单元测试共用的图

use crate::graph::{Graph, NodeId};
use crate::services::algorithm::{Snapshot, StepKind};

/// 经典示例图：A→E 最短路径为 A-B-D-E，代价 11
pub fn create_classic_graph() -> Graph {
    let mut graph = Graph::directed();
    graph.add_edge("A", "B", 4.0);
    graph.add_edge("A", "C", 2.0);
    graph.add_edge("B", "C", 1.0);
    graph.add_edge("B", "D", 5.0);
    graph.add_edge("C", "D", 8.0);
    graph.add_edge("C", "E", 10.0);
    graph.add_edge("D", "E", 2.0);
    graph
}

/// A↔B 构成负权环
pub fn create_negative_cycle_graph() -> Graph {
    let mut graph = Graph::directed();
    graph.add_edge("A", "B", 1.0);
    graph.add_edge("B", "A", -2.0);
    graph
}

/// 含负权边但没有负权环的 DAG：A→C 最短为 A-B-C，代价 -1
pub fn create_negative_edge_dag() -> Graph {
    let mut graph = Graph::directed();
    graph.add_edge("A", "B", 2.0);
    graph.add_edge("B", "C", -3.0);
    graph.add_edge("A", "C", 1.0);
    graph
}

/// 两个互不连通的分量
pub fn create_disconnected_graph() -> Graph {
    let mut graph = Graph::directed();
    graph.add_edge("A", "B", 1.0);
    graph.add_edge("C", "D", 1.0);
    graph
}

pub fn ids(names: &[&str]) -> Vec<NodeId> {
    names.iter().map(|n| NodeId::from(*n)).collect()
}

pub fn last(snapshots: &[Snapshot]) -> &Snapshot {
    snapshots.last().expect("Run should emit at least one snapshot in test")
}

pub fn kinds(snapshots: &[Snapshot]) -> Vec<StepKind> {
    snapshots.iter().map(|s| s.kind).collect()
}
