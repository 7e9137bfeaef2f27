//! 集成测试共享工具模块
//!
//! 提供固定示例图与可复现的随机图

#![allow(dead_code)]

use pathviz::graph::{builders, Graph, NodeId, WeightRange};
use pathviz::services::{Algorithm, RunReport};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 经典示例图：A→E 最短路径为 A-B-D-E，代价 11
pub fn classic_graph() -> Graph {
    let mut graph = Graph::directed();
    for (u, v, w) in [
        ("A", "B", 4.0),
        ("A", "C", 2.0),
        ("B", "C", 1.0),
        ("B", "D", 5.0),
        ("C", "D", 8.0),
        ("C", "E", 10.0),
        ("D", "E", 2.0),
    ] {
        graph.add_edge(u, v, w);
    }
    graph
}

/// 单边负权环 A→B(1), B→A(-2)
pub fn negative_cycle_graph() -> Graph {
    let mut graph = Graph::directed();
    graph.add_edge("A", "B", 1.0);
    graph.add_edge("B", "A", -2.0);
    graph
}

/// 负权环不在起点到终点的路径上，但可从起点到达
pub fn negative_cycle_off_path_graph() -> Graph {
    let mut graph = Graph::directed();
    graph.add_edge("s", "t", 1.0);
    graph.add_edge("s", "c1", 1.0);
    graph.add_edge("c1", "c2", -5.0);
    graph.add_edge("c2", "c1", 1.0);
    graph
}

/// 起点与终点分属两个分量
pub fn disconnected_graph() -> Graph {
    let mut graph = Graph::directed();
    graph.add_edge("A", "B", 1.0);
    graph.add_edge("C", "D", 1.0);
    graph
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn weighted_graph(seed: u64) -> Graph {
    builders::erdos_renyi(&mut rng(seed), 14, 0.25, WeightRange::default())
        .expect("Graph should build in test")
}

pub fn dag(seed: u64) -> Graph {
    builders::random_dag(&mut rng(seed), 14, 0.3, WeightRange::default())
        .expect("Graph should build in test")
}

pub fn negative_dag(seed: u64) -> Graph {
    builders::negative_edge_dag(&mut rng(seed), 14, 0.3, -5, 10)
        .expect("Graph should build in test")
}

pub fn unit_graph(seed: u64) -> Graph {
    builders::equal_weight(&mut rng(seed), 14, 0.25).expect("Graph should build in test")
}

pub fn grid_graph(seed: u64) -> Graph {
    builders::grid(&mut rng(seed), 4, 5, WeightRange::default())
        .expect("Graph should build in test")
}

pub fn report(algorithm: Algorithm, graph: &Graph, start: &NodeId, end: &NodeId) -> RunReport {
    algorithm
        .run(graph, start, end)
        .expect("Run should start in test")
        .into_report()
}

pub fn node(id: usize) -> NodeId {
    NodeId::from(id)
}

pub fn ids(names: &[&str]) -> Vec<NodeId> {
    names.iter().map(|n| NodeId::from(*n)).collect()
}
