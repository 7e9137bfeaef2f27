//! 展示分类
//!
//! 给定一个快照，把每个节点归入唯一的展示类别。优先级固定：
//! 正在处理 > 最终路径 > 前沿 > 已访问 > 默认。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::{Graph, NodeId};
use crate::services::algorithm::Snapshot;

/// 节点展示类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Processing,
    Path,
    Frontier,
    Visited,
    Default,
}

impl NodeCategory {
    /// 展示颜色
    pub fn color(&self) -> &'static str {
        match self {
            NodeCategory::Processing => "#4B4BFF",
            NodeCategory::Path => "#00CC00",
            NodeCategory::Frontier => "#FFD700",
            NodeCategory::Visited => "#FF4B4B",
            NodeCategory::Default => "#E0E0E0",
        }
    }
}

/// 按优先级为单个节点分类
pub fn classify(snapshot: &Snapshot, path: Option<&[NodeId]>, node: &NodeId) -> NodeCategory {
    if snapshot.processing.contains(node) {
        NodeCategory::Processing
    } else if path.is_some_and(|p| p.contains(node)) {
        NodeCategory::Path
    } else if snapshot.frontier.contains(node) {
        NodeCategory::Frontier
    } else if snapshot.visited.contains(node) {
        NodeCategory::Visited
    } else {
        NodeCategory::Default
    }
}

/// 为图中每个节点分类
pub fn classify_all(
    graph: &Graph,
    snapshot: &Snapshot,
    path: Option<&[NodeId]>,
) -> BTreeMap<NodeId, NodeCategory> {
    graph
        .nodes()
        .map(|node| (node.clone(), classify(snapshot, path, node)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::algorithm::{RunState, StepKind};

    fn create_snapshot(graph: &Graph) -> Snapshot {
        let mut state = RunState::new(graph, &"A".into());
        state.visited.extend(["A", "B", "C"].map(NodeId::from));
        state.frontier = vec!["C".into(), "D".into()];
        state.snapshot(StepKind::Processing, vec![NodeId::from("B")], String::new())
    }

    fn create_graph() -> Graph {
        let mut graph = Graph::directed();
        for (u, v) in [("A", "B"), ("B", "C"), ("C", "D")] {
            graph.add_edge(u, v, 1.0);
        }
        graph.add_node("E");
        graph
    }

    #[test]
    fn test_precedence() {
        let graph = create_graph();
        let snapshot = create_snapshot(&graph);
        let path: Vec<NodeId> = vec!["A".into(), "B".into(), "C".into()];
        let path = Some(path.as_slice());

        // 同时在路径和已访问中的节点显示为路径
        assert_eq!(classify(&snapshot, path, &"A".into()), NodeCategory::Path);
        // 正在处理优先于路径
        assert_eq!(classify(&snapshot, path, &"B".into()), NodeCategory::Processing);
        // 路径优先于前沿
        assert_eq!(classify(&snapshot, path, &"C".into()), NodeCategory::Path);
        assert_eq!(classify(&snapshot, path, &"D".into()), NodeCategory::Frontier);
        assert_eq!(classify(&snapshot, path, &"E".into()), NodeCategory::Default);
    }

    #[test]
    fn test_colors() {
        assert_eq!(NodeCategory::Processing.color(), "#4B4BFF");
        assert_eq!(NodeCategory::Path.color(), "#00CC00");
        assert_eq!(NodeCategory::Frontier.color(), "#FFD700");
        assert_eq!(NodeCategory::Visited.color(), "#FF4B4B");
        assert_eq!(NodeCategory::Default.color(), "#E0E0E0");
    }

    #[test]
    fn test_without_path() {
        let graph = create_graph();
        let snapshot = create_snapshot(&graph);
        let categories = classify_all(&graph, &snapshot, None);

        assert_eq!(categories.len(), graph.node_count());
        assert_eq!(categories[&NodeId::from("A")], NodeCategory::Visited);
        assert_eq!(categories[&NodeId::from("C")], NodeCategory::Frontier);
        assert_eq!(categories[&NodeId::from("E")], NodeCategory::Default);
    }
}
