//! 拓扑排序算法模块
//!
//! 基于入度的 Kahn 算法，同时可入队的节点按节点标识升序输出，保证结果确定

use std::collections::{BTreeSet, HashMap};

use crate::core::GraphError;
use crate::graph::{Graph, NodeId};

/// 拓扑排序算法结构体
pub struct TopologicalSort;

impl TopologicalSort {
    /// 使用Kahn算法（基于入度）进行拓扑排序
    ///
    /// 图中存在环时返回 `GraphError::NotADag`；含边的无向图视为有环
    pub fn sort_kahn(graph: &Graph) -> Result<Vec<NodeId>, GraphError> {
        if !graph.is_directed() && graph.edge_count() > 0 {
            return Err(GraphError::NotADag);
        }

        // 计算入度
        let mut in_degree: HashMap<&NodeId, usize> = graph.nodes().map(|n| (n, 0)).collect();
        for node in graph.nodes() {
            for (neighbor, _) in graph.neighbors(node) {
                *in_degree.entry(neighbor).or_insert(0) += 1;
            }
        }

        let mut ready: BTreeSet<&NodeId> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&node, _)| node)
            .collect();

        let mut result = Vec::with_capacity(graph.node_count());
        while let Some(node) = ready.pop_first() {
            result.push(node.clone());
            for (neighbor, _) in graph.neighbors(node) {
                if let Some(degree) = in_degree.get_mut(neighbor) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(neighbor);
                    }
                }
            }
        }

        // 如果结果中的节点数不等于图中的节点数，说明存在环
        if result.len() != graph.node_count() {
            return Err(GraphError::NotADag);
        }

        Ok(result)
    }
}
