//! 贪心最佳优先搜索模块
//!
//! 只按启发式 h(n) 出队，节点在首次发现时入队并固定父指针。
//! 速度快，但不保证最优。

use super::best_first::{BestFirstSearch, Variant};
use super::heuristic::{Heuristic, HeuristicKind};
use crate::graph::{Graph, NodeId};

/// 贪心最佳优先搜索结构体
pub struct GreedyBestFirst;

impl GreedyBestFirst {
    pub fn steps<'g>(
        graph: &'g Graph,
        start: &NodeId,
        end: &NodeId,
        heuristic: HeuristicKind,
    ) -> BestFirstSearch<'g> {
        BestFirstSearch::new(
            graph,
            start.clone(),
            end.clone(),
            Variant::Greedy,
            Heuristic::new(graph, end, heuristic),
        )
    }
}
