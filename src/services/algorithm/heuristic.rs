//! 启发式函数
//!
//! 基于节点坐标估计到目标的代价。没有坐标的节点（或目标没有坐标）估计为 0，
//! 此时 A* 退化为 Dijkstra。

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId, Position};

/// 启发式种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// 图带坐标时使用曼哈顿距离，否则为 0
    #[default]
    Auto,
    Manhattan,
    Euclidean,
    Zero,
}

/// 绑定到某个目标节点的启发式
#[derive(Debug, Clone)]
pub struct Heuristic<'g> {
    graph: &'g Graph,
    goal: Option<Position>,
    kind: HeuristicKind,
}

impl<'g> Heuristic<'g> {
    pub fn new(graph: &'g Graph, goal: &NodeId, kind: HeuristicKind) -> Self {
        let kind = match kind {
            HeuristicKind::Auto if graph.has_positions() => HeuristicKind::Manhattan,
            HeuristicKind::Auto => HeuristicKind::Zero,
            other => other,
        };
        Self {
            graph,
            goal: graph.position(goal),
            kind,
        }
    }

    /// 实际使用的启发式（`Auto` 已解析）
    pub fn kind(&self) -> HeuristicKind {
        self.kind
    }

    pub fn estimate(&self, node: &NodeId) -> f64 {
        let (Some(goal), Some(pos)) = (self.goal, self.graph.position(node)) else {
            return 0.0;
        };
        match self.kind {
            HeuristicKind::Manhattan => pos.manhattan(&goal),
            HeuristicKind::Euclidean => pos.euclidean(&goal),
            HeuristicKind::Auto | HeuristicKind::Zero => 0.0,
        }
    }
}
