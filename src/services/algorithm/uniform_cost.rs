//! 一致代价搜索模块
//!
//! 与 Dijkstra 使用相同的引擎，距离、度量与出队顺序完全一致，只是消息措辞不同

use super::best_first::{BestFirstSearch, Variant};
use super::heuristic::{Heuristic, HeuristicKind};
use crate::graph::{Graph, NodeId};

/// 一致代价搜索结构体
pub struct UniformCost;

impl UniformCost {
    pub fn steps<'g>(graph: &'g Graph, start: &NodeId, end: &NodeId) -> BestFirstSearch<'g> {
        BestFirstSearch::new(
            graph,
            start.clone(),
            end.clone(),
            Variant::UniformCost,
            Heuristic::new(graph, end, HeuristicKind::Zero),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::algorithm::dijkstra::Dijkstra;
    use crate::services::algorithm::fixtures::*;
    use crate::services::algorithm::{Snapshot, StepSequence};

    #[test]
    fn test_matches_dijkstra() {
        let graph = create_classic_graph();
        let mut ucs = UniformCost::steps(&graph, &"A".into(), &"E".into());
        let mut dijkstra = Dijkstra::steps(&graph, &"A".into(), &"E".into());
        let ucs_steps: Vec<Snapshot> = ucs.by_ref().collect();
        let dijkstra_steps: Vec<Snapshot> = dijkstra.by_ref().collect();

        assert_eq!(ucs_steps.len(), dijkstra_steps.len());
        for (a, b) in ucs_steps.iter().zip(&dijkstra_steps) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.distances, b.distances);
            assert_eq!(a.parents, b.parents);
            assert_eq!(a.frontier, b.frontier);
        }
        assert_eq!(ucs.metrics().comparisons, dijkstra.metrics().comparisons);
        assert_eq!(ucs.metrics().relaxations, dijkstra.metrics().relaxations);
        assert_eq!(ucs.metrics().final_cost, dijkstra.metrics().final_cost);
    }

    #[test]
    fn test_messages() {
        let graph = create_classic_graph();
        let snapshots: Vec<Snapshot> = UniformCost::steps(&graph, &"A".into(), &"E".into()).collect();
        assert_eq!(snapshots[0].message, "Initialized UCS. Start: A");
        assert_eq!(last(&snapshots).message, "Goal E reached!");
    }
}
