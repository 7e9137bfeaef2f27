//! A*算法模块
//!
//! 按 f(n) = g(n) + h(n) 出队。启发式可采纳时结果与 Dijkstra 一致，
//! 但通常扩展更少的节点。

use super::best_first::{BestFirstSearch, Variant};
use super::heuristic::{Heuristic, HeuristicKind};
use crate::graph::{Graph, NodeId};

/// A*算法结构体
pub struct AStar;

impl AStar {
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
            Variant::AStar,
            Heuristic::new(graph, end, heuristic),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Distance;
    use crate::graph::{builders, WeightRange};
    use crate::services::algorithm::dijkstra::Dijkstra;
    use crate::services::algorithm::fixtures::*;
    use crate::services::algorithm::{Snapshot, StepKind, StepSequence};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_grid() -> Graph {
        builders::grid(&mut StdRng::seed_from_u64(1), 5, 5, WeightRange::unit())
            .expect("Grid should build in test")
    }

    #[test]
    fn test_without_positions_matches_dijkstra() {
        let graph = create_classic_graph();
        let mut run = AStar::steps(&graph, &"A".into(), &"E".into(), HeuristicKind::Auto);
        let snapshots: Vec<Snapshot> = run.by_ref().collect();

        assert_eq!(last(&snapshots).kind, StepKind::GoalReached);
        assert_eq!(run.metrics().final_cost, Distance::Finite(11.0));
        assert_eq!(
            last(&snapshots).path_to(&"E".into()),
            Some(ids(&["A", "B", "D", "E"]))
        );
    }

    #[test]
    fn test_grid_expands_fewer_nodes() {
        let graph = create_grid();
        let start = NodeId::from(0usize);
        let end = NodeId::from(24usize);

        let mut astar = AStar::steps(&graph, &start, &end, HeuristicKind::Manhattan);
        let astar_steps: Vec<Snapshot> = astar.by_ref().collect();
        let mut dijkstra = Dijkstra::steps(&graph, &start, &end);
        let dijkstra_steps: Vec<Snapshot> = dijkstra.by_ref().collect();

        assert_eq!(astar.metrics().final_cost, Distance::Finite(8.0));
        assert_eq!(astar.metrics().final_cost, dijkstra.metrics().final_cost);
        assert!(last(&astar_steps).visited.len() <= last(&dijkstra_steps).visited.len());
        let path = last(&astar_steps).path_to(&end).expect("Path should exist in test");
        assert_eq!(path.len(), 9);
    }

    #[test]
    fn test_init_message_reports_heuristic() {
        let graph = create_grid();
        let snapshots: Vec<Snapshot> = AStar::steps(
            &graph,
            &NodeId::from(0usize),
            &NodeId::from(24usize),
            HeuristicKind::Manhattan,
        )
        .collect();
        assert_eq!(snapshots[0].message, "Initialized A*. h(start)=8.00");
    }
}
