//! Dijkstra算法模块
//!
//! 单源最短路径，要求边权非负。按 g(n) 从小到大出队，
//! 目标节点出队时结束；队列耗尽仍未到达目标则目标不可达。

use super::best_first::{BestFirstSearch, Variant};
use super::heuristic::{Heuristic, HeuristicKind};
use crate::graph::{Graph, NodeId};

/// Dijkstra算法结构体
pub struct Dijkstra;

impl Dijkstra {
    /// 创建逐步执行的 Dijkstra 搜索
    pub fn steps<'g>(graph: &'g Graph, start: &NodeId, end: &NodeId) -> BestFirstSearch<'g> {
        BestFirstSearch::new(
            graph,
            start.clone(),
            end.clone(),
            Variant::Dijkstra,
            Heuristic::new(graph, end, HeuristicKind::Zero),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Distance;
    use crate::services::algorithm::fixtures::*;
    use crate::services::algorithm::{Snapshot, StepKind, StepSequence};
    use crate::services::metrics::Outcome;

    #[test]
    fn test_classic_shortest_path() {
        let graph = create_classic_graph();
        let snapshots: Vec<Snapshot> = Dijkstra::steps(&graph, &"A".into(), &"E".into()).collect();

        let final_snapshot = last(&snapshots);
        assert_eq!(final_snapshot.kind, StepKind::GoalReached);
        assert_eq!(final_snapshot.distance(&"E".into()), Distance::Finite(11.0));
        assert_eq!(
            final_snapshot.path_to(&"E".into()),
            Some(ids(&["A", "B", "D", "E"]))
        );
        assert!(final_snapshot.processing.is_empty());
        assert!(final_snapshot.frontier.is_empty());
    }

    #[test]
    fn test_step_sequence_and_metrics() {
        let graph = create_classic_graph();
        let mut run = Dijkstra::steps(&graph, &"A".into(), &"E".into());
        let snapshots: Vec<Snapshot> = run.by_ref().collect();

        assert_eq!(snapshots.len(), 13);
        for (i, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(snapshot.step, i);
        }
        assert_eq!(snapshots[0].kind, StepKind::Init);
        assert_eq!(snapshots[0].frontier, ids(&["A"]));
        assert_eq!(snapshots[1].kind, StepKind::Processing);
        assert_eq!(snapshots[1].message, "Processing node A (dist: 0)");
        assert_eq!(snapshots[3].kind, StepKind::Relaxing);
        assert_eq!(snapshots[3].frontier, ids(&["C", "B"]));
        assert_eq!(snapshots[3].message, "Relaxing edge A->C. New dist: 2");

        let metrics = run.metrics();
        assert_eq!(metrics.comparisons, 7);
        assert_eq!(metrics.relaxations, 6);
        assert_eq!(metrics.final_cost, Distance::Finite(11.0));
        assert!(metrics.path_found);
        assert_eq!(metrics.outcome, Outcome::GoalReached);
        assert!(run.next().is_none());
    }

    #[test]
    fn test_start_equals_end() {
        let graph = create_classic_graph();
        let mut run = Dijkstra::steps(&graph, &"C".into(), &"C".into());
        let snapshots: Vec<Snapshot> = run.by_ref().collect();

        assert_eq!(kinds(&snapshots), vec![StepKind::Init, StepKind::Processing, StepKind::GoalReached]);
        assert_eq!(run.metrics().final_cost, Distance::ZERO);
        assert_eq!(last(&snapshots).path_to(&"C".into()), Some(ids(&["C"])));
    }

    #[test]
    fn test_unreachable_target() {
        let graph = create_disconnected_graph();
        let mut run = Dijkstra::steps(&graph, &"A".into(), &"D".into());
        let snapshots: Vec<Snapshot> = run.by_ref().collect();

        let final_snapshot = last(&snapshots);
        assert_eq!(final_snapshot.kind, StepKind::Unreachable);
        assert!(final_snapshot.distance(&"D".into()).is_unreachable());
        assert_eq!(final_snapshot.path_to(&"D".into()), None);
        assert!(!run.metrics().path_found);
        assert!(run.metrics().final_cost.is_unreachable());
    }

    #[test]
    fn test_visited_grows_monotonically() {
        let graph = create_classic_graph();
        let snapshots: Vec<Snapshot> = Dijkstra::steps(&graph, &"A".into(), &"E".into()).collect();
        for pair in snapshots.windows(2) {
            assert!(pair[0].visited.is_subset(&pair[1].visited));
        }
    }

    #[test]
    fn test_runs_are_deterministic() {
        let graph = create_classic_graph();
        let first: Vec<Snapshot> = Dijkstra::steps(&graph, &"A".into(), &"E".into()).collect();
        let second: Vec<Snapshot> = Dijkstra::steps(&graph, &"A".into(), &"E".into()).collect();
        let strip = |s: &[Snapshot]| {
            s.iter()
                .map(|x| (x.kind, x.frontier.clone(), x.distances.clone(), x.message.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(&first), strip(&second));
    }
}
