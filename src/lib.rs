//! PathViz - 逐步执行的最短路径算法引擎
//!
//! 把经典最短路径算法改写为惰性的快照序列，每个状态迁移都暴露访问集、前沿、
//! 暂定距离与父指针，并记录与算法无关的度量，供可视化与横向对比使用。
//!
//! ```
//! use pathviz::graph::Graph;
//! use pathviz::services::Algorithm;
//!
//! let mut graph = Graph::directed();
//! graph.add_edge("A", "B", 4.0);
//! graph.add_edge("A", "C", 1.0);
//! graph.add_edge("C", "B", 2.0);
//!
//! let report = Algorithm::Dijkstra
//!     .run(&graph, &"A".into(), &"B".into())
//!     .expect("endpoints exist")
//!     .into_report();
//! assert_eq!(report.metrics.final_cost.value(), 3.0);
//! ```

pub mod config;
pub mod core;
pub mod graph;
pub mod services;
pub mod utils;
