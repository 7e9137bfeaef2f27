//! 批量对比集成测试
//!
//! 测试范围：
//! - 对比表覆盖所有算法
//! - 配置文件驱动的批量任务
//! - 预算与失败统计

mod common;

use common::*;
use pathviz::config::{BatchConfig, Config, GeneratorConfig};
use pathviz::graph::BuilderKind;
use pathviz::services::algorithm::RunOptions;
use pathviz::services::{compare, Algorithm, BatchRunner};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_compare_all_algorithms() {
    let graph = classic_graph();
    let rows = compare(
        &graph,
        &"A".into(),
        &"E".into(),
        &Algorithm::ALL,
        &RunOptions::default(),
    );

    assert_eq!(rows.len(), Algorithm::ALL.len());
    for row in &rows {
        assert!(row.error.is_none(), "{}", row.algorithm);
        assert!(row.snapshots > 0);
        let summary = row.summary.as_ref().expect("Summary should exist in test");
        assert_eq!(summary.path_found, "✅", "{}", row.algorithm);
    }

    let json = serde_json::to_value(&rows).expect("Rows should serialize in test");
    assert_eq!(json[0]["algorithm"], "dijkstra");
    assert_eq!(json[0]["summary"]["Final Cost"], "11");
}

#[test]
fn test_compare_negative_cycle_row() {
    let graph = negative_cycle_graph();
    let rows = compare(
        &graph,
        &"A".into(),
        &"B".into(),
        &[Algorithm::BellmanFord, Algorithm::Spfa, Algorithm::DagShortest],
        &RunOptions::default(),
    );
    for row in rows {
        let summary = row.summary.expect("Summary should exist in test");
        assert_eq!(summary.final_cost, "∞");
        assert_eq!(summary.path_found, "❌");
        assert_eq!(row.path, None);
    }
}

#[test]
fn test_batch_from_config_file() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    temp_file
        .write_all(
            br#"
[batch]
num_graphs = 4
algorithms = ["dijkstra", "ucs", "astar", "spfa", "floyd-warshall"]

[generator]
builder = "connected_random"
num_nodes = 15
density = 0.2
directed = true
"#,
        )
        .expect("Failed to write TOML content to temporary file");

    let config = Config::load(temp_file.path()).expect("Failed to load config");
    let runner = BatchRunner::new(
        config.batch.clone(),
        config.generator.clone(),
        RunOptions {
            heuristic: config.search.heuristic,
        },
    );
    let report = runner.run(&mut rng(99)).expect("Batch should run in test");

    assert_eq!(report.graphs_requested, 4);
    assert_eq!(report.graphs_run + report.graphs_skipped, 4);
    assert_eq!(report.stats.len(), 5);
    for stats in &report.stats {
        assert_eq!(stats.runs, report.graphs_run);
        assert_eq!(stats.successes, report.graphs_run, "{}", stats.algorithm);
        assert_eq!(stats.suboptimal, 0, "{}", stats.algorithm);
        assert_eq!(stats.failures, 0);
    }

    // 同一配置不同算法在成功运行上的平均代价一致
    let costs: Vec<Option<f64>> = report.stats.iter().map(|s| s.avg_cost).collect();
    assert!(costs.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_batch_is_reproducible() {
    let runner = BatchRunner::new(
        BatchConfig {
            num_graphs: 3,
            algorithms: vec![Algorithm::Dijkstra, Algorithm::Bfs],
            ..BatchConfig::default()
        },
        GeneratorConfig {
            builder: BuilderKind::ErdosRenyi,
            num_nodes: 12,
            density: 0.2,
            ..GeneratorConfig::default()
        },
        RunOptions::default(),
    );

    let first = runner.run(&mut rng(5)).expect("Batch should run in test");
    let second = runner.run(&mut rng(5)).expect("Batch should run in test");
    assert_eq!(first.graphs_run, second.graphs_run);
    assert_eq!(first.graphs_skipped, second.graphs_skipped);
    for (a, b) in first.stats.iter().zip(&second.stats) {
        assert_eq!(a.successes, b.successes);
        assert_eq!(a.avg_cost, b.avg_cost);
        assert_eq!(a.avg_snapshots, b.avg_snapshots);
    }
}

#[test]
fn test_batch_rejects_invalid_generator() {
    let runner = BatchRunner::new(
        BatchConfig::default(),
        GeneratorConfig {
            density: 2.0,
            ..GeneratorConfig::default()
        },
        RunOptions::default(),
    );
    assert!(runner.run(&mut rng(0)).is_err());
}
