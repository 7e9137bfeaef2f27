//! 随机图生成器
//!
//! 每个生成器都显式接收一个随机数生成器实例，不做任何进程级播种；
//! 需要可复现时使用 `StdRng::seed_from_u64(seed)`。
//! 生成器只负责产出输入图，与算法语义无关，可以随意替换。

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::model::{Graph, Position};
use crate::config::GeneratorConfig;
use crate::core::GraphError;

/// 边权范围
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: i64,
    pub max: i64,
    /// 为 false 时所有边权为 1
    pub weighted: bool,
}

impl Default for WeightRange {
    fn default() -> Self {
        Self {
            min: 1,
            max: 10,
            weighted: true,
        }
    }
}

impl WeightRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            weighted: true,
        }
    }

    pub fn unit() -> Self {
        Self {
            weighted: false,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), GraphError> {
        if self.weighted && self.min > self.max {
            return Err(GraphError::InvalidParameter(format!(
                "权重范围无效: {}..={}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.weighted {
            rng.gen_range(self.min..=self.max) as f64
        } else {
            1.0
        }
    }
}

/// 生成器种类，用于配置和命令行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BuilderKind {
    ErdosRenyi,
    RandomDag,
    NegativeEdgeDag,
    Dense,
    SparseChain,
    EqualWeight,
    Grid,
    ConnectedRandom,
}

fn check_probability(p: f64) -> Result<(), GraphError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(GraphError::InvalidParameter(format!("概率必须在 [0, 1] 内: {}", p)));
    }
    Ok(())
}

fn with_nodes(num_nodes: usize, directed: bool) -> Graph {
    let mut graph = Graph::new(directed);
    for i in 0..num_nodes {
        graph.add_node(i);
    }
    graph
}

/// Erdős–Rényi 有向随机图：每个有序节点对以概率 `p` 连边
pub fn erdos_renyi<R: Rng + ?Sized>(
    rng: &mut R,
    num_nodes: usize,
    probability: f64,
    weights: WeightRange,
) -> Result<Graph, GraphError> {
    check_probability(probability)?;
    weights.validate()?;

    let mut graph = with_nodes(num_nodes, true);
    for u in 0..num_nodes {
        for v in 0..num_nodes {
            if u != v && rng.gen_bool(probability) {
                let w = weights.sample(rng);
                graph.add_edge(u, v, w);
            }
        }
    }
    Ok(graph)
}

/// 随机 DAG：只允许 `u < v` 的边
pub fn random_dag<R: Rng + ?Sized>(
    rng: &mut R,
    num_nodes: usize,
    probability: f64,
    weights: WeightRange,
) -> Result<Graph, GraphError> {
    check_probability(probability)?;
    weights.validate()?;

    let mut graph = with_nodes(num_nodes, true);
    for u in 0..num_nodes {
        for v in (u + 1)..num_nodes {
            if rng.gen_bool(probability) {
                let w = weights.sample(rng);
                graph.add_edge(u, v, w);
            }
        }
    }
    Ok(graph)
}

/// 可能含负权边但不含负权环的图（基于 DAG 结构）
pub fn negative_edge_dag<R: Rng + ?Sized>(
    rng: &mut R,
    num_nodes: usize,
    probability: f64,
    min_weight: i64,
    max_weight: i64,
) -> Result<Graph, GraphError> {
    random_dag(rng, num_nodes, probability, WeightRange::new(min_weight, max_weight))
}

/// 稠密图，连边概率固定为 0.8
pub fn dense<R: Rng + ?Sized>(
    rng: &mut R,
    num_nodes: usize,
    weights: WeightRange,
) -> Result<Graph, GraphError> {
    erdos_renyi(rng, num_nodes, 0.8, weights)
}

/// 等权图，所有边权为 1，适合对比 BFS 与 Dijkstra
pub fn equal_weight<R: Rng + ?Sized>(
    rng: &mut R,
    num_nodes: usize,
    probability: f64,
) -> Result<Graph, GraphError> {
    erdos_renyi(rng, num_nodes, probability, WeightRange::unit())
}

/// 稀疏链：主链 `0->1->...->n-1`，外加 5% 概率的噪声边
pub fn sparse_chain<R: Rng + ?Sized>(
    rng: &mut R,
    num_nodes: usize,
    weights: WeightRange,
) -> Result<Graph, GraphError> {
    weights.validate()?;

    let mut graph = with_nodes(num_nodes, true);
    for i in 1..num_nodes {
        let w = weights.sample(rng);
        graph.add_edge(i - 1, i, w);
    }

    for u in 0..num_nodes {
        for v in 0..num_nodes {
            if u != v && graph.weight(&u.into(), &v.into()).is_none() && rng.gen_bool(0.05) {
                let w = weights.sample(rng);
                graph.add_edge(u, v, w);
            }
        }
    }
    Ok(graph)
}

/// 二维网格图：节点 `r * cols + c`，坐标 `(r, c)`，相邻节点双向连边
pub fn grid<R: Rng + ?Sized>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    weights: WeightRange,
) -> Result<Graph, GraphError> {
    weights.validate()?;

    let mut graph = Graph::directed();
    for r in 0..rows {
        for c in 0..cols {
            graph.add_node_at(r * cols + c, Position::new(r as f64, c as f64));
        }
    }

    for r in 0..rows {
        for c in 0..cols {
            let u = r * cols + c;
            let mut adjacent = Vec::with_capacity(4);
            if c + 1 < cols {
                adjacent.push(u + 1);
            }
            if c > 0 {
                adjacent.push(u - 1);
            }
            if r + 1 < rows {
                adjacent.push(u + cols);
            }
            if r > 0 {
                adjacent.push(u - cols);
            }
            for v in adjacent {
                let w = weights.sample(rng);
                graph.add_edge(u, v, w);
            }
        }
    }
    Ok(graph)
}

/// 连通随机图
///
/// 先用打乱顺序的链保证（弱）连通，再随机补边直到达到 `density * 最大边数`
pub fn connected_random<R: Rng + ?Sized>(
    rng: &mut R,
    num_nodes: usize,
    density: f64,
    directed: bool,
    weights: WeightRange,
    allow_disconnected: bool,
) -> Result<Graph, GraphError> {
    check_probability(density)?;
    weights.validate()?;

    let mut graph = with_nodes(num_nodes, directed);

    if !allow_disconnected {
        let mut order: Vec<usize> = (0..num_nodes).collect();
        order.shuffle(rng);
        for pair in order.windows(2) {
            let w = weights.sample(rng);
            graph.add_edge(pair[0], pair[1], w);
        }
    }

    let possible_edges = if directed {
        num_nodes * num_nodes.saturating_sub(1)
    } else {
        num_nodes * num_nodes.saturating_sub(1) / 2
    };
    let target_edges = (possible_edges as f64 * density) as usize;

    while graph.edge_count() < target_edges {
        let u = rng.gen_range(0..num_nodes);
        let v = rng.gen_range(0..num_nodes);
        if u != v && graph.weight(&u.into(), &v.into()).is_none() {
            let w = weights.sample(rng);
            graph.add_edge(u, v, w);
        }
    }
    Ok(graph)
}

/// 按配置选择生成器
///
/// `density` 对概率型生成器即连边概率；网格取 `rows = floor(sqrt(n))`，列数向上取整
pub fn generate<R: Rng + ?Sized>(rng: &mut R, config: &GeneratorConfig) -> Result<Graph, GraphError> {
    let n = config.num_nodes;
    let weights = config.weights();
    match config.builder {
        BuilderKind::ErdosRenyi => erdos_renyi(rng, n, config.density, weights),
        BuilderKind::RandomDag => random_dag(rng, n, config.density, weights),
        BuilderKind::NegativeEdgeDag => {
            negative_edge_dag(rng, n, config.density, config.weight_min, config.weight_max)
        }
        BuilderKind::Dense => dense(rng, n, weights),
        BuilderKind::SparseChain => sparse_chain(rng, n, weights),
        BuilderKind::EqualWeight => equal_weight(rng, n, config.density),
        BuilderKind::Grid => {
            let rows = ((n as f64).sqrt() as usize).max(1);
            let cols = n.div_ceil(rows);
            grid(rng, rows, cols, weights)
        }
        BuilderKind::ConnectedRandom => connected_random(
            rng,
            n,
            config.density,
            config.directed,
            weights,
            config.allow_disconnected,
        ),
    }
}
