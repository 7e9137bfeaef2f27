//! 图的文本输入与 JSON 传输格式
//!
//! 边列表格式：每行 `u v [w]`，权重缺省为 1；空行和 `#` 注释行被跳过。
//! JSON 格式：`{"directed": bool, "nodes": [{"id", "x", "y"}], "edges": [{"source", "target", "weight"}]}`

use serde::{Deserialize, Serialize};

use super::model::{Graph, NodeId, Position};
use crate::core::{GraphError, VizResult};

/// 解析边列表文本
pub fn parse_edge_list(text: &str, directed: bool) -> Result<Graph, GraphError> {
    let mut graph = Graph::new(directed);

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let invalid = || GraphError::InvalidEdgeLine {
            line: line_no + 1,
            content: raw.to_string(),
        };

        let (u, v, weight) = match parts.as_slice() {
            [u, v] => (*u, *v, 1.0),
            [u, v, w, ..] => {
                let weight = w.parse::<f64>().map_err(|_| invalid())?;
                if weight.is_nan() {
                    return Err(invalid());
                }
                (*u, *v, weight)
            }
            _ => return Err(invalid()),
        };

        graph.add_edge(NodeId::parse(u), NodeId::parse(v), weight);
    }

    Ok(graph)
}

/// JSON 中的节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// JSON 中的边
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// 图的 JSON 传输结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default = "default_directed")]
    pub directed: bool,
    #[serde(default)]
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub edges: Vec<EdgeData>,
}

fn default_directed() -> bool {
    true
}

impl From<&Graph> for GraphData {
    fn from(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|id| {
                let pos = graph.position(id);
                NodeData {
                    id: id.clone(),
                    x: pos.map(|p| p.x),
                    y: pos.map(|p| p.y),
                }
            })
            .collect();

        // 无向图的边只导出存储方向
        let mut edges = Vec::new();
        for edge in graph.edges() {
            if !graph.is_directed()
                && edges
                    .iter()
                    .any(|e: &EdgeData| e.source == edge.target && e.target == edge.source)
            {
                continue;
            }
            edges.push(EdgeData {
                source: edge.source,
                target: edge.target,
                weight: edge.weight,
            });
        }

        Self {
            directed: graph.is_directed(),
            nodes,
            edges,
        }
    }
}

impl TryFrom<GraphData> for Graph {
    type Error = GraphError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        let mut graph = Graph::new(data.directed);
        for node in data.nodes {
            match (node.x, node.y) {
                (Some(x), Some(y)) => graph.add_node_at(node.id, Position::new(x, y)),
                (None, None) => graph.add_node(node.id),
                _ => {
                    return Err(GraphError::InvalidParameter(format!(
                        "节点 {} 的坐标不完整",
                        node.id
                    )))
                }
            };
        }
        for edge in data.edges {
            if edge.weight.is_nan() {
                return Err(GraphError::InvalidParameter(format!(
                    "边 {}->{} 的权重不是数字",
                    edge.source, edge.target
                )));
            }
            graph.add_edge(edge.source, edge.target, edge.weight);
        }
        Ok(graph)
    }
}

/// 从 JSON 文本加载图
pub fn graph_from_json(text: &str) -> VizResult<Graph> {
    let data: GraphData = serde_json::from_str(text)?;
    Ok(Graph::try_from(data)?)
}

/// 把图导出为 JSON 文本
pub fn graph_to_json(graph: &Graph) -> VizResult<String> {
    Ok(serde_json::to_string_pretty(&GraphData::from(graph))?)
}
