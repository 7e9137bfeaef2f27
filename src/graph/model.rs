//! 图模型
//!
//! 有向或无向带权图。节点按插入顺序保存，可选携带二维坐标；边按插入顺序保存。
//! 每次算法运行都把图当作只读输入。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 节点标识：整数或字符串
///
/// 排序规则：整数在前，字符串在后，各自按自然顺序
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Name(String),
}

impl NodeId {
    /// 解析文本标识：能解析为整数的作为 `Int`，否则作为 `Name`
    pub fn parse(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(v) => NodeId::Int(v),
            Err(_) => NodeId::Name(token.to_string()),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(v) => write!(f, "{}", v),
            NodeId::Name(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Int(value)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId::Int(value as i64)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Name(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Name(value)
    }
}

/// 节点坐标，仅供启发式算法使用
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 曼哈顿距离
    pub fn manhattan(&self, other: &Position) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// 欧几里得距离
    pub fn euclidean(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// 有向边
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

#[derive(Debug, Clone)]
struct NodeEntry {
    id: NodeId,
    position: Option<Position>,
    // (目标节点下标, 权重)，按插入顺序
    out: Vec<(usize, f64)>,
}

/// 带权图
#[derive(Debug, Clone)]
pub struct Graph {
    directed: bool,
    nodes: Vec<NodeEntry>,
    index: HashMap<NodeId, usize>,
    // 原始插入的边，用于稳定的边枚举
    edges: Vec<(usize, usize, f64)>,
    edge_index: HashMap<(usize, usize), usize>,
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// 添加节点，已存在时不做任何修改；返回节点下标
    pub fn add_node(&mut self, id: impl Into<NodeId>) -> usize {
        let id = id.into();
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(id.clone(), idx);
        self.nodes.push(NodeEntry {
            id,
            position: None,
            out: Vec::new(),
        });
        idx
    }

    /// 添加带坐标的节点；节点已存在时更新坐标
    pub fn add_node_at(&mut self, id: impl Into<NodeId>, position: Position) -> usize {
        let idx = self.add_node(id);
        self.nodes[idx].position = Some(position);
        idx
    }

    /// 添加边，缺失的端点会被自动创建；已存在的边替换权重
    pub fn add_edge(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>, weight: f64) {
        let u = self.add_node(source);
        let v = self.add_node(target);

        if let Some(&existing) = self.edge_index.get(&(u, v)) {
            self.edges[existing].2 = weight;
            self.set_out_weight(u, v, weight);
            if !self.directed {
                self.set_out_weight(v, u, weight);
            }
            return;
        }

        self.edge_index.insert((u, v), self.edges.len());
        if !self.directed {
            self.edge_index.insert((v, u), self.edges.len());
        }
        self.edges.push((u, v, weight));
        self.nodes[u].out.push((v, weight));
        if !self.directed && u != v {
            self.nodes[v].out.push((u, weight));
        }
    }

    fn set_out_weight(&mut self, u: usize, v: usize, weight: f64) {
        if let Some(slot) = self.nodes[u].out.iter_mut().find(|(t, _)| *t == v) {
            slot.1 = weight;
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// 把文本标识解析为图中的节点；整数形式不存在而同名字符串节点存在时取后者
    pub fn resolve(&self, token: &str) -> NodeId {
        let parsed = NodeId::parse(token);
        if matches!(parsed, NodeId::Int(_)) && !self.contains(&parsed) {
            let name = NodeId::Name(token.to_string());
            if self.contains(&name) {
                return name;
            }
        }
        parsed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 存储的边数（无向边计一次）
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 按插入顺序的节点
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes.iter().map(|n| &n.id)
    }

    pub fn position(&self, id: &NodeId) -> Option<Position> {
        self.index.get(id).and_then(|&idx| self.nodes[idx].position)
    }

    /// 是否至少有一个节点带坐标
    pub fn has_positions(&self) -> bool {
        self.nodes.iter().any(|n| n.position.is_some())
    }

    /// 出边邻居（无向图包含两个方向），按插入顺序
    pub fn neighbors<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = (&'a NodeId, f64)> + 'a {
        let out: &[(usize, f64)] = match self.index.get(id) {
            Some(&idx) => &self.nodes[idx].out,
            None => &[],
        };
        out.iter().map(move |&(t, w)| (&self.nodes[t].id, w))
    }

    /// 稳定的边枚举：按插入顺序；无向图中每条边按两个方向各枚举一次
    pub fn edges(&self) -> Vec<Edge> {
        let mut result = Vec::with_capacity(self.edges.len() * if self.directed { 1 } else { 2 });
        for &(u, v, weight) in &self.edges {
            result.push(Edge {
                source: self.nodes[u].id.clone(),
                target: self.nodes[v].id.clone(),
                weight,
            });
            if !self.directed && u != v {
                result.push(Edge {
                    source: self.nodes[v].id.clone(),
                    target: self.nodes[u].id.clone(),
                    weight,
                });
            }
        }
        result
    }

    pub fn weight(&self, source: &NodeId, target: &NodeId) -> Option<f64> {
        let u = *self.index.get(source)?;
        let v = *self.index.get(target)?;
        self.edge_index.get(&(u, v)).map(|&e| self.edges[e].2)
    }

    pub fn has_negative_weights(&self) -> bool {
        self.edges.iter().any(|&(_, _, w)| w < 0.0)
    }

    pub fn all_unit_weights(&self) -> bool {
        self.edges.iter().all(|&(_, _, w)| w == 1.0)
    }

    /// 反向图：有向图反转所有边，无向图返回副本
    pub fn reversed(&self) -> Graph {
        if !self.directed {
            return self.clone();
        }
        let mut reversed = Graph::new(true);
        for node in &self.nodes {
            match node.position {
                Some(pos) => reversed.add_node_at(node.id.clone(), pos),
                None => reversed.add_node(node.id.clone()),
            };
        }
        for &(u, v, weight) in &self.edges {
            reversed.add_edge(self.nodes[v].id.clone(), self.nodes[u].id.clone(), weight);
        }
        reversed
    }
}
