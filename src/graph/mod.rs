//! 图模块
//!
//! 图模型、文本/JSON 输入输出以及随机图生成器

pub mod builders;
pub mod model;
pub mod parse;

pub use builders::{BuilderKind, WeightRange};
pub use model::{Edge, Graph, NodeId, Position};
pub use parse::{graph_from_json, graph_to_json, parse_edge_list, EdgeData, GraphData, NodeData};
