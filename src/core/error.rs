//! 统一错误处理 for PathViz
//!
//! ## 设计理念
//!
//! 1. **按层划分**：图输入错误 (`GraphError`)、配置错误 (`ConfigError`) 各自独立，
//!    通过 `#[from]` 汇总到顶层 `VizError`
//! 2. **终止状态不是错误**：目标不可达、负权环、非 DAG 输入都是算法运行的正常终止状态，
//!    由快照和 `Outcome` 表达；只有拓扑排序这一前置步骤用 `GraphError::NotADag` 快速失败
//! 3. **统一接口**：`VizResult<T>` 提供统一的返回类型

use thiserror::Error;

use crate::graph::NodeId;

/// 顶层错误类型
#[derive(Error, Debug)]
pub enum VizError {
    #[error("图错误: {0}")]
    Graph(#[from] GraphError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("日志错误: {0}")]
    Logging(String),

    #[error("未知算法: {0}")]
    UnknownAlgorithm(String),
}

/// 统一的结果类型
pub type VizResult<T> = Result<T, VizError>;

/// 图输入错误
///
/// 属于调用方（客户端）错误，在产生第一个快照之前返回
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("节点不存在: {0}")]
    UnknownNode(NodeId),

    #[error("第 {line} 行无法解析: {content:?}")]
    InvalidEdgeLine { line: usize, content: String },

    #[error("参数无效: {0}")]
    InvalidParameter(String),

    #[error("图中存在环，不是 DAG")]
    NotADag,
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("解析失败: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("序列化失败: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("配置项无效: {0}")]
    Invalid(String),
}

impl From<flexi_logger::FlexiLoggerError> for VizError {
    fn from(error: flexi_logger::FlexiLoggerError) -> Self {
        VizError::Logging(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_converts_into_viz_error() {
        let err: VizError = GraphError::UnknownNode(NodeId::from("Z")).into();
        assert!(matches!(err, VizError::Graph(GraphError::UnknownNode(_))));
        assert_eq!(err.to_string(), "图错误: 节点不存在: Z");
    }

    #[test]
    fn test_invalid_edge_line_message() {
        let err = GraphError::InvalidEdgeLine {
            line: 3,
            content: "A".to_string(),
        };
        assert_eq!(err.to_string(), "第 3 行无法解析: \"A\"");
    }

    #[test]
    fn test_config_error_from_toml() {
        let parse_err = toml::from_str::<toml::Value>("a = [").unwrap_err();
        let err: VizError = ConfigError::from(parse_err).into();
        assert!(matches!(err, VizError::Config(ConfigError::Parse(_))));
    }
}
