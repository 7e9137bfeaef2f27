use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{ConfigError, VizResult};
use crate::graph::{BuilderKind, WeightRange};
use crate::services::algorithm::{Algorithm, HeuristicKind};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub batch: BatchConfig,
    pub generator: GeneratorConfig,
    pub search: SearchConfig,
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// flexi_logger 级别描述，例如 `info` 或 `pathviz=debug`
    pub level: String,
    /// 为 false 时输出到 stderr
    pub to_file: bool,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            to_file: false,
            dir: "logs".to_string(),
            file: "pathviz".to_string(),
            max_file_size: 10 * 1024 * 1024, // 10MB
            max_files: 5,
        }
    }
}

/// 批量对比配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    pub num_graphs: usize,
    pub algorithms: Vec<Algorithm>,
    /// 单次运行最多拉取的快照数
    pub step_budget: Option<usize>,
    /// 单次运行的时间上限（毫秒）
    pub time_budget_ms: Option<u64>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            num_graphs: 10,
            algorithms: Algorithm::ALL.to_vec(),
            step_budget: None,
            time_budget_ms: None,
        }
    }
}

/// 随机图生成配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub builder: BuilderKind,
    pub num_nodes: usize,
    pub density: f64,
    pub directed: bool,
    pub weight_min: i64,
    pub weight_max: i64,
    pub allow_disconnected: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            builder: BuilderKind::ConnectedRandom,
            num_nodes: 30,
            density: 0.1,
            directed: false,
            weight_min: 1,
            weight_max: 10,
            allow_disconnected: false,
        }
    }
}

impl GeneratorConfig {
    pub fn weights(&self) -> WeightRange {
        WeightRange::new(self.weight_min, self.weight_max)
    }
}

/// 搜索配置
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub heuristic: HeuristicKind,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> VizResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> VizResult<()> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::from)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::Invalid("log.level 不能为空".to_string()));
        }
        if self.log.to_file && self.log.max_files == 0 {
            return Err(ConfigError::Invalid("log.max_files 必须大于 0".to_string()));
        }
        if self.batch.num_graphs == 0 {
            return Err(ConfigError::Invalid("batch.num_graphs 必须大于 0".to_string()));
        }
        if self.batch.algorithms.is_empty() {
            return Err(ConfigError::Invalid("batch.algorithms 不能为空".to_string()));
        }
        if self.batch.step_budget == Some(0) {
            return Err(ConfigError::Invalid("batch.step_budget 必须大于 0".to_string()));
        }
        if self.generator.num_nodes < 2 {
            return Err(ConfigError::Invalid(format!(
                "generator.num_nodes 至少为 2: {}",
                self.generator.num_nodes
            )));
        }
        if !(0.0..=1.0).contains(&self.generator.density) {
            return Err(ConfigError::Invalid(format!(
                "generator.density 必须在 [0, 1] 内: {}",
                self.generator.density
            )));
        }
        if self.generator.weight_min > self.generator.weight_max {
            return Err(ConfigError::Invalid(format!(
                "generator 权重范围无效: {}..={}",
                self.generator.weight_min, self.generator.weight_max
            )));
        }
        Ok(())
    }
}
