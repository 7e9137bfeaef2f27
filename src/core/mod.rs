pub mod distance;
pub mod error;

// 错误和结果类型
pub use error::{ConfigError, GraphError, VizError, VizResult};

// 核心数据类型
pub use distance::{Distance, INFINITY_SENTINEL, NAN_SENTINEL, NEG_INFINITY_SENTINEL};
