//! Ingestion 错误类型

use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 行解析失败
    #[error("{source_name}:{line}: {message}")]
    ParseFailed {
        /// 输入来源 (raw / android / scenario)
        source_name: &'static str,
        /// 行号 (从 1 开始)
        line: usize,
        /// 错误消息
        message: String,
    },

    /// RAW 时间戳倒退
    #[error("raw:{line}: time {time} is earlier than previous sample {previous}")]
    TimeNotMonotonic {
        /// 行号
        line: usize,
        /// 上一个样本时间
        previous: f64,
        /// 当前样本时间
        time: f64,
    },

    /// ANDROID 日志中出现多个场景
    #[error("android:{line}: scenario '{found}' != '{expected}'")]
    ScenarioMismatch {
        /// 行号
        line: usize,
        /// 期望的场景名
        expected: String,
        /// 实际的场景名
        found: String,
    },

    /// 文件读取失败
    #[error("failed to read {path}: {source}")]
    Read {
        /// 文件路径
        path: String,
        /// 底层 IO 错误
        #[source]
        source: std::io::Error,
    },

    /// 文件写入失败
    #[error("failed to write {path}: {source}")]
    Write {
        /// 文件路径
        path: String,
        /// 底层 IO 错误
        #[source]
        source: std::io::Error,
    },
}

impl IngestionError {
    pub(crate) fn parse(
        source_name: &'static str,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::ParseFailed {
            source_name,
            line,
            message: message.into(),
        }
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
