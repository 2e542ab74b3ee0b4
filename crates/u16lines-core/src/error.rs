//! 错误类型
use std::io;
use std::path::PathBuf;

/// 扫描过程中可能出现的错误。
/// 编码层面的异常（截断、孤立代理）不会产生错误，只会替换为 U+FFFD。
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 底层字节流读取失败，原样上抛，扫描随即终止
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    /// 未遇到换行而缓冲区超过上限。
    /// 默认开启（`ScanOptions::max_line_len` 默认 1 MiB）；设为 None（配置或命令行中为 0）可关闭
    #[error("line exceeds {limit} bytes without a terminator")]
    LineTooLong { limit: usize },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// 并行解码的 worker 异常（panic 或通道关闭）
    #[error("worker failed: {0}")]
    Worker(String),

    #[error("write json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = ScanError> = std::result::Result<T, E>;
