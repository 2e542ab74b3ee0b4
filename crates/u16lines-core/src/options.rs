//! 扫描选项与统计信息（模块）
use crate::types::ByteOrder;

/// 默认单次读取块大小（字节）
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024; // 64 KiB
/// 默认单行上限（字节）
pub const DEFAULT_MAX_LINE_LEN: usize = 1024 * 1024; // 1 MiB

/// 扫描选项
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 调用方已知的字节序；None 或 Unknown 表示自动检测（BOM → 换行奇偶性 → 回车 → 默认值）
    pub byte_order: Option<ByteOrder>,
    /// 流末仍无法推断时使用的字节序，默认取 `ByteOrder::platform_default()`
    pub default_order: ByteOrder,
    /// 每次从底层流读取的字节数
    pub chunk_size: usize,
    /// 单行（未消费缓冲区）上限；None 表示不限。
    /// 默认开启，超过时返回 `ScanError::LineTooLong`
    pub max_line_len: Option<usize>,
    /// 按分隔符切列后保留的列号（从 0 开始）；None 输出整行
    pub fields: Option<Vec<usize>>,
    /// 列分隔符
    pub delimiter: char,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
    /// 最大文件大小（字节）；超过则跳过
    pub max_file_size: Option<u64>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            byte_order: None,
            default_order: ByteOrder::platform_default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_line_len: Some(DEFAULT_MAX_LINE_LEN),
            fields: None,
            delimiter: '\t',
            threads: None,
            max_file_size: None,
        }
    }
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub lines_emitted: usize,
    pub bytes_consumed: u64,
    /// 每个文件最终确定的字节序（按输出顺序）
    pub orders: Vec<(String, ByteOrder)>,
}
