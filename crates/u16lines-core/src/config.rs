//! 配置文件加载（TOML）
//!
//! ```toml
//! [scan]
//! byte_order = "auto"      # auto | big | little
//! default_order = "little" # 流末仍无法推断时使用
//! chunk_size = 65536
//! max_line_len = 0         # 0 表示不限
//! fields = [0, 1, 12, 13]
//! delimiter = "\t"
//! threads = 4
//! ```
use serde::Deserialize;
use std::path::Path;

use crate::error::{Result, ScanError};
use crate::options::ScanOptions;
use crate::types::ByteOrder;

/// 顶层配置文件结构
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    scan: ScanSection,
}

/// `[scan]` 段：每个键都是可选的，只覆盖出现的项
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    pub byte_order: Option<ByteOrder>,
    pub default_order: Option<ByteOrder>,
    pub chunk_size: Option<usize>,
    pub max_line_len: Option<usize>,
    pub fields: Option<Vec<usize>>,
    pub delimiter: Option<char>,
    pub threads: Option<usize>,
    pub max_file_size: Option<u64>,
}

impl ScanSection {
    /// 将本段覆盖到已有选项上
    pub fn apply(self, opts: &mut ScanOptions) {
        if let Some(order) = self.byte_order {
            opts.byte_order = order.is_known().then_some(order);
        }
        if let Some(order) = self.default_order.filter(|o| o.is_known()) {
            opts.default_order = order;
        }
        if let Some(n) = self.chunk_size {
            opts.chunk_size = n.max(1);
        }
        if let Some(n) = self.max_line_len {
            opts.max_line_len = (n > 0).then_some(n);
        }
        if self.fields.is_some() {
            opts.fields = self.fields;
        }
        if let Some(d) = self.delimiter {
            opts.delimiter = d;
        }
        if let Some(n) = self.threads {
            opts.threads = (n > 0).then_some(n);
        }
        if self.max_file_size.is_some() {
            opts.max_file_size = self.max_file_size;
        }
    }
}

/// 解析配置文本并返回 `[scan]` 段
pub fn parse_scan_section(txt: &str) -> std::result::Result<ScanSection, toml::de::Error> {
    let parsed: ConfigFile = toml::from_str(txt)?;
    Ok(parsed.scan)
}

/// 从 TOML 文件加载并覆盖到默认选项上
pub fn load_options(path: &Path) -> Result<ScanOptions> {
    let txt = std::fs::read_to_string(path)?;
    let section = parse_scan_section(&txt).map_err(|source| ScanError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    let mut opts = ScanOptions::default();
    section.apply(&mut opts);
    Ok(opts)
}
