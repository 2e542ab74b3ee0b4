//! UTF-16 行扫描库
//!
//! 设计要点：
//! - 输入为字节流，字节序未知：依次通过 BOM、换行码元的奇偶位置、行尾回车推断，
//!   仍无法判定时使用可配置的默认值（`ByteOrder::platform_default()`）。
//! - 切分逻辑（`split`）是无阻塞的拉取接口，状态由调用方持有，可在任意块边界重复调用。
//! - 解码永不失败：截断或孤立的码元替换为 U+FFFD。
//! - 唯一会传播的错误是底层读取失败（以及可选的单行长度上限）。

mod bom;
mod config;
mod decode;
mod error;
mod options;
mod reader;
mod scan;
mod split;
mod trim;
mod types;

pub use bom::{detect_bom, BOM_BE, BOM_LE};
pub use config::{load_options, parse_scan_section, ScanSection};
pub use decode::decode_utf16;
pub use error::{Result, ScanError};
pub use options::{ScanOptions, ScanStats, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LINE_LEN};
pub use reader::Utf16Lines;
pub use scan::{scan_and_write, select_fields};
pub use split::{split, ScannerState, Split};
pub use trim::{infer_order_from_cr, trim_cr};
pub use types::{ByteOrder, OutputItem, ParseByteOrderError};
