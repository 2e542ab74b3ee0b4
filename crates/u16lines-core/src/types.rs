//! 公共类型（对外暴露）
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// UTF-16 字节序
/// - Unknown：尚未由 BOM 或换行启发式确定（初始状态）
/// - Big / Little：已确定，之后整条流不再重新推断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    #[serde(alias = "auto")]
    Unknown,
    #[serde(alias = "be")]
    Big,
    #[serde(alias = "le")]
    Little,
}

impl ByteOrder {
    /// 是否已确定为具体字节序
    pub fn is_known(self) -> bool {
        !matches!(self, ByteOrder::Unknown)
    }

    /// 流结束仍无法推断时使用的默认字节序。
    ///
    /// 以编译目标为准而不是运行时探测：Windows 目标为 Little，其余为 Big。
    /// 同一构建产物每次运行结果一致；需要其他取值时通过 `ScanOptions::default_order` 覆盖。
    pub const fn platform_default() -> ByteOrder {
        if cfg!(windows) {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    /// 按本字节序组装一个 16 位码元
    #[inline]
    pub(crate) fn unit(self, pair: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Little => u16::from_le_bytes(pair),
            ByteOrder::Big | ByteOrder::Unknown => u16::from_be_bytes(pair),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ByteOrder::Unknown => "unknown",
            ByteOrder::Big => "big",
            ByteOrder::Little => "little",
        };
        f.write_str(s)
    }
}

/// 字节序名称解析失败
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized byte order `{0}` (expected big, little or auto)")]
pub struct ParseByteOrderError(pub String);

impl FromStr for ByteOrder {
    type Err = ParseByteOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "big" | "be" | "utf-16be" => Ok(ByteOrder::Big),
            "little" | "le" | "utf-16le" => Ok(ByteOrder::Little),
            "auto" | "unknown" => Ok(ByteOrder::Unknown),
            _ => Err(ParseByteOrderError(s.to_string())),
        }
    }
}

/// 输出项结构（对应结果 JSON 数组的单个元素）
#[derive(Debug, Clone, Serialize)]
pub struct OutputItem<'a> {
    pub file: &'a str,
    /// 行号，从 1 开始
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<&'a str>>,
}
