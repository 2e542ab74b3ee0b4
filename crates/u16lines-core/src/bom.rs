//! 字节序标记（BOM，U+FEFF）识别
use crate::types::ByteOrder;

/// 大端 BOM
pub const BOM_BE: [u8; 2] = [0xFE, 0xFF];
/// 小端 BOM
pub const BOM_LE: [u8; 2] = [0xFF, 0xFE];

/// 检查缓冲区开头是否为 UTF-16 BOM
/// - 不足 2 字节时返回 None，由调用方决定是否延后判定
pub fn detect_bom(data: &[u8]) -> Option<ByteOrder> {
    match data.get(..2)? {
        [0xFE, 0xFF] => Some(ByteOrder::Big),
        [0xFF, 0xFE] => Some(ByteOrder::Little),
        _ => None,
    }
}
