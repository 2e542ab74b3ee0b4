//! 行尾回车（U+000D）裁剪
use crate::types::ByteOrder;

const CR_BE: [u8; 2] = [0x00, b'\r'];
const CR_LE: [u8; 2] = [b'\r', 0x00];

/// 去掉行体末尾的一个回车码元；Unknown 时不做处理
pub fn trim_cr(body: &[u8], order: ByteOrder) -> &[u8] {
    let pattern = match order {
        ByteOrder::Big => CR_BE,
        ByteOrder::Little => CR_LE,
        ByteOrder::Unknown => return body,
    };
    match body.strip_suffix(&pattern) {
        Some(rest) => rest,
        None => body,
    }
}

/// 通过回车码元的排列反推字节序（证据弱于换行奇偶性，仅作兜底）
pub fn infer_order_from_cr(body: &[u8]) -> Option<ByteOrder> {
    if body.ends_with(&CR_LE) {
        Some(ByteOrder::Little)
    } else if body.ends_with(&CR_BE) {
        Some(ByteOrder::Big)
    } else {
        None
    }
}
