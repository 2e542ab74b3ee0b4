//! UTF-16 → UTF-8 有损解码
use crate::types::ByteOrder;

/// 将一行 UTF-16 原始字节解码为 UTF-8 字符串
/// - 每 2 字节组成一个码元；奇数长度时末尾单字节按 U+FFFD 处理
/// - 代理对正常合并，孤立代理替换为 U+FFFD，从不失败
/// - Unknown 按大端处理（调用方应在解码前完成字节序判定）
pub fn decode_utf16(bytes: &[u8], order: ByteOrder) -> String {
    let pairs = bytes.chunks_exact(2);
    let truncated = !pairs.remainder().is_empty();
    let units = pairs
        .map(|p| order.unit([p[0], p[1]]))
        .chain(truncated.then_some(char::REPLACEMENT_CHARACTER as u16));

    let mut out = String::with_capacity(bytes.len());
    out.extend(char::decode_utf16(units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(s: &str, order: ByteOrder) -> Vec<u8> {
        s.encode_utf16()
            .flat_map(|u| match order {
                ByteOrder::Little => u.to_le_bytes(),
                _ => u.to_be_bytes(),
            })
            .collect()
    }

    #[test]
    fn decodes_both_orders() {
        for order in [ByteOrder::Big, ByteOrder::Little] {
            let text = "hello, 世界";
            assert_eq!(decode_utf16(&encode(text, order), order), text);
        }
    }

    #[test]
    fn decodes_surrogate_pairs() {
        let text = "emoji 😀 ok";
        assert_eq!(decode_utf16(&encode(text, ByteOrder::Little), ByteOrder::Little), text);
    }

    #[test]
    fn odd_trailing_byte_becomes_replacement() {
        let mut bytes = encode("AB", ByteOrder::Big);
        bytes.push(0x43);
        assert_eq!(decode_utf16(&bytes, ByteOrder::Big), "AB\u{FFFD}");
        assert_eq!(decode_utf16(&[0x41], ByteOrder::Little), "\u{FFFD}");
    }

    #[test]
    fn lone_surrogates_are_replaced() {
        // 0xD800 后跟普通字符，0xDC00 单独出现
        let bytes = [0xD8, 0x00, 0x00, 0x41, 0xDC, 0x00];
        assert_eq!(decode_utf16(&bytes, ByteOrder::Big), "\u{FFFD}A\u{FFFD}");
    }

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(decode_utf16(&[], ByteOrder::Big), "");
    }
}
