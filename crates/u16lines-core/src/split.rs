//! 行切分：BOM 识别 + 换行奇偶性推断字节序 + 流末冲刷
//!
//! `split` 是纯函数式的拉取接口：调用方持有缓冲区与 `ScannerState`，
//! 每次传入“尚未消费的全部字节”和是否已到流末，根据返回的 `Split` 决定
//! 继续读取、丢弃若干字节或取出一行。同一段未消费数据在追加更多字节后
//! 可以安全地重复传入，结果与一次性传入完整数据一致。
use std::ops::Range;

use tracing::debug;

use crate::bom::detect_bom;
use crate::trim::{infer_order_from_cr, trim_cr};
use crate::types::ByteOrder;

/// 一次切分的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Split {
    /// 需要更多数据（未到流末时才会返回）
    NeedMore,
    /// 消费 n 字节但不产生行（BOM）
    Skip(usize),
    /// 取出一行：消费 `advance` 字节，`body` 为行体在缓冲区中的范围（不含换行与回车）。
    /// 流末冲刷同样以 `Line` 返回，此时 `advance` 等于缓冲区长度。
    Line { advance: usize, body: Range<usize> },
    /// 流末且缓冲区为空，扫描正常结束
    End,
}

/// 单条流的扫描状态（由调用方持有，不同流互不共享）
#[derive(Debug, Clone)]
pub struct ScannerState {
    order: ByteOrder,
    bom_pending: bool,
    default_order: ByteOrder,
}

impl Default for ScannerState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ScannerState {
    /// 创建扫描状态；`known` 为调用方已知的字节序，给出具体值时跳过 BOM 检测
    pub fn new(known: Option<ByteOrder>) -> Self {
        let order = known.unwrap_or(ByteOrder::Unknown);
        Self {
            order,
            bom_pending: !order.is_known(),
            default_order: ByteOrder::platform_default(),
        }
    }

    /// 设置流末仍未推断出字节序时的兜底值；传入 Unknown 时保留平台默认
    pub fn with_default_order(mut self, order: ByteOrder) -> Self {
        if order.is_known() {
            self.default_order = order;
        }
        self
    }

    /// 当前（或最终）确定的字节序
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn default_order(&self) -> ByteOrder {
        self.default_order
    }

    fn resolve(&mut self, order: ByteOrder, how: &'static str) {
        if self.order != order {
            debug!(%order, how, "byte order resolved");
            self.order = order;
        }
    }
}

/// 切分入口：见模块文档
pub fn split(data: &[u8], at_eof: bool, state: &mut ScannerState) -> Split {
    if at_eof && data.is_empty() {
        return Split::End;
    }

    // BOM 只检查一次；不足 2 字节且未到流末时延后
    if state.bom_pending {
        if data.len() < 2 && !at_eof {
            return Split::NeedMore;
        }
        state.bom_pending = false;
        if let Some(order) = detect_bom(data) {
            state.resolve(order, "bom");
            return Split::Skip(2);
        }
    }

    if let Some(hit) = find_newline(data, state.order) {
        state.resolve(hit.order, "newline");
        let body = trim_cr(&data[..hit.body_end], hit.order);
        return Split::Line { advance: hit.advance, body: 0..body.len() };
    }

    if !at_eof {
        return Split::NeedMore;
    }

    // 流末：剩余数据整体作为最后一行
    if !state.order.is_known() {
        match infer_order_from_cr(data) {
            Some(order) => state.resolve(order, "trailing-cr"),
            None => state.resolve(state.default_order, "default"),
        }
    }
    let body = trim_cr(data, state.order);
    Split::Line { advance: data.len(), body: 0..body.len() }
}

/// 一个被认定为行终止符的换行位置
struct NewlineHit {
    order: ByteOrder,
    advance: usize,
    body_end: usize,
}

/// 按位置顺序查找第一个与当前字节序相容的换行码元。
/// - 奇数偏移且前一字节为 0x00：大端 `00 0A`
/// - 偶数偏移且后一字节为 0x00：小端 `0A 00`
/// 与已确定字节序不符的 0x0A 视为普通数据。
fn find_newline(data: &[u8], order: ByteOrder) -> Option<NewlineHit> {
    let mut i = 0;
    while let Some(j) = data[i..].iter().position(|&b| b == b'\n') {
        i += j;
        if i % 2 == 1 {
            if order != ByteOrder::Little && data[i - 1] == 0x00 {
                return Some(NewlineHit { order: ByteOrder::Big, advance: i + 1, body_end: i - 1 });
            }
        } else if order != ByteOrder::Big && data.get(i + 1) == Some(&0x00) {
            return Some(NewlineHit { order: ByteOrder::Little, advance: i + 2, body_end: i });
        }
        i += 1;
    }
    None
}
