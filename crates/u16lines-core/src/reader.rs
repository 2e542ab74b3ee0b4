//! 流式读取：按块从 `Read` 拉取字节并逐行产出 UTF-8 字符串
use std::io::{self, Read};

use crate::decode::decode_utf16;
use crate::error::{Result, ScanError};
use crate::options::{ScanOptions, DEFAULT_CHUNK_SIZE};
use crate::split::{split, ScannerState, Split};
use crate::types::ByteOrder;

/// UTF-16 行迭代器
/// - 只保留未消费的字节，内存占用与最长行相当，与流总长度无关
/// - 读取失败时产出一次 `Err` 后结束，不做重试（`Interrupted` 除外）
pub struct Utf16Lines<R> {
    reader: R,
    state: ScannerState,
    buf: Vec<u8>,
    /// buf 中已消费的前缀长度
    start: usize,
    chunk_size: usize,
    max_line_len: Option<usize>,
    at_eof: bool,
    done: bool,
    consumed: u64,
}

impl<R: Read> Utf16Lines<R> {
    pub fn new(reader: R, state: ScannerState) -> Self {
        Self {
            reader,
            state,
            buf: Vec::new(),
            start: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_line_len: None,
            at_eof: false,
            done: false,
            consumed: 0,
        }
    }

    /// 按扫描选项构建（已知字节序、默认字节序、块大小、行上限）
    pub fn with_options(reader: R, opts: &ScanOptions) -> Self {
        let state = ScannerState::new(opts.byte_order).with_default_order(opts.default_order);
        Self::new(reader, state)
            .chunk_size(opts.chunk_size)
            .max_line_len(opts.max_line_len)
    }

    pub fn chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n.max(1);
        self
    }

    /// 未遇到换行时允许缓冲的最大字节数
    pub fn max_line_len(mut self, limit: Option<usize>) -> Self {
        self.max_line_len = limit;
        self
    }

    /// 当前确定的字节序；流读完后即为最终结果
    pub fn order(&self) -> ByteOrder {
        self.state.order()
    }

    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    /// 已消费（含 BOM 与换行）的字节数
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// 丢弃已消费前缀并追加一块新数据
    fn fill(&mut self) -> io::Result<()> {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.start = 0;
        }
        let old = self.buf.len();
        self.buf.resize(old + self.chunk_size, 0);
        loop {
            match self.reader.read(&mut self.buf[old..]) {
                Ok(n) => {
                    self.buf.truncate(old + n);
                    if n == 0 {
                        self.at_eof = true;
                    }
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.truncate(old);
                    return Err(e);
                }
            }
        }
    }
}

impl<R: Read> Iterator for Utf16Lines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let data = &self.buf[self.start..];
            match split(data, self.at_eof, &mut self.state) {
                Split::End => {
                    self.done = true;
                    return None;
                }
                Split::Skip(n) => {
                    self.start += n;
                    self.consumed += n as u64;
                }
                Split::Line { advance, body } => {
                    let line = decode_utf16(&data[body], self.state.order());
                    self.start += advance;
                    self.consumed += advance as u64;
                    return Some(Ok(line));
                }
                Split::NeedMore => {
                    if self.at_eof {
                        self.done = true;
                        return None;
                    }
                    if let Some(limit) = self.max_line_len {
                        if data.len() > limit {
                            self.done = true;
                            return Some(Err(ScanError::LineTooLong { limit }));
                        }
                    }
                    if let Err(e) = self.fill() {
                        self.done = true;
                        return Some(Err(e.into()));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 每次最多返回 `step` 字节的读取器
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    /// 先返回若干字节，随后报错
    struct Broken {
        sent: bool,
    }

    impl Read for Broken {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
            }
            self.sent = true;
            buf[..4].copy_from_slice(&[0x00, b'a', 0x00, b'\n']);
            Ok(4)
        }
    }

    fn utf16le_with_bom(s: &str) -> Vec<u8> {
        let mut out = vec![0xFF, 0xFE];
        out.extend(s.encode_utf16().flat_map(u16::to_le_bytes));
        out
    }

    #[test]
    fn byte_at_a_time_matches_whole_buffer() {
        let data = utf16le_with_bom("第一行\r\nsecond\n\nlast");
        let whole: Vec<String> = Utf16Lines::new(&data[..], ScannerState::default())
            .collect::<Result<_>>()
            .unwrap();
        for step in 1..=7 {
            let reader = Trickle { data: &data, step };
            let got: Vec<String> = Utf16Lines::new(reader, ScannerState::default())
                .chunk_size(3)
                .collect::<Result<_>>()
                .unwrap();
            assert_eq!(got, whole, "step {step}");
        }
        assert_eq!(whole, vec!["第一行", "second", "", "last"]);
    }

    #[test]
    fn reports_resolved_order_and_consumed_bytes() {
        let data = utf16le_with_bom("a\nb\n");
        let mut it = Utf16Lines::new(&data[..], ScannerState::default());
        assert_eq!(it.by_ref().count(), 2);
        assert_eq!(it.order(), ByteOrder::Little);
        assert_eq!(it.bytes_consumed(), data.len() as u64);
    }

    #[test]
    fn read_error_is_surfaced_and_stops() {
        let mut it = Utf16Lines::new(Broken { sent: false }, ScannerState::default());
        assert_eq!(it.next().unwrap().unwrap(), "a");
        match it.next() {
            Some(Err(ScanError::Io(e))) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected {other:?}"),
        }
        assert!(it.next().is_none());
    }

    #[test]
    fn overlong_line_is_rejected() {
        let data = vec![0x00, b'x'].repeat(64);
        let mut it = Utf16Lines::new(&data[..], ScannerState::default())
            .chunk_size(16)
            .max_line_len(Some(32));
        assert!(matches!(it.next(), Some(Err(ScanError::LineTooLong { limit: 32 }))));
        assert!(it.next().is_none());
    }

    #[test]
    fn options_carry_known_order() {
        let opts = ScanOptions { byte_order: Some(ByteOrder::Big), ..ScanOptions::default() };
        let data = [0x00, b'\n', 0x00, b'z'];
        let it = Utf16Lines::with_options(&data[..], &opts);
        let lines: Vec<String> = it.collect::<Result<_>>().unwrap();
        assert_eq!(lines, vec!["", "z"]);
    }
}
