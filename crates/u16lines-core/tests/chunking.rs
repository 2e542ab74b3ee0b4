//! 分块无关性：任意切块方式产出的行序列与整块输入一致
use proptest::prelude::*;
use u16lines_core::{decode_utf16, split, ByteOrder, ScannerState, Split};

/// 模拟读循环：按给定的切点逐块追加数据，直到 `split` 不再需要更多数据
fn scan_in_chunks(data: &[u8], cuts: &[usize], default_order: ByteOrder) -> (Vec<String>, ByteOrder) {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (data.len() + 1)).collect();
    points.push(data.len());
    points.sort_unstable();

    let mut state = ScannerState::default().with_default_order(default_order);
    let mut lines = Vec::new();
    let mut pos = 0;
    let mut avail = 0;
    let mut next_cut = points.into_iter();
    loop {
        let at_eof = avail == data.len();
        match split(&data[pos..avail], at_eof, &mut state) {
            Split::End => break,
            Split::NeedMore => {
                assert!(!at_eof, "need more at eof");
                avail = next_cut.by_ref().find(|&p| p > avail).unwrap_or(data.len());
            }
            Split::Skip(n) => pos += n,
            Split::Line { advance, body } => {
                let chunk = &data[pos..avail];
                lines.push(decode_utf16(&chunk[body], state.order()));
                pos += advance;
            }
        }
    }
    (lines, state.order())
}

fn encode(text: &str, order: ByteOrder, bom: bool) -> Vec<u8> {
    let mut out = Vec::new();
    let to_bytes = |u: u16| match order {
        ByteOrder::Little => u.to_le_bytes(),
        _ => u.to_be_bytes(),
    };
    if bom {
        out.extend(to_bytes(0xFEFF));
    }
    for u in text.encode_utf16() {
        out.extend(to_bytes(u));
    }
    out
}

fn line_text() -> impl Strategy<Value = String> {
    // 含 CJK 与增补平面字符，不含换行
    proptest::string::string_regex("[a-zA-Z0-9 \t\r\u{4e00}-\u{4e10}\u{1F600}-\u{1F610}]{0,12}").unwrap()
}

proptest! {
    #[test]
    fn chunking_does_not_change_lines(
        lines in proptest::collection::vec(line_text(), 0..6),
        crlf in any::<bool>(),
        little in any::<bool>(),
        bom in any::<bool>(),
        cuts in proptest::collection::vec(any::<usize>(), 0..10),
    ) {
        let order = if little { ByteOrder::Little } else { ByteOrder::Big };
        let sep = if crlf { "\r\n" } else { "\n" };
        let text = lines.join(sep);
        let data = encode(&text, order, bom);

        let whole = scan_in_chunks(&data, &[], order);
        let chunked = scan_in_chunks(&data, &cuts, order);
        prop_assert_eq!(&chunked, &whole);
    }

    #[test]
    fn terminated_lines_round_trip(
        lines in proptest::collection::vec("[a-z\u{4e00}-\u{4e10}]{0,8}", 1..6),
        little in any::<bool>(),
        cuts in proptest::collection::vec(any::<usize>(), 0..10),
    ) {
        let order = if little { ByteOrder::Little } else { ByteOrder::Big };
        let mut text = String::new();
        for l in &lines {
            text.push_str(l);
            text.push_str("\r\n");
        }
        let data = encode(&text, order, false);
        let (got, resolved) = scan_in_chunks(&data, &cuts, ByteOrder::Unknown);
        prop_assert_eq!(got, lines);
        prop_assert_eq!(resolved, order);
    }
}

#[test]
fn mark_is_excluded_from_first_line() {
    for order in [ByteOrder::Big, ByteOrder::Little] {
        let data = encode("x\ny", order, true);
        let (lines, resolved) = scan_in_chunks(&data, &[1, 3], ByteOrder::Unknown);
        assert_eq!(lines, vec!["x", "y"]);
        assert_eq!(resolved, order);
    }
}
