//! 扫描主流程与并行调度
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, ScanError};
use crate::options::{ScanOptions, ScanStats};
use crate::reader::Utf16Lines;
use crate::types::{ByteOrder, OutputItem};

/// 扫描文件或目录，将解码后的行以 JSON 数组流式写入 `out`
/// 稳定性保证：
/// - 文件级：目录下文件按文件名排序（深度 1），输出顺序可复现
/// - 文件内：行按流中顺序输出，行号从 1 开始
/// - 输出与线程数无关：读取中途失败的文件，失败前已解码的行照常输出并计入
///   `lines_emitted`，但该文件不计入 `files_scanned` / `orders`
/// 单个文件作为输入时读取错误直接返回；目录输入时出错的文件记录日志后跳过。
/// 输出端写入失败总是直接返回。
pub fn scan_and_write(input: &Path, out: &mut dyn Write, opts: &ScanOptions) -> Result<ScanStats> {
    let mut stats = ScanStats::default();
    let mut w = ItemWriter::begin(out)?;

    if !input.is_dir() {
        let name = display_name(input);
        if let Some(err) = stream_file(input, &name, opts, &mut w, &mut stats)? {
            return Err(err);
        }
        w.finish()?;
        return Ok(stats);
    }

    let mut files: Vec<PathBuf> = vec![];
    for entry in WalkDir::new(input).min_depth(1).max_depth(1) {
        let entry = match entry { Ok(e) => e, Err(_) => continue };
        if entry.file_type().is_file() { files.push(entry.into_path()); }
    }
    // 按文件名排序，确保输出顺序稳定
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files.retain(|p| within_size_limit(p, opts.max_file_size));

    // 决策：多个文件且线程数>1 时并行；同一条流始终只由一个线程解码
    let threads = opts.threads.unwrap_or_else(num_cpus::get);
    if files.len() > 1 && threads > 1 {
        scan_parallel(&files, &mut w, opts, &mut stats, threads)?;
    } else {
        for path in &files {
            let name = display_name(path);
            if let Some(err) = stream_file(path, &name, opts, &mut w, &mut stats)? {
                warn!(file = %name, %err, "scan failed, rest of file skipped");
            }
        }
    }

    w.finish()?;
    Ok(stats)
}

/// 串行路径：边解码边写出，不缓存整文件
/// - 外层 `Err`：输出端写入失败
/// - 内层 `Some`：读取失败，失败前的行已写出并计入统计
fn stream_file(
    path: &Path,
    name: &str,
    opts: &ScanOptions,
    w: &mut ItemWriter<'_>,
    stats: &mut ScanStats,
) -> Result<Option<ScanError>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return Ok(Some(e.into())),
    };
    let mut lines = Utf16Lines::with_options(file, opts);
    let mut n = 0usize;
    let mut error = None;
    for line in lines.by_ref() {
        match line {
            Ok(line) => {
                n += 1;
                w.item(name, n, &line, opts)?;
            }
            Err(e) => {
                error = Some(e);
                break;
            }
        }
    }
    record(stats, name, n, lines.bytes_consumed(), lines.order(), error.is_none());
    Ok(error)
}

/// 单个文件的解码结果（并行路径使用）
/// 读取中途失败时 `error` 非空，`lines` 为失败前已解码的行
struct FileLines {
    lines: Vec<String>,
    bytes: u64,
    order: ByteOrder,
    error: Option<ScanError>,
}

impl FileLines {
    fn failed(error: ScanError) -> Self {
        Self { lines: Vec::new(), bytes: 0, order: ByteOrder::Unknown, error: Some(error) }
    }
}

fn collect_file(path: &Path, opts: &ScanOptions) -> FileLines {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return FileLines::failed(e.into()),
    };
    let mut it = Utf16Lines::with_options(file, opts);
    let mut lines = Vec::new();
    let mut error = None;
    for line in it.by_ref() {
        match line {
            Ok(line) => lines.push(line),
            Err(e) => {
                error = Some(e);
                break;
            }
        }
    }
    FileLines { lines, bytes: it.bytes_consumed(), order: it.order(), error }
}

/// 与 `stream_file` 相同的规则写出一个已解码的文件
fn write_file(w: &mut ItemWriter<'_>, name: &str, file: FileLines, opts: &ScanOptions, stats: &mut ScanStats) -> Result<()> {
    for (i, line) in file.lines.iter().enumerate() {
        w.item(name, i + 1, line, opts)?;
    }
    record(stats, name, file.lines.len(), file.bytes, file.order, file.error.is_none());
    if let Some(err) = file.error {
        warn!(file = %name, %err, "scan failed, rest of file skipped");
    }
    Ok(())
}

/// 并行调度：
/// - 使用 Rayon 线程池按文件并行解码
/// - 单线程 Writer 按 idx 重排并流式写 JSON，保证稳定顺序
/// - 已派发但尚未写出的文件不超过 `threads` 个，内存中至多缓存这么多文件的行
fn scan_parallel(
    files: &[PathBuf],
    w: &mut ItemWriter<'_>,
    opts: &ScanOptions,
    stats: &mut ScanStats,
    threads: usize,
) -> Result<()> {
    use crossbeam_channel as channel;
    use std::collections::BTreeMap;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;

    // 容量等于在途上限，worker 的 send 永不阻塞
    let (tx, rx) = channel::bounded::<(usize, FileLines)>(threads);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    let worker_opts = Arc::new(opts.clone());

    let mut dispatched: usize = 0;
    let mut next_idx: usize = 0;
    let mut pending: BTreeMap<usize, FileLines> = BTreeMap::new();

    while next_idx < files.len() {
        while dispatched < files.len() && dispatched < next_idx + threads {
            let idx = dispatched;
            let path = files[idx].clone();
            let tx = tx.clone();
            let job_opts = Arc::clone(&worker_opts);
            pool.spawn(move || {
                let res = catch_unwind(AssertUnwindSafe(|| collect_file(&path, &job_opts))).unwrap_or_else(|_| {
                    FileLines::failed(ScanError::Worker(format!("decoding {} panicked", path.display())))
                });
                let _ = tx.send((idx, res));
            });
            dispatched += 1;
        }

        // 当前线程仍持有 tx，recv 只会在通道异常关闭时失败
        let (idx, res) = rx
            .recv()
            .map_err(|_| ScanError::Worker("worker channel closed".to_string()))?;
        pending.insert(idx, res);
        while let Some(file) = pending.remove(&next_idx) {
            let name = display_name(&files[next_idx]);
            next_idx += 1;
            write_file(w, &name, file, opts, stats)?;
        }
    }
    Ok(())
}

/// 记录一个文件的统计；失败的文件只计入已写出的行与字节
fn record(stats: &mut ScanStats, name: &str, lines: usize, bytes: u64, order: ByteOrder, complete: bool) {
    debug!(file = %name, %order, lines, bytes, complete, "file scanned");
    stats.lines_emitted += lines;
    stats.bytes_consumed += bytes;
    if complete {
        stats.files_scanned += 1;
        stats.orders.push((name.to_string(), order));
    }
}

fn within_size_limit(path: &Path, max: Option<u64>) -> bool {
    let Some(max) = max else { return true };
    match std::fs::metadata(path) {
        Ok(md) if md.len() > max => {
            debug!(file = %path.display(), size = md.len(), max, "file too large, skipped");
            false
        }
        _ => true,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// JSON 数组的流式写出
struct ItemWriter<'w> {
    out: &'w mut dyn Write,
    first: bool,
}

impl<'w> ItemWriter<'w> {
    fn begin(out: &'w mut dyn Write) -> Result<Self> {
        write!(out, "[")?;
        Ok(Self { out, first: true })
    }

    fn item(&mut self, file: &str, line: usize, text: &str, opts: &ScanOptions) -> Result<()> {
        let item = match &opts.fields {
            Some(cols) => OutputItem { file, line, text: None, fields: Some(select_fields(text, opts.delimiter, cols)) },
            None => OutputItem { file, line, text: Some(text), fields: None },
        };
        if !self.first { write!(self.out, ",")?; } else { self.first = false; }
        serde_json::to_writer(&mut *self.out, &item)?;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        write!(self.out, "]")?;
        Ok(())
    }
}

/// 按分隔符切列并取出指定列；缺失的列补空串
pub fn select_fields<'a>(text: &'a str, delimiter: char, cols: &[usize]) -> Vec<&'a str> {
    let parts: Vec<&str> = text.split(delimiter).collect();
    cols.iter().map(|&c| parts.get(c).copied().unwrap_or("")).collect()
}
