use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use u16lines_core::{load_options, scan_and_write, ByteOrder, ScanOptions};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "u16lines", version, about = "UTF-16 文本按行解码（自动识别字节序）")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 解码文件或目录下的 UTF-16 文本，按行输出 JSON 数组
    Scan {
        /// 输入文件或目录（目录只扫描第一层）
        #[arg(long)]
        input: PathBuf,

        /// 输出文件（JSON 数组）；"-" 表示标准输出
        #[arg(long, default_value = "-")]
        output: String,

        /// 已知字节序：auto、big 或 little
        #[arg(long)]
        byte_order: Option<ByteOrder>,

        /// 无法推断字节序时的默认值：big 或 little（默认按编译目标）
        #[arg(long)]
        default_order: Option<ByteOrder>,

        /// 只输出指定列（从 0 开始，逗号分隔），例如 0,1,12,13
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<usize>>,

        /// 列分隔符（默认制表符）
        #[arg(long)]
        delimiter: Option<char>,

        /// 线程数（多文件并行；"auto"=CPU 核心数）
        #[arg(long)]
        threads: Option<String>,

        /// 每次读取的字节数
        #[arg(long)]
        chunk_size: Option<usize>,

        /// 单行最大字节数，0 表示不限
        #[arg(long)]
        max_line_len: Option<usize>,

        /// 最大扫描文件大小（单位字节，例如 5242880 代表 5MB）
        #[arg(long)]
        max_file_size: Option<u64>,

        /// 配置文件路径（TOML，[scan] 段）；命令行参数优先
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            input,
            output,
            byte_order,
            default_order,
            fields,
            delimiter,
            threads,
            chunk_size,
            max_line_len,
            max_file_size,
            config,
        } => {
            info!(?input, %output, "starting scan");

            let mut opts = match &config {
                Some(path) => load_options(path).with_context(|| format!("load config {}", path.display()))?,
                None => ScanOptions::default(),
            };
            if let Some(order) = byte_order {
                opts.byte_order = order.is_known().then_some(order);
            }
            if let Some(order) = default_order.filter(|o| o.is_known()) {
                opts.default_order = order;
            }
            if fields.is_some() {
                opts.fields = fields;
            }
            if let Some(d) = delimiter {
                opts.delimiter = d;
            }
            if let Some(t) = threads {
                opts.threads = parse_threads(&t);
            }
            if let Some(n) = chunk_size {
                opts.chunk_size = n.max(1);
            }
            if let Some(n) = max_line_len {
                opts.max_line_len = (n > 0).then_some(n);
            }
            if max_file_size.is_some() {
                opts.max_file_size = max_file_size;
            }

            // 以缓冲方式打开输出，按 JSON 数组流式写入
            let mut out: Box<dyn Write> = if output == "-" {
                Box::new(BufWriter::new(io::stdout().lock()))
            } else {
                Box::new(BufWriter::new(File::create(&output).context("create output file")?))
            };
            let stats = scan_and_write(&input, &mut out, &opts).context("scan and write failed")?;
            out.flush().context("flush output")?;

            for (file, order) in &stats.orders {
                info!(%file, %order, "byte order");
            }
            info!(
                files_scanned = stats.files_scanned,
                lines_emitted = stats.lines_emitted,
                bytes_consumed = stats.bytes_consumed,
                "scan finished"
            );
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 支持通过环境变量 RUST_LOG 控制日志等级，如：RUST_LOG=debug
    // 日志写到 stderr，避免与标准输出上的 JSON 混在一起
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析线程参数："auto" 表示自动（等于 CPU 核数）；其他为具体数值
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") { return None; }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}
