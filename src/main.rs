//! xlsxquiz CLI
//!
//! 問題集のXLSXファイルを1行1問のテキストに変換するコマンドラインツール。

use clap::{Parser, ValueEnum};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use xlsxquiz::logging::{init_logging, LogConfig, LogFormat};
use xlsxquiz::{resolve_input, ConverterBuilder, OutputFormat, XlsxQuizError};

#[derive(Parser)]
#[command(
    name = "xlsxquiz",
    version,
    about = "Convert a quiz spreadsheet (XLSX) into one line per question"
)]
struct Cli {
    /// Input XLSX file (default: the only .xlsx file in --dir).
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output file.
    #[arg(short, long, value_name = "PATH", default_value = "questions.txt")]
    output: PathBuf,

    /// Directory searched for an input file when --input is omitted (default: current directory).
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: FormatArg,

    /// Print the detected column roles as JSON to stderr.
    #[arg(long)]
    explain: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    log_format: LogFormatArg,

    /// Prefix log lines with timestamps.
    #[arg(long = "log-timestamps")]
    log_timestamps: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
        })
        .with_ansi(io::stderr().is_terminal())
        .with_timestamps(cli.log_timestamps);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        process::exit(1);
    }

    match run(&cli) {
        Ok(()) => println!("已生成: {}", cli.output.display()),
        Err(error) => {
            handle_error(error);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<(), XlsxQuizError> {
    let search_dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let input = resolve_input(cli.input.as_deref(), &search_dir)?;
    tracing::info!(input = %input.display(), "input resolved");

    let converter = ConverterBuilder::new()
        .with_output_format(match cli.format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        })
        .build()?;

    let summary = converter.convert_file(&input, &cli.output)?;

    if cli.explain {
        let roles = serde_json::to_string_pretty(&summary.roles)
            .map_err(|e| XlsxQuizError::Io(io::Error::other(e)))?;
        eprintln!("{roles}");
    }

    Ok(())
}

fn handle_error(error: XlsxQuizError) {
    eprintln!("错误: {error}");
    match error {
        XlsxQuizError::NoInputFound { .. } => {
            eprintln!("提示: 请把题库 .xlsx 文件放在该目录下，或使用 --input 指定文件。");
        }
        XlsxQuizError::AmbiguousInput { candidates, .. } => {
            for candidate in &candidates {
                eprintln!("  {}", candidate.display());
            }
            eprintln!("提示: 请使用 --input 指定要转换的文件。");
        }
        XlsxQuizError::EmptyInput => {
            eprintln!("提示: 活动工作表中没有任何内容，请确认第一行是表头。");
        }
        XlsxQuizError::Io(_) => {
            eprintln!("提示: 请确认文件存在并且有读写权限。");
        }
        XlsxQuizError::Parse(_) | XlsxQuizError::Zip(_) | XlsxQuizError::Xml(_) => {
            eprintln!("提示: 文件可能不是有效的 .xlsx 文件或已损坏。");
        }
        XlsxQuizError::Utf8(_) => {
            eprintln!("提示: 文件中包含无效的 UTF-8 字符。");
        }
        XlsxQuizError::SecurityViolation(_) => {
            eprintln!("提示: 文件超出了大小或结构限制。");
        }
        XlsxQuizError::Config(_) => {
            eprintln!("提示: 请检查命令行参数。");
        }
    }
}
