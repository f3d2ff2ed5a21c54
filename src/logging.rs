//! Logging Module
//!
//! `tracing` / `tracing-subscriber` による診断ログの初期化。
//! ログはすべて標準エラー出力に書き出され、変換結果の出力とは混ざりません。
//!
//! # ログレベル
//!
//! - `warn`: 既定
//! - `info`: 読み込んだシート、変換件数
//! - `debug`: 列推定の結果
//! - `trace`: 読み飛ばした行

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログ出力形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// 人が読みやすい複数行形式（発生箇所つき）
    #[default]
    Pretty,
    /// 1行形式
    Compact,
}

/// ログ設定
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 出力するログレベル
    pub level: Level,
    /// 出力形式
    pub format: LogFormat,
    /// ANSIカラーを使用するか
    pub with_ansi: bool,
    /// タイムスタンプを出力するか
    pub with_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::default(),
            with_ansi: true,
            with_timestamps: false,
        }
    }
}

impl LogConfig {
    /// `-v` の個数からログ設定を生成
    ///
    /// - 0: `warn`
    /// - 1: `info`
    /// - 2: `debug`
    /// - 3以上: `trace`
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    /// 出力形式を指定
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// ANSIカラーの有無を指定
    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    /// タイムスタンプの有無を指定
    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.with_timestamps = enable;
        self
    }
}

/// グローバルなサブスクライバーを初期化する
///
/// 環境変数 `RUST_LOG` が設定されている場合は、そちらが優先されます。
/// プロセス内で1回だけ呼び出してください。
///
/// # 戻り値
///
/// * `Err(io::Error)` - サブスクライバーが既に設定されている場合
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let filter = build_env_filter(config.level);

    let result = match (config.format, config.with_timestamps) {
        (LogFormat::Pretty, true) => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_ansi(config.with_ansi),
            )
            .try_init(),
        (LogFormat::Pretty, false) => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_ansi(config.with_ansi)
                    .without_time(),
            )
            .try_init(),
        (LogFormat::Compact, true) => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_ansi(config.with_ansi),
            )
            .try_init(),
        (LogFormat::Compact, false) => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_ansi(config.with_ansi)
                    .without_time(),
            )
            .try_init(),
    };

    result.map_err(io::Error::other)
}

/// ログレベルから `EnvFilter` を生成（`RUST_LOG` を優先）
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,xlsxquiz={}",
            level.as_str().to_lowercase()
        ))
    })
}
