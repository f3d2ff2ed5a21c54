//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! 行単位のデータ異常（セル不足、解釈できない正解欄など）はエラーにならず、
//! 列推定・正解解析の縮退ルールで吸収されます。ここに現れるのは致命的な失敗のみです。

use std::path::PathBuf;
use thiserror::Error;

/// xlsxquizクレート全体で使用するエラー型
///
/// # エラーの種類
///
/// - `Io` / `Parse` / `Zip` / `Xml` / `Utf8`: 入力ファイルの読み込み・解析の失敗
/// - `Config`: ビルダー設定の検証に失敗
/// - `NoInputFound` / `AmbiguousInput`: 入力ファイルを一意に決められない
/// - `EmptyInput`: シートにヘッダー行すら存在しない
/// - `SecurityViolation`: サイズやZIPエントリ数の制限に違反
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxquiz::XlsxQuizError;
/// use std::fs::File;
///
/// fn open_quiz(path: &str) -> Result<File, XlsxQuizError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxQuizError {
    /// I/O操作中に発生したエラー
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// XLSXファイル（ZIPアーカイブ）の解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// `xl/workbook.xml` の解析エラー
    #[error("XML parse error: {0}")]
    Xml(String),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に検出されます。
    #[error("Configuration error: {0}")]
    Config(String),

    /// `--input` 未指定で、検索ディレクトリに xlsx ファイルが1つもない
    #[error("no .xlsx file found in {}", .dir.display())]
    NoInputFound {
        /// 検索したディレクトリ
        dir: PathBuf,
    },

    /// `--input` 未指定で、検索ディレクトリに xlsx ファイルが複数ある
    #[error(
        "multiple .xlsx files found in {} ({} candidates); specify one with --input",
        .dir.display(),
        .candidates.len()
    )]
    AmbiguousInput {
        /// 検索したディレクトリ
        dir: PathBuf,
        /// 見つかった候補ファイル（ファイル名順）
        candidates: Vec<PathBuf>,
    },

    /// シートに1行も存在しない（ヘッダー行もない）
    #[error("the spreadsheet is empty")]
    EmptyInput,

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力サイズ上限、ZIP bomb、パストラバーサルなどの検出時に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

/// クレート内で使用する `Result` 型エイリアス
pub type Result<T> = std::result::Result<T, XlsxQuizError>;
