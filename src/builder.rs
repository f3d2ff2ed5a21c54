//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use chrono::format::{Item, StrftimeItems};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;

use crate::api::{DateFormat, OutputFormat};
use crate::error::{Result, XlsxQuizError};
use crate::formatter::CellFormatter;
use crate::output::OutputFormatter;
use crate::parser::WorkbookParser;
use crate::quiz::QuizSheet;
use crate::security::{SecurityConfig, DEFAULT_MAX_INPUT_SIZE};
use crate::types::ColumnRoles;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// 出力フォーマット
    pub output_format: OutputFormat,

    /// 日付形式
    pub date_format: DateFormat,

    /// 入力ファイルの最大サイズ（バイト）
    pub max_input_size: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Text,
            date_format: DateFormat::Iso8601,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxquiz::{ConverterBuilder, OutputFormat};
///
/// # fn main() -> Result<(), xlsxquiz::XlsxQuizError> {
/// let converter = ConverterBuilder::new()
///     .with_output_format(OutputFormat::Json)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 出力フォーマット: テキスト（1行1問）
    /// - 日付形式: ISO 8601 (`YYYY-MM-DD HH:MM:SS`)
    /// - 入力サイズ上限: 2GB
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 出力フォーマットを指定する
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 日付セルの出力形式を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxquiz::{ConverterBuilder, DateFormat};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y/%m/%d".to_string()));
    /// ```
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.max_input_size = bytes;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合
    /// * `Err(XlsxQuizError::Config)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * カスタム日付形式が空文字列、または不正な書式文字列
    /// * 入力サイズ上限が0
    pub fn build(self) -> Result<Converter> {
        // 1. カスタム日付形式の検証
        if let DateFormat::Custom(ref pattern) = self.config.date_format {
            if pattern.is_empty() {
                return Err(XlsxQuizError::Config(
                    "Date format string must not be empty".to_string(),
                ));
            }
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(XlsxQuizError::Config(format!(
                    "Invalid date format string: '{}'",
                    pattern
                )));
            }
        }

        // 2. 入力サイズ上限の検証
        if self.config.max_input_size == 0 {
            return Err(XlsxQuizError::Config(
                "Maximum input size must be greater than zero".to_string(),
            ));
        }

        // 3. Converterインスタンス生成
        Ok(Converter::new(self.config))
    }
}

/// 変換結果の概要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    /// 変換したシート名
    pub sheet_name: String,
    /// データ行の数（ヘッダー行を除く）
    pub data_rows: usize,
    /// 出力した問題の数
    pub questions: usize,
    /// 問題文が空のため読み飛ばした行の数
    pub skipped_rows: usize,
    /// 推定した列の役割
    pub roles: ColumnRoles,
}

/// 変換処理のファサード
///
/// 問題集のXLSXファイルを1行1問のテキストに変換するためのメインエントリーポイントです。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::path::Path;
/// use xlsxquiz::ConverterBuilder;
///
/// # fn main() -> Result<(), xlsxquiz::XlsxQuizError> {
/// let converter = ConverterBuilder::new().build()?;
/// let summary = converter.convert_file(Path::new("quiz.xlsx"), Path::new("questions.txt"))?;
/// println!("{} questions", summary.questions);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,

    /// 入力の制限
    security: SecurityConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            formatter: CellFormatter::new(config.date_format.clone()),
            security: SecurityConfig {
                max_input_size: config.max_input_size,
                ..Default::default()
            },
            config,
        }
    }

    /// XLSXファイルのアクティブシートを読み込む
    ///
    /// 先頭行をヘッダー、残りをデータ行とします。
    ///
    /// # 戻り値
    ///
    /// * `Ok(QuizSheet)` - 読み込みに成功した場合
    /// * `Err(XlsxQuizError::EmptyInput)` - シートに行が1つもない場合
    /// * `Err(XlsxQuizError)` - サイズ制限違反、またはファイルの解析に失敗した場合
    pub fn load<R: Read>(&self, input: R) -> Result<QuizSheet> {
        self.load_named(input).map(|(_, sheet)| sheet)
    }

    fn load_named<R: Read>(&self, input: R) -> Result<(String, QuizSheet)> {
        // 上限を1バイト超えた時点で読み込みを打ち切る
        let mut buffer = Vec::new();
        input
            .take(self.security.max_input_size.saturating_add(1))
            .read_to_end(&mut buffer)?;

        let mut parser = WorkbookParser::open(buffer, &self.security)?;
        let sheet = parser.read_active_sheet(&self.formatter)?;
        let quiz = QuizSheet::from_rows(sheet.rows)?;

        Ok((sheet.name, quiz))
    }

    /// 変換して、出力内容をメモリ上に生成する
    fn render<R: Read>(&self, input: R) -> Result<(Vec<u8>, ConversionSummary)> {
        let (sheet_name, sheet) = self.load_named(input)?;

        let roles = sheet.detect_roles();
        tracing::debug!(
            question = ?roles.question_column(),
            question_source = ?roles.question_source(),
            answer = roles.answer_column(),
            answer_source = ?roles.answer_source(),
            options = ?roles.option_columns(),
            option_source = ?roles.option_source(),
            "column roles detected"
        );

        let questions = sheet.questions(&roles);

        let mut buffer = Vec::new();
        OutputFormatter::from_format(self.config.output_format).render(&questions, &mut buffer)?;

        let data_rows = sheet.data_rows().len();
        let summary = ConversionSummary {
            sheet_name,
            data_rows,
            questions: questions.len(),
            skipped_rows: data_rows - questions.len(),
            roles,
        };
        tracing::info!(
            sheet = %summary.sheet_name,
            data_rows = summary.data_rows,
            questions = summary.questions,
            skipped = summary.skipped_rows,
            "conversion finished"
        );

        Ok((buffer, summary))
    }

    /// XLSXファイルを変換してライターに書き出す
    ///
    /// すべての行を処理した後で、出力をまとめて書き出します。
    ///
    /// # 引数
    ///
    /// * `input` - XLSXファイルを読み込むためのリーダー
    /// * `output` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConversionSummary)` - 変換に成功した場合
    /// * `Err(XlsxQuizError)` - エラーが発生した場合（出力には何も書き込まれない）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use std::io::Cursor;
    /// use xlsxquiz::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), xlsxquiz::XlsxQuizError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let excel_data: Vec<u8> = vec![]; // XLSXファイルのバイト列
    /// let mut output = Vec::new();
    /// converter.convert(Cursor::new(excel_data), &mut output)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert<R: Read, W: Write>(&self, input: R, mut output: W) -> Result<ConversionSummary> {
        let (buffer, summary) = self.render(input)?;
        output.write_all(&buffer)?;
        output.flush()?;
        Ok(summary)
    }

    /// XLSXファイルを変換して文字列として返す
    ///
    /// テキスト形式の場合、先頭にBOM（`\u{FEFF}`）が含まれます。
    pub fn convert_to_string<R: Read>(&self, input: R) -> Result<String> {
        let (buffer, _) = self.render(input)?;

        let result = String::from_utf8(buffer).map_err(|e| {
            XlsxQuizError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        Ok(result)
    }

    /// ファイルパスを指定して変換する
    ///
    /// 出力ファイルは変換がすべて成功した後に1回だけ書き込まれます。
    /// エラーの場合、出力ファイルは作成されません。
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<ConversionSummary> {
        let file = std::fs::File::open(input)?;
        let (buffer, summary) = self.render(file)?;
        std::fs::write(output, buffer)?;

        tracing::info!(output = %output.display(), "output written");
        Ok(summary)
    }
}
