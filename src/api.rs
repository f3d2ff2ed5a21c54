//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 日付セルの出力形式
///
/// 問題文や選択肢に日付セルが含まれる場合の文字列化方法を指定します。
/// 日付を持たない時刻セル（シリアル値 0 以上 1 未満）は、指定にかかわらず `HH:MM:SS` になります。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式（`YYYY-MM-DD HH:MM:SS`、デフォルト）
    ///
    /// 例: `2025-11-20 00:00:00`
    #[default]
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxquiz::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), xlsxquiz::XlsxQuizError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

impl DateFormat {
    /// chronoに渡すフォーマット文字列
    pub(crate) fn pattern(&self) -> &str {
        match self {
            DateFormat::Iso8601 => "%Y-%m-%d %H:%M:%S",
            DateFormat::Custom(pattern) => pattern,
        }
    }
}

/// 出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// 1行1問のテキスト形式（デフォルト）
    ///
    /// BOM付きUTF-8、行区切りは `\n`、最終行の後に改行なし。
    ///
    /// # 出力例
    ///
    /// ```text
    /// 2+2=?、正确答案:[B] 4、错误答案:[A] 3
    /// ```
    #[default]
    Text,

    /// JSON形式
    ///
    /// 問題ごとのオブジェクトの配列を出力します。
    ///
    /// # 出力例
    ///
    /// ```json
    /// [
    ///   {
    ///     "question": "2+2=?",
    ///     "correct": ["B"],
    ///     "options": {"A": "3", "B": "4"}
    ///   }
    /// ]
    /// ```
    Json,
}
