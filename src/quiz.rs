//! Quiz Sheet Module
//!
//! 読み込んだシート（ヘッダー行＋データ行）から問題を組み立てるモジュール。

use std::collections::BTreeMap;

use crate::answer::parse_answer_labels;
use crate::detect::{detect_columns, refine_question_column};
use crate::error::{Result, XlsxQuizError};
use crate::formatter::clean_text;
use crate::types::{ColumnRoles, ParsedQuestion, Row};

/// ヘッダー行とデータ行からなるシート
///
/// 読み込み後は変更されません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSheet {
    header: Row,
    rows: Vec<Row>,
}

impl QuizSheet {
    /// 行の列からシートを生成（先頭行をヘッダーとする）
    ///
    /// # 戻り値
    ///
    /// * `Ok(QuizSheet)` - 1行以上ある場合
    /// * `Err(XlsxQuizError::EmptyInput)` - 行が1つもない場合
    pub fn from_rows(rows: Vec<Row>) -> Result<Self> {
        let mut rows = rows.into_iter();
        let header = rows.next().ok_or(XlsxQuizError::EmptyInput)?;
        Ok(Self {
            header,
            rows: rows.collect(),
        })
    }

    /// ヘッダー行
    pub fn header(&self) -> &Row {
        &self.header
    }

    /// データ行
    pub fn data_rows(&self) -> &[Row] {
        &self.rows
    }

    /// 列の役割を推定する（ヘッダーパスの後、データパスで問題列を補正）
    pub fn detect_roles(&self) -> ColumnRoles {
        let roles = detect_columns(&self.header);
        refine_question_column(&roles, &self.rows)
    }

    /// すべてのデータ行から問題を組み立てる
    ///
    /// 問題文が空の行は読み飛ばします。
    pub fn questions(&self, roles: &ColumnRoles) -> Vec<ParsedQuestion> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let question = parse_question(row, roles);
                if question.is_none() {
                    // ヘッダーを1行目として数えた行番号
                    tracing::trace!(row = index + 2, "skipping row without question text");
                }
                question
            })
            .collect()
    }
}

/// データ行1行から問題を組み立てる
///
/// 問題文が（正規化後に）空の場合は `None` を返します。
pub fn parse_question(row: &Row, roles: &ColumnRoles) -> Option<ParsedQuestion> {
    let text = clean_text(row.cell(roles.question_index()).unwrap_or(""));
    if text.is_empty() {
        return None;
    }

    let option_texts: BTreeMap<char, String> = roles
        .option_columns()
        .iter()
        .map(|o| (o.letter, clean_text(row.cell(o.column).unwrap_or(""))))
        .collect();

    let correct_labels = parse_answer_labels(row.cell(roles.answer_column()), roles.option_count());

    Some(ParsedQuestion {
        text,
        correct_labels,
        option_texts,
    })
}
