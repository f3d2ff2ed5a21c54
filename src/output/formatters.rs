//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use crate::error::{Result, XlsxQuizError};
use crate::types::ParsedQuestion;
use std::io::Write;

/// UTF-8のバイトオーダーマーク
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 問題文と正解グループの区切り
const CORRECT_LABEL: &str = "正确答案:";
/// 正解グループと不正解グループの区切り
const WRONG_LABEL: &str = "错误答案:";
/// 項目の区切り（読点）
const ITEM_SEPARATOR: &str = "、";

/// 1問を1行のテキストに整形する
///
/// 形式: `<問題文>、正确答案:<正解>、错误答案:<不正解>`。
/// 各項目は `[<ラベル>] <選択肢テキスト>` で、グループ内は `、` で連結します。
///
/// # 使用例
///
/// ```rust
/// use std::collections::{BTreeMap, BTreeSet};
/// use xlsxquiz::{format_question_line, ParsedQuestion};
///
/// let question = ParsedQuestion {
///     text: "2+2=?".to_string(),
///     correct_labels: BTreeSet::from(['B']),
///     option_texts: BTreeMap::from([('A', "3".to_string()), ('B', "4".to_string())]),
/// };
/// assert_eq!(
///     format_question_line(&question),
///     "2+2=?、正确答案:[B] 4、错误答案:[A] 3"
/// );
/// ```
pub fn format_question_line(question: &ParsedQuestion) -> String {
    let correct = join_items(question.correct_options());
    let wrong = join_items(question.wrong_options());
    [
        question.text.as_str(),
        ITEM_SEPARATOR,
        CORRECT_LABEL,
        correct.as_str(),
        ITEM_SEPARATOR,
        WRONG_LABEL,
        wrong.as_str(),
    ]
    .concat()
}

fn join_items<'a>(items: impl Iterator<Item = (char, &'a str)>) -> String {
    items
        .map(|(letter, text)| format!("[{}] {}", letter, text))
        .collect::<Vec<_>>()
        .join(ITEM_SEPARATOR)
}

/// テキスト形式のフォーマッター
///
/// BOMを先頭に書き、各行を `\n` で区切る。最終行の後に改行は入れない。
pub struct TextFormatter;

impl TextFormatter {
    pub fn render<W: Write>(&self, questions: &[ParsedQuestion], writer: &mut W) -> Result<()> {
        writer.write_all(UTF8_BOM)?;
        for (index, question) in questions.iter().enumerate() {
            if index > 0 {
                writer.write_all(b"\n")?;
            }
            writer.write_all(format_question_line(question).as_bytes())?;
        }
        Ok(())
    }
}

/// JSON形式のフォーマッター
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(&self, questions: &[ParsedQuestion], writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, questions)
            .map_err(|e| XlsxQuizError::Io(std::io::Error::other(e)))?;
        Ok(())
    }
}
