//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// シートの1行分のセル値
///
/// ヘッダー行・データ行の両方に使用します。列インデックスがそのまま列の識別子です。
/// 行がヘッダーより短い場合（末尾セルの欠落）でも、範囲外アクセスは空として扱われ、
/// エラーにはなりません。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<Option<String>>,
}

impl Row {
    /// セル値の列から行を生成
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// 文字列の列から行を生成（空文字列は空セルとして扱う）
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxquiz::Row;
    ///
    /// let header = Row::from_texts(["题目", "A", "B", "正确答案"]);
    /// assert_eq!(header.len(), 4);
    /// assert_eq!(header.cell(3), Some("正确答案"));
    /// assert_eq!(header.cell(10), None);
    /// ```
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells = texts
            .into_iter()
            .map(Into::into)
            .map(|s: String| if s.is_empty() { None } else { Some(s) })
            .collect();
        Self { cells }
    }

    /// 列数
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// セルが1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 生のセル値（範囲外・空セルは `None`）
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    /// 前後の空白を除去したセル値（範囲外・空セルは空文字列）
    pub fn text(&self, index: usize) -> &str {
        self.cell(index).map(str::trim).unwrap_or("")
    }
}

/// 列の役割がどの規則で決まったか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    /// ヘッダーのキーワード・文字一致で検出
    Header,
    /// ヘッダーで検出できず、位置による既定規則を適用
    Fallback,
    /// データ行の平均文字数による補正
    DataLength,
}

/// 選択肢ラベルと列インデックスの対応
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionColumn {
    /// 選択肢ラベル（`A`, `B`, ...）
    pub letter: char,
    /// 列インデックス（0始まり）
    pub column: usize,
}

/// 列推定の結果
///
/// 一度生成された後は変更されません。補正は新しい値を返します。
///
/// 不変条件: `option_columns` には正解列が含まれない。問題列も含まれないが、
/// すべての列が使用済みで問題列が0列目に縮退した場合のみ例外となる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    /// ヘッダー行の列数
    pub(crate) column_count: usize,
    pub(crate) question_column: Option<usize>,
    pub(crate) answer_column: usize,
    /// 検出順（ラベル順ではない）
    pub(crate) option_columns: Vec<OptionColumn>,
    pub(crate) question_source: RoleSource,
    pub(crate) answer_source: RoleSource,
    pub(crate) option_source: RoleSource,
}

impl ColumnRoles {
    /// ヘッダー行の列数
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// 問題文の列
    pub fn question_column(&self) -> Option<usize> {
        self.question_column
    }

    /// 問題文の列（未決定の場合は0列目）
    pub fn question_index(&self) -> usize {
        self.question_column.unwrap_or(0)
    }

    /// 正解の列
    pub fn answer_column(&self) -> usize {
        self.answer_column
    }

    /// 選択肢の列（検出順）
    pub fn option_columns(&self) -> &[OptionColumn] {
        &self.option_columns
    }

    /// 選択肢ラベルに対応する列
    pub fn option_column(&self, letter: char) -> Option<usize> {
        self.option_columns
            .iter()
            .find(|o| o.letter == letter)
            .map(|o| o.column)
    }

    /// 選択肢ラベル（アルファベット順）
    pub fn option_letters(&self) -> Vec<char> {
        let mut letters: Vec<char> = self.option_columns.iter().map(|o| o.letter).collect();
        letters.sort_unstable();
        letters
    }

    /// 選択肢の数
    pub fn option_count(&self) -> usize {
        self.option_columns.len()
    }

    /// 指定した列が正解列または選択肢列として使われているか
    pub fn is_claimed(&self, column: usize) -> bool {
        column == self.answer_column || self.option_columns.iter().any(|o| o.column == column)
    }

    /// 問題列の決定規則
    pub fn question_source(&self) -> RoleSource {
        self.question_source
    }

    /// 正解列の決定規則
    pub fn answer_source(&self) -> RoleSource {
        self.answer_source
    }

    /// 選択肢列の決定規則
    pub fn option_source(&self) -> RoleSource {
        self.option_source
    }
}

/// データ行1行分の問題
///
/// 出力時にのみ使われ、永続化されません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuestion {
    /// 問題文（正規化済み）
    #[serde(rename = "question")]
    pub text: String,
    /// 正解の選択肢ラベル
    #[serde(rename = "correct")]
    pub correct_labels: BTreeSet<char>,
    /// 選択肢ラベル -> 選択肢テキスト（正規化済み、空文字列を含み得る）
    #[serde(rename = "options")]
    pub option_texts: BTreeMap<char, String>,
}

impl ParsedQuestion {
    /// 正解グループ（テキストが空でない正解の選択肢、ラベル順）
    pub fn correct_options(&self) -> impl Iterator<Item = (char, &str)> {
        self.present_options()
            .filter(|(letter, _)| self.correct_labels.contains(letter))
    }

    /// 不正解グループ（テキストが空でないその他の選択肢、ラベル順）
    pub fn wrong_options(&self) -> impl Iterator<Item = (char, &str)> {
        self.present_options()
            .filter(|(letter, _)| !self.correct_labels.contains(letter))
    }

    fn present_options(&self) -> impl Iterator<Item = (char, &str)> {
        self.option_texts
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(letter, text)| (*letter, text.as_str()))
    }
}
