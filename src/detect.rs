//! Column Detection Module
//!
//! ヘッダー行とデータ行から、問題列・正解列・選択肢列を推定するモジュール。
//!
//! 推定は2段階で行います。
//!
//! 1. ヘッダーパス（[`detect_columns`]）: ヘッダーを左から右へ1回走査し、
//!    キーワード・文字一致で各役割を先着順に割り当てる。見つからない役割には既定規則を適用する。
//! 2. データパス（[`refine_question_column`]）: 正解列・選択肢列以外の列のうち、
//!    平均文字数が最大の列を問題列とする。ヘッダーパスの結果を常に上書きする。

use crate::types::{ColumnRoles, OptionColumn, RoleSource, Row};

/// 問題列を示すキーワード（部分一致）
const QUESTION_KEYWORDS: &[&str] = &["题目", "问", "标题"];
/// 問題列を示す英語キーワード（大文字小文字を区別しない）
const QUESTION_KEYWORD_EN: &str = "question";

/// 正解列を示すキーワード（部分一致）
const ANSWER_KEYWORDS: &[&str] = &["正确", "答案"];
/// 正解列を示す英語キーワード（大文字小文字を区別しない）
const ANSWER_KEYWORD_EN: &str = "answer";

/// 選択肢列を示すキーワード
const OPTION_KEYWORD: &str = "选项";

/// ヘッダーから検出できる選択肢ラベル
const HEADER_OPTION_LETTERS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// 既定規則で割り当てる選択肢ラベルの上限
const FALLBACK_OPTION_LIMIT: usize = 26;

/// 役割の決定結果（どの規則で決まったかを保持する）
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolved<T> {
    Detected(T),
    Fallback(T),
}

impl<T> Resolved<T> {
    fn into_parts(self) -> (T, RoleSource) {
        match self {
            Resolved::Detected(value) => (value, RoleSource::Header),
            Resolved::Fallback(value) => (value, RoleSource::Fallback),
        }
    }
}

/// ヘッダー走査の途中結果
#[derive(Debug, Default)]
struct HeaderScan {
    question: Option<usize>,
    answer: Option<usize>,
    options: Vec<OptionColumn>,
}

impl HeaderScan {
    fn run(headers: &Row) -> Self {
        let mut scan = Self::default();

        for index in 0..headers.len() {
            let header = headers.text(index);

            if scan.question.is_none() && is_question_header(header) {
                scan.question = Some(index);
                continue;
            }

            if scan.answer.is_none() && is_answer_header(header) {
                scan.answer = Some(index);
                continue;
            }

            let letter = HEADER_OPTION_LETTERS
                .iter()
                .copied()
                .filter(|letter| !scan.has_letter(*letter))
                .find(|letter| is_option_header(header, *letter));

            if let Some(letter) = letter {
                scan.options.push(OptionColumn {
                    letter,
                    column: index,
                });
            }
        }

        scan
    }

    fn has_letter(&self, letter: char) -> bool {
        self.options.iter().any(|o| o.letter == letter)
    }
}

fn is_question_header(header: &str) -> bool {
    QUESTION_KEYWORDS.iter().any(|k| header.contains(k))
        || header.to_lowercase().contains(QUESTION_KEYWORD_EN)
}

fn is_answer_header(header: &str) -> bool {
    ANSWER_KEYWORDS.iter().any(|k| header.contains(k))
        || header.to_lowercase().contains(ANSWER_KEYWORD_EN)
}

/// ヘッダーが選択肢ラベル `letter` の列かどうか
///
/// ヘッダーが `letter` と完全一致するか、`letter` を含み、かつ
/// 「选项」を含むか `letter` で始まる場合に一致とみなす。大文字小文字は区別する。
fn is_option_header(header: &str, letter: char) -> bool {
    let mut chars = header.chars();
    if chars.next() == Some(letter) && chars.next().is_none() {
        return true;
    }
    header.contains(letter) && (header.contains(OPTION_KEYWORD) || header.starts_with(letter))
}

/// 問題列・正解列以外のすべての列に、左から順に A, B, C, ... を割り当てる
fn sequential_options(
    column_count: usize,
    question: Option<usize>,
    answer: usize,
) -> Vec<OptionColumn> {
    (0..column_count)
        .filter(|&index| Some(index) != question && index != answer)
        .zip(('A'..='Z').take(FALLBACK_OPTION_LIMIT))
        .map(|(column, letter)| OptionColumn { letter, column })
        .collect()
}

/// ヘッダー行から列の役割を推定する（ヘッダーパス）
///
/// # 規則
///
/// 1. 問題列: ヘッダーが「题目」「问」「标题」「question」のいずれかを含む最初の列
/// 2. 正解列: ヘッダーが「正确」「答案」「answer」のいずれかを含む最初の列。
///    見つからない場合は最後の列
/// 3. 選択肢列: 未割り当ての列について A〜H を順に試し、最初に一致したラベルを割り当てる。
///    各ラベルは最初に一致した列のみが保持する
/// 4. 選択肢列が1つも検出されない場合、問題列・正解列以外の列に A, B, C, ... を順に割り当てる
/// 5. 問題列が見つからない場合、正解列・選択肢列以外の最初の列。なければ0列目
///
/// ヘッダーが空・重複・データより短い場合でもエラーにはならず、既定規則に縮退します。
///
/// # 使用例
///
/// ```rust
/// use xlsxquiz::{detect_columns, Row};
///
/// let roles = detect_columns(&Row::from_texts(["题目", "A", "B", "正确答案"]));
/// assert_eq!(roles.question_column(), Some(0));
/// assert_eq!(roles.answer_column(), 3);
/// assert_eq!(roles.option_column('B'), Some(2));
/// ```
pub fn detect_columns(headers: &Row) -> ColumnRoles {
    let column_count = headers.len();
    let scan = HeaderScan::run(headers);

    let answer = match scan.answer {
        Some(index) => Resolved::Detected(index),
        None => Resolved::Fallback(column_count.saturating_sub(1)),
    };
    let (answer_column, answer_source) = answer.into_parts();

    // 既定の正解列が選択肢として検出済みの場合、その選択肢は取り消す
    let detected_options: Vec<OptionColumn> = scan
        .options
        .into_iter()
        .filter(|o| o.column != answer_column)
        .collect();

    let options = if detected_options.is_empty() {
        Resolved::Fallback(sequential_options(
            column_count,
            scan.question,
            answer_column,
        ))
    } else {
        Resolved::Detected(detected_options)
    };
    let (option_columns, option_source) = options.into_parts();

    let question = match scan.question {
        Some(index) => Resolved::Detected(index),
        None => {
            let free = (0..column_count).find(|&index| {
                index != answer_column && option_columns.iter().all(|o| o.column != index)
            });
            Resolved::Fallback(free.unwrap_or(0))
        }
    };
    let (question_column, question_source) = question.into_parts();

    ColumnRoles {
        column_count,
        question_column: Some(question_column),
        answer_column,
        option_columns,
        question_source,
        answer_source,
        option_source,
    }
}

/// データ行の平均文字数から問題列を決め直す（データパス）
///
/// 正解列・選択肢列以外の列について、空でないセル（前後空白除去後）の平均文字数を求め、
/// 最大の列を問題列とします。同値の場合は左側の列を優先します。
/// 候補列に空でない値が1つもない場合は、既存の問題列をそのまま残します。
/// それ以外の場合、ヘッダーパスの結果は常に上書きされます。
pub fn refine_question_column(roles: &ColumnRoles, data_rows: &[Row]) -> ColumnRoles {
    let mut best: Option<(usize, f64)> = None;

    for column in (0..roles.column_count).filter(|&c| !roles.is_claimed(c)) {
        let average = average_text_length(data_rows, column);
        if best.map_or(true, |(_, best_average)| average > best_average) {
            best = Some((column, average));
        }
    }

    match best {
        Some((column, average)) if average > 0.0 => {
            tracing::debug!(column, average, "question column refined by text length");
            ColumnRoles {
                question_column: Some(column),
                question_source: RoleSource::DataLength,
                ..roles.clone()
            }
        }
        _ => roles.clone(),
    }
}

/// 列の空でないセルの平均文字数（空でないセルがなければ0.0）
fn average_text_length(rows: &[Row], column: usize) -> f64 {
    let (total, count) = rows
        .iter()
        .map(|row| row.text(column))
        .filter(|text| !text.is_empty())
        .fold((0usize, 0usize), |(total, count), text| {
            (total + text.chars().count(), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(texts: &[&str]) -> Row {
        Row::from_texts(texts.iter().copied())
    }

    fn letters(roles: &ColumnRoles) -> Vec<(char, usize)> {
        roles
            .option_columns()
            .iter()
            .map(|o| (o.letter, o.column))
            .collect()
    }

    #[test]
    fn test_detect_standard_layout() {
        let roles = detect_columns(&headers(&["题目", "A", "B", "C", "D", "正确答案"]));
        assert_eq!(roles.question_column(), Some(0));
        assert_eq!(roles.answer_column(), 5);
        assert_eq!(
            letters(&roles),
            vec![('A', 1), ('B', 2), ('C', 3), ('D', 4)]
        );
        assert_eq!(roles.question_source(), RoleSource::Header);
        assert_eq!(roles.answer_source(), RoleSource::Header);
        assert_eq!(roles.option_source(), RoleSource::Header);
    }

    #[test]
    fn test_detect_english_headers_case_insensitive() {
        let roles = detect_columns(&headers(&["Answer", "Question Text", "A", "B"]));
        assert_eq!(roles.question_column(), Some(1));
        assert_eq!(roles.answer_column(), 0);
        assert_eq!(letters(&roles), vec![('A', 2), ('B', 3)]);
    }

    #[test]
    fn test_detect_option_keyword_headers() {
        let roles = detect_columns(&headers(&["问题", "选项A", "选项B", "选项C", "答案"]));
        assert_eq!(roles.question_column(), Some(0));
        assert_eq!(roles.answer_column(), 4);
        assert_eq!(letters(&roles), vec![('A', 1), ('B', 2), ('C', 3)]);
    }

    #[test]
    fn test_detect_letter_prefix_headers() {
        // 「A.」「B:」のように文字で始まるヘッダー
        let roles = detect_columns(&headers(&["标题", "A.", "B:", "正确"]));
        assert_eq!(letters(&roles), vec![('A', 1), ('B', 2)]);
    }

    #[test]
    fn test_option_match_is_case_sensitive() {
        // 小文字の「a」「b」は選択肢として検出されず、既定規則が適用される
        let roles = detect_columns(&headers(&["题目", "a", "b", "答案"]));
        assert_eq!(roles.option_source(), RoleSource::Fallback);
        assert_eq!(letters(&roles), vec![('A', 1), ('B', 2)]);
    }

    #[test]
    fn test_letter_contained_without_keyword_is_not_option() {
        // 「XA」は A を含むが「选项」も A 始まりでもない
        let roles = detect_columns(&headers(&["题目", "XA", "B", "答案"]));
        assert_eq!(letters(&roles), vec![('B', 2)]);
    }

    #[test]
    fn test_duplicate_letter_keeps_first_column() {
        let roles = detect_columns(&headers(&["题目", "A", "A", "B", "答案"]));
        assert_eq!(letters(&roles), vec![('A', 1), ('B', 3)]);
    }

    #[test]
    fn test_duplicate_letter_tries_next_letter() {
        // 「选项AB」は A が使用済みのため、次に一致する B を割り当てる
        let roles = detect_columns(&headers(&["题目", "A", "选项AB", "答案"]));
        assert_eq!(letters(&roles), vec![('A', 1), ('B', 2)]);
    }

    #[test]
    fn test_insertion_order_is_detection_order() {
        let roles = detect_columns(&headers(&["题目", "C", "A", "B", "答案"]));
        assert_eq!(letters(&roles), vec![('C', 1), ('A', 2), ('B', 3)]);
        assert_eq!(roles.option_letters(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn test_second_question_header_is_not_question() {
        let roles = detect_columns(&headers(&["题目", "问题2", "A", "答案"]));
        assert_eq!(roles.question_column(), Some(0));
        assert_eq!(letters(&roles), vec![('A', 2)]);
    }

    #[test]
    fn test_answer_defaults_to_last_column() {
        let roles = detect_columns(&headers(&["题目", "A", "B", "Key"]));
        assert_eq!(roles.answer_column(), 3);
        assert_eq!(roles.answer_source(), RoleSource::Fallback);
        assert_eq!(letters(&roles), vec![('A', 1), ('B', 2)]);
    }

    #[test]
    fn test_default_answer_column_is_never_an_option() {
        // 最後の列が「C」でも、既定の正解列になるため選択肢から外れる
        let roles = detect_columns(&headers(&["题目", "A", "B", "C"]));
        assert_eq!(roles.answer_column(), 3);
        assert_eq!(letters(&roles), vec![('A', 1), ('B', 2)]);
    }

    #[test]
    fn test_fallback_options_when_none_detected() {
        let roles = detect_columns(&headers(&["题目", "选一", "选二", "选三", "答案"]));
        assert_eq!(roles.option_source(), RoleSource::Fallback);
        assert_eq!(letters(&roles), vec![('A', 1), ('B', 2), ('C', 3)]);
    }

    #[test]
    fn test_fallback_question_column() {
        let roles = detect_columns(&headers(&["A", "B", "Stem", "答案"]));
        assert_eq!(roles.question_column(), Some(2));
        assert_eq!(roles.question_source(), RoleSource::Fallback);
    }

    #[test]
    fn test_fallback_question_column_when_all_claimed() {
        let roles = detect_columns(&headers(&["A", "B", "答案"]));
        assert_eq!(roles.question_column(), Some(0));
        assert_eq!(roles.question_source(), RoleSource::Fallback);
    }

    #[test]
    fn test_empty_header_row() {
        let roles = detect_columns(&Row::default());
        assert_eq!(roles.question_column(), Some(0));
        assert_eq!(roles.answer_column(), 0);
        assert!(roles.option_columns().is_empty());
    }

    #[test]
    fn test_all_blank_headers_fall_back() {
        let roles = detect_columns(&Row::new(vec![None, None, None, None]));
        assert_eq!(roles.answer_column(), 3);
        // 問題列が未定のため、正解列以外のすべての列が選択肢になる
        assert_eq!(letters(&roles), vec![('A', 0), ('B', 1), ('C', 2)]);
        assert_eq!(roles.question_column(), Some(0));
    }

    #[test]
    fn test_detect_is_idempotent() {
        let header = headers(&["题目", "A", "B", "正确答案"]);
        assert_eq!(detect_columns(&header), detect_columns(&header));
    }

    #[test]
    fn test_refine_prefers_longest_column() {
        let header = headers(&["编号", "说明", "A", "B", "答案"]);
        let roles = detect_columns(&header);
        assert_eq!(roles.question_column(), Some(0));

        let rows = vec![
            Row::from_texts(["1", "下列哪一项是质数？", "4", "5", "B"]),
            Row::from_texts(["2", "地球绕太阳一周需要多久？", "一天", "一年", "B"]),
        ];
        let refined = refine_question_column(&roles, &rows);
        assert_eq!(refined.question_column(), Some(1));
        assert_eq!(refined.question_source(), RoleSource::DataLength);
    }

    #[test]
    fn test_refine_overrides_header_keyword() {
        let header = headers(&["题目", "备注", "A", "B", "答案"]);
        let roles = detect_columns(&header);
        let rows = vec![Row::from_texts(["1", "这是一段很长的题干文字", "x", "y", "A"])];
        let refined = refine_question_column(&roles, &rows);
        assert_eq!(refined.question_column(), Some(1));
    }

    #[test]
    fn test_refine_tie_keeps_lowest_index() {
        let header = headers(&["x", "y", "A", "答案"]);
        let roles = detect_columns(&header);
        let rows = vec![Row::from_texts(["abc", "def", "o", "A"])];
        let refined = refine_question_column(&roles, &rows);
        assert_eq!(refined.question_column(), Some(0));
    }

    #[test]
    fn test_refine_without_values_keeps_previous() {
        let header = headers(&["备注", "题目", "A", "答案"]);
        let roles = detect_columns(&header);
        assert_eq!(roles.question_column(), Some(1));
        let refined = refine_question_column(&roles, &[Row::from_texts(["", "  ", "x", "A"])]);
        assert_eq!(refined, roles);

        let refined = refine_question_column(&roles, &[]);
        assert_eq!(refined, roles);
    }

    #[test]
    fn test_refine_ignores_columns_beyond_header() {
        let header = headers(&["题目", "A", "答案"]);
        let roles = detect_columns(&header);
        let rows = vec![Row::from_texts([
            "短",
            "x",
            "A",
            "a much longer trailing cell outside the header",
        ])];
        let refined = refine_question_column(&roles, &rows);
        assert_eq!(refined.question_column(), Some(0));
    }

    #[test]
    fn test_refine_with_short_rows() {
        let header = headers(&["题目", "说明", "A", "答案"]);
        let roles = detect_columns(&header);
        let rows = vec![Row::from_texts(["长一点的问题"]), Row::default()];
        let refined = refine_question_column(&roles, &rows);
        assert_eq!(refined.question_column(), Some(0));
    }

    #[test]
    fn test_average_text_length_counts_characters() {
        let rows = vec![Row::from_texts(["题目一"]), Row::from_texts(["ab"]), Row::default()];
        assert_eq!(average_text_length(&rows, 0), 2.5);
        assert_eq!(average_text_length(&rows, 3), 0.0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_keyword_columns_found_at_any_position(
                width in 2usize..10,
                seed in any::<(usize, usize)>()
            ) {
                let question = seed.0 % width;
                let answer = (question + 1 + seed.1 % (width - 1)) % width;
                let texts: Vec<String> = (0..width)
                    .map(|i| match i {
                        i if i == question => "题目".to_string(),
                        i if i == answer => "正确答案".to_string(),
                        i => format!("x{}", i),
                    })
                    .collect();

                let roles = detect_columns(&Row::from_texts(texts));
                prop_assert_eq!(roles.question_column(), Some(question));
                prop_assert_eq!(roles.answer_column(), answer);
                prop_assert!(roles.option_columns().iter().all(|o| o.column != question));
            }

            #[test]
            fn test_options_never_claim_answer_and_letters_are_unique(
                texts in proptest::collection::vec("[A-Hx选项题目答案 ]{0,4}", 0..12)
            ) {
                let roles = detect_columns(&Row::from_texts(texts));
                let letters = roles.option_letters();
                let mut unique = letters.clone();
                unique.dedup();
                prop_assert_eq!(letters, unique);
                prop_assert!(roles.option_columns().iter().all(|o| o.column != roles.answer_column()));
            }

            #[test]
            fn test_refine_picks_a_longest_candidate(
                lengths in proptest::collection::vec(0usize..20, 1..5)
            ) {
                // 候補列（0..n）の後ろに選択肢Aと正解列を置く
                let n = lengths.len();
                let mut header: Vec<String> = (0..n).map(|i| format!("x{}", i)).collect();
                header.push("A".to_string());
                header.push("答案".to_string());
                let mut row: Vec<String> = lengths.iter().map(|&l| "字".repeat(l)).collect();
                row.push("opt".to_string());
                row.push("A".to_string());

                let roles = detect_columns(&Row::from_texts(header));
                let refined = refine_question_column(&roles, &[Row::from_texts(row)]);

                let max = lengths.iter().copied().max().unwrap_or(0);
                if max == 0 {
                    prop_assert_eq!(refined, roles);
                } else {
                    let expected = lengths.iter().position(|&l| l == max);
                    prop_assert_eq!(refined.question_column(), expected);
                    prop_assert_eq!(refined.question_source(), RoleSource::DataLength);
                }
            }
        }
    }
}
