//! Answer Key Parser Module
//!
//! 正解欄のセル値から、正解の選択肢ラベルの集合を求めるモジュール。

use std::collections::BTreeSet;

/// 正解欄のセル値を選択肢ラベルの集合に変換する
///
/// # 規則
///
/// 1. 値が空なら空集合
/// 2. 大文字化した値に含まれる `A`〜`Z` をすべて集める。1文字でもあればそれを返す（文字モード優先）
/// 3. 文字がなければ、連続する10進数字（半角・全角などUnicodeの10進数字）を1始まりの選択肢番号として読む。
///    数字以外の文字（`,` `/` 空白 `、` など）はすべて区切りとして扱う
/// 4. `1 <= n <= option_count` の番号のみ `A + n - 1` に変換し、範囲外は捨てる
///
/// 文字モードでは `option_count` による範囲チェックを行いません（数字モードとの非対称性は既知の挙動）。
/// この関数は失敗しません。解釈できない値は空集合になります。
///
/// # 使用例
///
/// ```rust
/// use xlsxquiz::parse_answer_labels;
///
/// let labels = parse_answer_labels(Some("1/3"), 4);
/// assert_eq!(labels.into_iter().collect::<String>(), "AC");
///
/// assert!(parse_answer_labels(Some("9"), 1).is_empty());
/// assert!(parse_answer_labels(None, 4).is_empty());
/// ```
pub fn parse_answer_labels(raw: Option<&str>, option_count: usize) -> BTreeSet<char> {
    let Some(raw) = raw else {
        return BTreeSet::new();
    };
    let upper = raw.to_uppercase();

    let letters: BTreeSet<char> = upper.chars().filter(char::is_ascii_uppercase).collect();
    if !letters.is_empty() {
        return letters;
    }

    option_numbers(&upper)
        .filter(|n| (1..=option_count).contains(n))
        .filter_map(option_letter)
        .collect()
}

/// 1始まりの選択肢番号をラベルに変換（`Z` を超える番号は `None`）
fn option_letter(number: usize) -> Option<char> {
    u8::try_from(number - 1)
        .ok()
        .filter(|offset| *offset < 26)
        .map(|offset| char::from(b'A' + offset))
}

/// 数字の連続を選択肢番号として取り出す
///
/// 桁あふれする番号は範囲外として読み飛ばす。
fn option_numbers(s: &str) -> impl Iterator<Item = usize> + '_ {
    s.split(|c: char| decimal_digit(c).is_none())
        .filter(|run| !run.is_empty())
        .filter_map(|run| {
            run.chars().try_fold(0usize, |acc, c| {
                let digit = decimal_digit(c)?;
                acc.checked_mul(10)?.checked_add(digit as usize)
            })
        })
}

/// Unicode 15.0 の10進数字（一般カテゴリ Nd）の各ブロックの `0` のコードポイント
///
/// Nd の数字は `0`〜`9` が連続して並ぶため、先頭からの差がそのまま値になる。
const DECIMAL_ZEROS: [u32; 68] = [
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6,
    0x0C66, 0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0,
    0x1810, 0x1946, 0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620,
    0xA8D0, 0xA900, 0xA9D0, 0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066,
    0x110F0, 0x11136, 0x111D0, 0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0,
    0x11950, 0x11C50, 0x11D50, 0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8,
    0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// 10進数字を数値に変換
///
/// 半角・全角に加え、アラビア・インド系などUnicodeの10進数字（Nd）をすべて受け付ける。
/// 上付き数字や丸数字など Nd 以外の数字は区切りとして扱う。
fn decimal_digit(c: char) -> Option<u32> {
    let code = c as u32;
    DECIMAL_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&code))
        .map(|&zero| code - zero)
}
