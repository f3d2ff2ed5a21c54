//! Formatter Module
//!
//! calamineのセル値をテキストに変換するモジュール。
//! 問題文・選択肢の正規化（[`clean_text`]）もここで提供します。

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::{Display, Write};

use crate::api::DateFormat;

/// 1日あたりのミリ秒数
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// 1900年システムで実在しない 1900-02-29 のシリアル値
const FICTITIOUS_LEAP_DAY: f64 = 60.0;

/// 時刻のみの値（シリアル値 0 以上 1 未満）の書式
const TIME_PATTERN: &str = "%H:%M:%S";

/// セルフォーマッター
///
/// セル値のテキスト化のファサードとして機能します。
#[derive(Debug, Clone)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,

    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new(date_format: DateFormat) -> Self {
        Self {
            date_formatter: DateFormatter { date_format },
            number_formatter: NumberFormatter,
        }
    }

    /// セル値をテキストに変換
    ///
    /// # 引数
    ///
    /// * `cell` - calamineのセル値
    /// * `is_1904` - 1904年エポックを使用するかどうか
    ///
    /// # 戻り値
    ///
    /// * `Some(String)` - テキスト化した値
    /// * `None` - 空セル
    pub fn format_cell(&self, cell: &Data, is_1904: bool) -> Option<String> {
        let text = match cell {
            Data::Empty => return None,
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => self.number_formatter.format(*f),
            Data::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                if dt.is_duration() {
                    self.number_formatter.format(serial)
                } else {
                    self.date_formatter
                        .format(serial, is_1904)
                        .unwrap_or_else(|| self.number_formatter.format(serial))
                }
            }
            Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
            Data::Error(e) => e.to_string(),
        };
        Some(text)
    }
}

/// 日付フォーマッター
///
/// Excelのシリアル日付値を文字列に変換します。
///
/// # エポックシステム
///
/// - 1900年システム（デフォルト）: 1899-12-30 起算。
///   Excelの1900年うるう年バグにより、シリアル値60（1900-02-29、実在しない日）より前は1日ずれる
/// - 1904年システム: 1904-01-01 起算（Mac版Excel）
///
/// シリアル値が 0 以上 1 未満の値は日付を持たない時刻とみなし、
/// どちらのエポックでも `HH:MM:SS` で出力します（`DateFormat` の指定は使わない）。
#[derive(Debug, Clone)]
pub(crate) struct DateFormatter {
    date_format: DateFormat,
}

impl DateFormatter {
    /// シリアル値をフォーマット（範囲外の値、書式に合わない値は `None`）
    pub fn format(&self, serial: f64, is_1904: bool) -> Option<String> {
        if let Some(time) = serial_to_time(serial) {
            return render(time.format(TIME_PATTERN));
        }
        let datetime = serial_to_datetime(serial, is_1904)?;
        render(datetime.format(self.date_format.pattern()))
    }
}

/// 書式化の結果を文字列にする
///
/// タイムゾーン指定子などは日時型によっては書式化に失敗するため `None` を返す。
fn render(value: impl Display) -> Option<String> {
    let mut text = String::new();
    write!(text, "{}", value).ok()?;
    Some(text)
}

fn serial_to_time(serial: f64) -> Option<NaiveTime> {
    if !(0.0..1.0).contains(&serial) {
        return None;
    }
    let millis = (serial * MILLIS_PER_DAY).round();
    // 24:00:00 に丸められる値は翌日の日時として扱う
    if millis >= MILLIS_PER_DAY {
        return None;
    }
    let millis = millis as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(millis / 1000, (millis % 1000) * 1_000_000)
}

fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let epoch = if is_1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else if serial < FICTITIOUS_LEAP_DAY {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };

    let millis = (serial * MILLIS_PER_DAY).round();
    if millis > i64::MAX as f64 {
        return None;
    }
    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::milliseconds(millis as i64))
}

/// 数値フォーマッター
///
/// 整数値は小数点なし（`3`）、それ以外は最短表現（`3.5`）で出力します。
#[derive(Debug, Clone)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    /// 数値をフォーマット
    pub fn format(&self, value: f64) -> String {
        value.to_string()
    }
}

/// 問題文・選択肢テキストの正規化
///
/// 前後の空白を除去し、`\r` を削除、`\n` を半角空白に置き換えます。
///
/// # 使用例
///
/// ```rust
/// use xlsxquiz::clean_text;
///
/// assert_eq!(clean_text("  第一行\r\n第二行 "), "第一行 第二行");
/// ```
pub fn clean_text(raw: &str) -> String {
    raw.trim().replace('\r', "").replace('\n', " ")
}
