//! Parser Module
//!
//! calamineを使用したExcelファイル解析の実装。
//! アクティブシートを行単位のテキストとして読み込みます。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets, Xlsx};
use std::io::Cursor;

use crate::error::{Result, XlsxQuizError};
use crate::formatter::CellFormatter;
use crate::parser::WorkbookMetadata;
use crate::security::SecurityConfig;
use crate::types::Row;

/// 読み込んだシートの行データ
#[derive(Debug, Clone)]
pub(crate) struct SheetRows {
    /// シート名
    pub name: String,
    /// A1を起点とした全行（空行を含む）
    pub rows: Vec<Row>,
}

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
    /// `xl/workbook.xml` のメタデータ
    metadata: WorkbookMetadata,
}

impl WorkbookParser {
    /// メモリ上のXLSXファイルを開く
    ///
    /// # 引数
    ///
    /// * `bytes` - XLSXファイルの内容
    /// * `security` - セキュリティ設定
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(XlsxQuizError)` - サイズ制限違反、ZIP/XMLの解析失敗、XLSX以外の形式の場合
    pub fn open(bytes: Vec<u8>, security: &SecurityConfig) -> Result<Self> {
        security.check_input_size(bytes.len() as u64)?;

        // ZIPの検証とメタデータ取得を先に行う
        let metadata = WorkbookMetadata::from_xlsx_bytes(&bytes, security)?;

        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(XlsxQuizError::Parse)?;
        let workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(XlsxQuizError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        Ok(Self { workbook, metadata })
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// アクティブシートの名前
    ///
    /// `activeTab` がシート数を超える場合は最初のシートを使用します。
    pub fn active_sheet_name(&self) -> Result<String> {
        let names = self.sheet_names();
        names
            .get(self.metadata.active_tab)
            .or_else(|| names.first())
            .cloned()
            .ok_or(XlsxQuizError::EmptyInput)
    }

    /// アクティブシートを読み込む
    pub fn read_active_sheet(&mut self, formatter: &CellFormatter) -> Result<SheetRows> {
        let name = self.active_sheet_name()?;
        let range = self
            .workbook
            .worksheet_range(&name)
            .map_err(|e| XlsxQuizError::Parse(e.into()))?;

        let rows = range_to_rows(&range, formatter, self.metadata.is_1904);
        tracing::info!(sheet = %name, rows = rows.len(), "sheet loaded");

        Ok(SheetRows { name, rows })
    }
}

/// calamineの範囲を、A1を起点とした行の列に変換
///
/// calamineの範囲は最初の非空セルから始まるため、先頭の空行・空列を補って
/// 列インデックスをシート上の実際の列に合わせる。
fn range_to_rows(range: &Range<Data>, formatter: &CellFormatter, is_1904: bool) -> Vec<Row> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let leading_cols = start_col as usize;

    let blank_rows = (0..start_row).map(|_| Row::new(vec![None; leading_cols + range.width()]));

    let data_rows = range.rows().map(|cells| {
        let values = std::iter::repeat(None)
            .take(leading_cols)
            .chain(cells.iter().map(|cell| formatter.format_cell(cell, is_1904)))
            .collect();
        Row::new(values)
    });

    blank_rows.chain(data_rows).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DateFormat;

    fn formatter() -> CellFormatter {
        CellFormatter::new(DateFormat::Iso8601)
    }

    #[test]
    fn test_range_to_rows_anchors_at_a1() {
        // B2:C3 の範囲
        let mut range: Range<Data> = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("题目".to_string()));
        range.set_value((1, 2), Data::String("答案".to_string()));
        range.set_value((2, 1), Data::String("问题".to_string()));
        range.set_value((2, 2), Data::Float(1.0));

        let rows = range_to_rows(&range, &formatter(), false);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], Row::new(vec![None, None, None]));
        assert_eq!(rows[1].cell(0), None);
        assert_eq!(rows[1].cell(1), Some("题目"));
        assert_eq!(rows[2].cell(2), Some("1"));
    }

    #[test]
    fn test_range_to_rows_empty() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_rows(&range, &formatter(), false).is_empty());
    }

    #[test]
    fn test_open_rejects_invalid_bytes() {
        let result = WorkbookParser::open(Vec::new(), &SecurityConfig::default());
        assert!(result.is_err());
    }
}

// 実際のXLSXファイルを使った読み込みは統合テスト（tests/）で検証します。
