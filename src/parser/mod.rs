//! Parser Module
//!
//! calamineを使用したExcelファイル解析と、`xl/workbook.xml` のメタデータ解析。

mod metadata;
mod workbook;

pub(crate) use metadata::WorkbookMetadata;
pub(crate) use workbook::WorkbookParser;
