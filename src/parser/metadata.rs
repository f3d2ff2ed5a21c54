//! XML Metadata Parser Module
//!
//! XLSX内部の `xl/workbook.xml` から、calamineで取得できない情報を抽出するモジュール。
//! アクティブシートのインデックスと1904年エポック判定を提供します。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::{Result, XlsxQuizError};
use crate::security::SecurityConfig;

const WORKBOOK_PART: &str = "xl/workbook.xml";

/// ワークブックのメタデータ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct WorkbookMetadata {
    /// アクティブシートのインデックス（`<workbookView activeTab="n"/>`、既定は0）
    pub active_tab: usize,
    /// 1904年エポックを使用するかどうか（`<workbookPr date1904="1"/>`）
    pub is_1904: bool,
}

impl WorkbookMetadata {
    /// XLSXファイル（ZIPアーカイブ）のバイト列からメタデータを解析
    ///
    /// アーカイブはセキュリティ制限で検証してから読み込みます。
    /// `xl/workbook.xml` が存在しない場合は既定値を返します。
    pub fn from_xlsx_bytes(bytes: &[u8], security: &SecurityConfig) -> Result<Self> {
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).map_err(|e| XlsxQuizError::Zip(e.to_string()))?;
        security.check_archive(&mut archive)?;

        let mut part = match archive.by_name(WORKBOOK_PART) {
            Ok(part) => part,
            Err(_) => return Ok(Self::default()),
        };

        let mut xml = Vec::new();
        part.read_to_end(&mut xml)?;
        Self::parse_workbook_xml(&xml)
    }

    /// `xl/workbook.xml` の内容を解析
    pub fn parse_workbook_xml(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut metadata = Self::default();
        let mut seen_view = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"workbookPr" => {
                        if let Some(value) = attribute(&e, b"date1904")? {
                            metadata.is_1904 = value == "1" || value == "true";
                        }
                    }
                    // 複数のビューがある場合は最初のビューに従う
                    b"workbookView" if !seen_view => {
                        seen_view = true;
                        if let Some(value) = attribute(&e, b"activeTab")? {
                            metadata.active_tab = value.trim().parse().unwrap_or(0);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxQuizError::Xml(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(metadata)
    }
}

/// 要素の属性値を取得
fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| XlsxQuizError::Xml(format!("XML attribute error: {}", e)))?;
        if attr.key.local_name().as_ref() == key {
            let value = std::str::from_utf8(&attr.value)?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}
