//! Security Tests
//!
//! 入力に対する制限のテストケースを実装します。
//! ZIP bomb攻撃、パストラバーサル、入力サイズ上限への対策を検証します。

use std::io::{Cursor, Write};
use xlsxquiz::{ConverterBuilder, XlsxQuizError};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

fn zip_with_entries(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip_data = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut zip_data));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);

        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content).unwrap();
        }

        zip.finish().unwrap();
    }
    zip_data
}

/// ZIP bomb攻撃のテスト: 大量のファイルを含むZIPアーカイブ
#[test]
fn test_zip_bomb_too_many_files() {
    // 10,001個のファイルを含むZIPアーカイブを作成（上限: 10,000）
    let mut zip_data = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut zip_data));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);

        for i in 0..10_001 {
            let file_name = format!("xl/file{}.xml", i);
            zip.start_file(file_name, options).unwrap();
            zip.write_all(b"test").unwrap();
        }

        zip.finish().unwrap();
    }

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert(Cursor::new(zip_data), &mut Vec::new());

    match result {
        Err(XlsxQuizError::SecurityViolation(msg)) => {
            assert!(msg.contains("too many files"));
        }
        e => panic!("Expected SecurityViolation, got {:?}", e),
    }
}

/// パストラバーサル攻撃のテスト: `..` を含むパス
#[test]
fn test_path_traversal_dotdot() {
    let zip_data = zip_with_entries(&[
        ("xl/workbook.xml", b"<workbook/>"),
        ("../../etc/passwd", b"malicious"),
    ]);

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert(Cursor::new(zip_data), &mut Vec::new());

    match result {
        Err(XlsxQuizError::SecurityViolation(msg)) => {
            assert!(msg.contains("Path traversal"));
        }
        e => panic!("Expected SecurityViolation, got {:?}", e),
    }
}

/// パストラバーサル攻撃のテスト: 絶対パス
#[test]
fn test_path_traversal_absolute_path() {
    let zip_data = zip_with_entries(&[
        ("xl/workbook.xml", b"<workbook/>"),
        ("/etc/passwd", b"malicious"),
    ]);

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert(Cursor::new(zip_data), &mut Vec::new());

    match result {
        Err(XlsxQuizError::SecurityViolation(msg)) => {
            assert!(msg.contains("Absolute path"));
        }
        e => panic!("Expected SecurityViolation, got {:?}", e),
    }
}

/// 入力サイズ上限のテスト（上限はビルダーで小さく設定）
#[test]
fn test_input_file_size_limit() {
    let zip_data = zip_with_entries(&[("xl/workbook.xml", b"<workbook/>")]);

    let converter = ConverterBuilder::new()
        .with_max_input_size(16)
        .build()
        .unwrap();
    let result = converter.convert(Cursor::new(zip_data), &mut Vec::new());

    match result {
        Err(XlsxQuizError::SecurityViolation(msg)) => {
            assert!(msg.contains("Input file size"));
        }
        e => panic!("Expected SecurityViolation, got {:?}", e),
    }
}

/// ZIPではない入力はセキュリティエラーではなくZIPエラーになる
#[test]
fn test_non_zip_input() {
    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert(Cursor::new(b"plain text".to_vec()), &mut Vec::new());
    assert!(matches!(result, Err(XlsxQuizError::Zip(_))));
}

/// 正常な構造のZIPではセキュリティエラーにならないことを確認
#[test]
fn test_valid_structure_is_not_a_security_violation() {
    let zip_data = zip_with_entries(&[
        ("xl/workbook.xml", b"<?xml version=\"1.0\"?><workbook/>"),
        ("xl/worksheets/sheet1.xml", b"<?xml version=\"1.0\"?><worksheet/>"),
    ]);

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert(Cursor::new(zip_data), &mut Vec::new());

    // XLSXとして不完全なため解析エラーにはなり得るが、セキュリティエラーではない
    if let Err(XlsxQuizError::SecurityViolation(msg)) = result {
        panic!("Should not trigger security violation: {}", msg);
    }
}
