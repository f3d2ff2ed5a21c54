//! Security Module
//!
//! 入力ファイルに対する制限を実装するモジュール。
//! 入力サイズ上限、ZIP bomb、パストラバーサルを検出します。

use std::io::{Read, Seek};
use zip::ZipArchive;

use crate::error::{Result, XlsxQuizError};

/// 入力ファイルの既定の最大サイズ（2GB）
pub(crate) const DEFAULT_MAX_INPUT_SIZE: u64 = 2_147_483_648;

/// セキュリティ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    pub max_input_size: u64,
    /// ZIPアーカイブ内の最大エントリ数
    pub max_entry_count: usize,
    /// 単一エントリの展開後の最大サイズ（バイト、100MB）
    pub max_entry_size: u64,
    /// 展開後の合計最大サイズ（バイト、1GB）
    pub max_decompressed_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_entry_count: 10_000,
            max_entry_size: 104_857_600,
            max_decompressed_size: 1_073_741_824,
        }
    }
}

impl SecurityConfig {
    /// 入力ファイルのサイズを検証
    pub fn check_input_size(&self, size: u64) -> Result<()> {
        if size > self.max_input_size {
            return Err(XlsxQuizError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                size, self.max_input_size
            )));
        }
        Ok(())
    }

    /// ZIPアーカイブのエントリ数・サイズ・パスを検証
    pub fn check_archive<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<()> {
        if archive.len() > self.max_entry_count {
            return Err(XlsxQuizError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                archive.len(),
                self.max_entry_count
            )));
        }

        let mut total = 0u64;
        for i in 0..archive.len() {
            let entry = archive
                .by_index(i)
                .map_err(|e| XlsxQuizError::Zip(e.to_string()))?;

            validate_zip_path(entry.name()).map_err(|e| {
                XlsxQuizError::SecurityViolation(format!("Invalid ZIP path: {}", e))
            })?;

            if entry.size() > self.max_entry_size {
                return Err(XlsxQuizError::SecurityViolation(format!(
                    "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                    entry.name(),
                    entry.size(),
                    self.max_entry_size
                )));
            }

            total = total.saturating_add(entry.size());
            if total > self.max_decompressed_size {
                return Err(XlsxQuizError::SecurityViolation(format!(
                    "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                    total, self.max_decompressed_size
                )));
            }
        }

        Ok(())
    }
}

/// ZIPエントリのパスを検証
///
/// 空のパス、絶対パス、`..`、バックスラッシュを含むパスを拒否します。
pub(crate) fn validate_zip_path(path: &str) -> std::result::Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    let has_drive_prefix = path.len() >= 2
        && path.as_bytes()[0].is_ascii_alphabetic()
        && path.as_bytes()[1] == b':';
    if path.starts_with('/') || has_drive_prefix {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    if path.split('/').any(|segment| segment == "..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    Ok(())
}
