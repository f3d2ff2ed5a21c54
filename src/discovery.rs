//! Input Discovery Module
//!
//! 入力ファイルの決定。`--input` が指定されなかった場合は、
//! 呼び出し側から渡された検索ディレクトリの xlsx ファイルを探します。

use std::path::{Path, PathBuf};

use crate::error::{Result, XlsxQuizError};

/// ディレクトリ直下の xlsx ファイルを列挙する
///
/// 拡張子は大文字小文字を区別しません。結果はファイル名順です。
pub fn list_xlsx_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let is_xlsx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
            .unwrap_or(false);

        if is_xlsx {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// 入力ファイルを決定する
///
/// # 引数
///
/// * `provided` - 明示的に指定されたパス（指定があればそのまま使用）
/// * `search_dir` - 未指定時に xlsx ファイルを探すディレクトリ
///
/// # 戻り値
///
/// * `Ok(PathBuf)` - 入力ファイル
/// * `Err(XlsxQuizError::NoInputFound)` - 候補が1つもない場合
/// * `Err(XlsxQuizError::AmbiguousInput)` - 候補が複数ある場合
pub fn resolve_input(provided: Option<&Path>, search_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = provided {
        return Ok(path.to_path_buf());
    }

    let mut candidates = list_xlsx_files(search_dir)?;
    match candidates.len() {
        0 => Err(XlsxQuizError::NoInputFound {
            dir: search_dir.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(XlsxQuizError::AmbiguousInput {
            dir: search_dir.to_path_buf(),
            candidates,
        }),
    }
}
