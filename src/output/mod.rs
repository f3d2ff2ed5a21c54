//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use crate::error::Result;
use crate::types::ParsedQuestion;
use std::io::Write;

pub use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
#[derive(Debug, Clone, Copy)]
pub enum OutputFormatter {
    Text,
    Json,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: crate::api::OutputFormat) -> Self {
        match format {
            crate::api::OutputFormat::Text => OutputFormatter::Text,
            crate::api::OutputFormat::Json => OutputFormatter::Json,
        }
    }

    /// 問題の一覧を指定されたフォーマットで出力する
    pub fn render<W: Write>(&self, questions: &[ParsedQuestion], writer: &mut W) -> Result<()> {
        match self {
            OutputFormatter::Text => TextFormatter.render(questions, writer),
            OutputFormatter::Json => JsonFormatter.render(questions, writer),
        }
    }
}
