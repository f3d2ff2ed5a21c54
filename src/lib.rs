//! xlsxquiz - Convert quiz spreadsheets (XLSX) into one-line-per-question text
//!
//! 問題集のExcelファイル（XLSX）を読み込み、列の役割（問題文・選択肢・正解）を
//! ヘッダーとデータから推定して、1行1問のテキストに変換します。
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlsxquiz::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let summary = converter.convert_file(Path::new("quiz.xlsx"), Path::new("questions.txt"))?;
//!     println!("{} questions from '{}'", summary.questions, summary.sheet_name);
//!     Ok(())
//! }
//! ```
//!
//! # Column Detection
//!
//! ```rust
//! use xlsxquiz::{detect_columns, refine_question_column, Row};
//!
//! let header = Row::from_texts(["编号", "内容", "A", "B", "答案"]);
//! let rows = vec![Row::from_texts(["1", "地球是圆的吗？", "是", "否", "A"])];
//!
//! let roles = refine_question_column(&detect_columns(&header), &rows);
//! assert_eq!(roles.question_column(), Some(1));
//! assert_eq!(roles.answer_column(), 4);
//! ```
//!
//! # Output Line
//!
//! ```rust
//! use xlsxquiz::{detect_columns, QuizSheet, Row, format_question_line};
//!
//! # fn main() -> Result<(), xlsxquiz::XlsxQuizError> {
//! let sheet = QuizSheet::from_rows(vec![
//!     Row::from_texts(["题目", "A", "B", "正确答案"]),
//!     Row::from_texts(["2+2=?", "3", "4", "B"]),
//! ])?;
//! let roles = sheet.detect_roles();
//! let lines: Vec<String> = sheet.questions(&roles).iter().map(format_question_line).collect();
//! assert_eq!(lines, vec!["2+2=?、正确答案:[B] 4、错误答案:[A] 3"]);
//! # Ok(())
//! # }
//! ```

mod answer;
mod api;
mod builder;
mod detect;
mod discovery;
mod error;
mod formatter;
pub mod logging;
mod output;
mod parser;
mod quiz;
mod security;
mod types;

// 公開API
pub use answer::parse_answer_labels;
pub use api::{DateFormat, OutputFormat};
pub use builder::{ConversionSummary, Converter, ConverterBuilder};
pub use detect::{detect_columns, refine_question_column};
pub use discovery::{list_xlsx_files, resolve_input};
pub use error::{Result, XlsxQuizError};
pub use formatter::clean_text;
pub use output::format_question_line;
pub use quiz::{parse_question, QuizSheet};
pub use types::{ColumnRoles, OptionColumn, ParsedQuestion, RoleSource, Row};
