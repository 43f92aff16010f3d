//! Office Open XML writers.
//!
//! [`DocxWriter`] serializes a flow document and [`XlsxWriter`] a spreadsheet
//! model. Both build every part in memory and zip them in path order, so
//! output depends only on the input and the creation timestamp.

mod docx;
mod error;
mod package;
mod xlsx;

pub use docx::{DEFAULT_TABLE_STYLE, DocxWriter};
pub use error::{OoxmlError, Result};
pub use package::{DocumentProperties, escape_xml};
pub use xlsx::{XlsxWriter, column_letter};
