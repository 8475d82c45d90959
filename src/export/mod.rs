//! Export of parsed data to workbooks and tabular files.

pub mod sheet;
pub mod table;
pub mod workbook;

pub use sheet::{SheetLayout, SheetNamer, build_sheet_layout, sheet_base_name};
pub use table::{TableFormat, write_table};
pub use workbook::{
    Selection, WorkbookExporter, all_headings_of, default_output_path, export_re1_to_xlsx,
};
