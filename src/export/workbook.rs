//! xlsx rendering of sheet layouts

use super::sheet::{
    DATA_START_ROW, FIRST_DOF_COL, HEADER_ROW, SheetLayout, SheetNamer, UNIT_ROW,
    build_sheet_layout, sheet_base_name,
};
use crate::config::ExportConfig;
use crate::constants::DATA_NUMBER_FORMAT;
use crate::error::{Re1Error, Result};
use crate::models::Re1Data;
use crate::parser::parse_re1_file;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A (speed index, heading index) pair to export
pub type Selection = (usize, usize);

/// Every heading of one speed
pub fn all_headings_of(data: &Re1Data, speed_index: usize) -> Result<Vec<Selection>> {
    let speed = data.speed(speed_index)?;
    Ok((0..speed.heads.len()).map(|ih| (speed_index, ih)).collect())
}

/// Renders parsed .re1 data into a formatted workbook
#[derive(Debug, Clone, Default)]
pub struct WorkbookExporter {
    config: ExportConfig,
}

impl WorkbookExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Layouts for the selections, with unique sheet names
    pub fn layouts(&self, data: &Re1Data, selections: &[Selection]) -> Result<Vec<SheetLayout>> {
        let mut namer = SheetNamer::new();
        selections
            .iter()
            .map(|&(speed_index, heading_index)| {
                let speed = data.speed(speed_index)?;
                let heading = speed.heads.get(heading_index).copied().ok_or_else(|| {
                    Re1Error::out_of_bounds("heading", heading_index, speed.heads.len())
                })?;
                let base = sheet_base_name(heading, self.config.sheet_name_prefix.as_deref());
                let name = namer.unique(&base);
                build_sheet_layout(data, speed_index, heading_index, &self.config, name)
            })
            .collect()
    }

    /// Build the workbook in memory
    pub fn render(&self, data: &Re1Data, selections: &[Selection]) -> Result<Workbook> {
        let layouts = self.layouts(data, selections)?;
        let mut workbook = Workbook::new();
        let formats = SheetFormats::new();

        for layout in &layouts {
            let worksheet = workbook.add_worksheet();
            write_layout(worksheet, layout, &formats)?;
            debug!("Wrote sheet {} with {} rows", layout.name, layout.rows.len());
        }
        Ok(workbook)
    }

    /// Serialise the workbook to xlsx bytes
    pub fn to_buffer(&self, data: &Re1Data, selections: &[Selection]) -> Result<Vec<u8>> {
        let mut workbook = self.render(data, selections)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Write the workbook to `path`
    pub fn save(&self, data: &Re1Data, selections: &[Selection], path: &Path) -> Result<()> {
        let mut workbook = self.render(data, selections)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        workbook.save(path)?;
        info!("Saved {} sheet(s) to {}", selections.len(), path.display());
        Ok(())
    }
}

/// Default output path: `<stem>_rao.xlsx` next to the input
pub fn default_output_path(re1_path: &Path) -> PathBuf {
    let stem = re1_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    re1_path.with_file_name(format!("{}_rao.xlsx", stem))
}

/// Parse a file and export the chosen headings of one speed (all when `None`)
pub fn export_re1_to_xlsx(
    re1_path: &Path,
    output: Option<&Path>,
    speed_index: usize,
    heading_indices: Option<&[usize]>,
    config: ExportConfig,
) -> Result<PathBuf> {
    let data = parse_re1_file(re1_path)?;
    let selections = match heading_indices {
        Some(indices) => indices.iter().map(|&ih| (speed_index, ih)).collect(),
        None => all_headings_of(&data, speed_index)?,
    };

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(re1_path));
    WorkbookExporter::new(config).save(&data, &selections, &output)?;
    Ok(output)
}

struct SheetFormats {
    title: Format,
    header: Format,
    number: Format,
}

impl SheetFormats {
    fn new() -> Self {
        Self {
            title: Format::new().set_bold(),
            header: Format::new().set_bold().set_align(FormatAlign::Center),
            number: Format::new().set_num_format(DATA_NUMBER_FORMAT),
        }
    }
}

fn write_layout(worksheet: &mut Worksheet, layout: &SheetLayout, formats: &SheetFormats) -> Result<()> {
    worksheet.set_name(&layout.name)?;

    for cell in &layout.metadata {
        if cell.row == 0 && cell.col == 0 {
            worksheet.write_string_with_format(cell.row, cell.col, &cell.text, &formats.title)?;
        } else {
            worksheet.write_string(cell.row, cell.col, &cell.text)?;
        }
    }

    worksheet.write_string_with_format(HEADER_ROW, 0, "Wave frequency", &formats.header)?;
    worksheet.write_string_with_format(UNIT_ROW, 0, "rad/sec", &formats.header)?;
    for (i, group) in layout.groups.iter().enumerate() {
        let col = FIRST_DOF_COL + 2 * i as u16;
        worksheet.merge_range(HEADER_ROW, col, HEADER_ROW, col + 1, &group.name, &formats.header)?;
        worksheet.write_string_with_format(UNIT_ROW, col, group.amplitude_unit, &formats.header)?;
        worksheet.write_string_with_format(UNIT_ROW, col + 1, "Phase (deg)", &formats.header)?;
    }

    for (r, row) in layout.rows.iter().enumerate() {
        let excel_row = DATA_START_ROW + r as u32;
        write_number(worksheet, excel_row, 0, row.omega, &formats.number)?;
        for (i, value) in row.values.iter().enumerate() {
            let col = FIRST_DOF_COL + 2 * i as u16;
            if let Some((amplitude, phase)) = value {
                write_number(worksheet, excel_row, col, *amplitude, &formats.number)?;
                write_number(worksheet, excel_row, col + 1, *phase, &formats.number)?;
            }
        }
    }

    let last_col = FIRST_DOF_COL + 2 * layout.groups.len() as u16;
    worksheet.set_column_width(0, 26)?;
    for col in FIRST_DOF_COL..last_col {
        worksheet.set_column_width(col, 13)?;
    }
    for row in 0..HEADER_ROW - 1 {
        worksheet.set_row_height(row, 18)?;
    }
    Ok(())
}

/// Excel has no NaN or infinity; such cells are left blank
fn write_number(worksheet: &mut Worksheet, row: u32, col: u16, value: f64, format: &Format) -> Result<()> {
    if value.is_finite() {
        worksheet.write_number_with_format(row, col, value, format)?;
    }
    Ok(())
}
