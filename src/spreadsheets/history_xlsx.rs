use crate::domain::HistoricalRecord;
use crate::errors::StoreError;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

const HEADERS: [&str; 5] = ["Offer", "Item", "Quantity", "School", "Collected On"];

/// Render the collection history as an XLSX workbook in memory.
pub fn history_workbook(records: &[HistoricalRecord]) -> Result<Workbook, StoreError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    worksheet
        .set_name("History")
        .map_err(|e| StoreError::Xlsx(format!("Failed to name worksheet: {e}")))?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| StoreError::Xlsx(format!("Failed to write header '{header}': {e}")))?;
    }

    for (i, record) in records.iter().enumerate() {
        let r = (i + 1) as u32;
        let date = record.collection_date.format("%Y-%m-%d").to_string();
        let cells = [
            record.offer_id.as_str(),
            record.item.as_str(),
            record.quantity.as_str(),
            record.school_code.as_str(),
            date.as_str(),
        ];

        for (col, value) in cells.iter().enumerate() {
            worksheet
                .write_string(r, col as u16, *value)
                .map_err(|e| {
                    StoreError::Xlsx(format!(
                        "Failed to write offer {} column {}: {e}",
                        record.offer_id, HEADERS[col]
                    ))
                })?;
        }
    }

    Ok(workbook)
}

pub fn export_history_xlsx(records: &[HistoricalRecord], path: &Path) -> Result<(), StoreError> {
    let mut workbook = history_workbook(records)?;
    workbook
        .save(path)
        .map_err(|e| StoreError::Xlsx(format!("Failed to save {}: {e}", path.display())))
}
