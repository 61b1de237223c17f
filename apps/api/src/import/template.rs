use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::reader::{HEADERS, SHEET_NAME};

pub const TEMPLATE_FILE_NAME: &str = "Template_Empleados.xlsx";

const EXAMPLE_ROW: [&str; 14] = [
    "12345678",
    "Juan",
    "Pérez",
    "1990-01-15",
    "Calle Falsa 123",
    "3001234567",
    "juan.perez@email.com",
    "Desarrollador",
    "3000000",
    "2020-01-01",
    "Activo",
    "Profesional",
    "Enfoque analítico y habilidades de comunicación",
    "Tecnología",
];

/// Builds the downloadable import template: bold header row plus one example row.
pub fn build_template() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (col, value) in EXAMPLE_ROW.iter().enumerate() {
        sheet.write_string(1, col as u16, *value)?;
    }
    sheet.autofit();

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::reader::SpreadsheetReader;

    #[test]
    fn test_template_passes_structure_validation() {
        let bytes = build_template().unwrap();
        assert!(SpreadsheetReader::validate_structure(&bytes));
    }

    #[test]
    fn test_template_example_row_reads_back() {
        let bytes = build_template().unwrap();
        let rows = SpreadsheetReader::default().read(&bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].document, "12345678");
        assert_eq!(rows[0].email, "juan.perez@email.com");
        assert_eq!(rows[0].department, "Tecnología");
    }
}
