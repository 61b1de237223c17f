pub mod handlers;
pub mod reader;
pub mod reconciler;
pub mod resolver;
pub mod template;

use tracing::{info, warn};

use crate::store::{EmployeeStore, ReferenceStore};
use reader::{ParsePolicy, SpreadsheetReader};
use reconciler::{ImportResult, Reconciler};

/// Reads an uploaded workbook and reconciles it against the employee store.
pub struct ImportService<'a> {
    reader: SpreadsheetReader,
    reconciler: Reconciler<'a>,
}

impl<'a> ImportService<'a> {
    pub fn new(
        policy: ParsePolicy,
        employees: &'a dyn EmployeeStore,
        references: &'a dyn ReferenceStore,
    ) -> Self {
        Self {
            reader: SpreadsheetReader::new(policy),
            reconciler: Reconciler::new(employees, references),
        }
    }

    pub async fn import(&self, bytes: &[u8]) -> ImportResult {
        let rows = match self.reader.read(bytes) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Spreadsheet could not be read: {e}");
                return ImportResult::default().general_failure(e);
            }
        };
        info!("Read {} employee rows from spreadsheet", rows.len());

        let start = ImportResult {
            messages: vec![format!("Se leyeron {} registros del Excel", rows.len())],
            ..ImportResult::default()
        };
        self.reconciler.import_all(&rows, start).await
    }
}
