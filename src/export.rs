//! Export surface: the currently filtered visit table as a downloadable
//! CSV byte stream, filename stamped with the current date.

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::visits::VisitRecord;

/// Serialize the filtered table with the exact wire columns the collection
/// app uses, so an export round-trips through the same tooling.
pub fn to_csv_bytes(records: &[VisitRecord]) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record.to_row())?;
    }
    writer.flush().map_err(csv::Error::from)?;
    writer
        .into_inner()
        .map_err(|e| StoreError::Encode(csv::Error::from(std::io::Error::other(e.to_string()))))
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("dados_solares_{}.csv", today.format("%Y%m%d"))
}
