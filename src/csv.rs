use crate::models::Transaction;
use crate::report::{DetailRow, Document, Summary};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use std::io::Write;

pub const BOM: &[u8] = b"\xEF\xBB\xBF";
pub const CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const TITLE: &str = "Voi Mainnet Transaction Analysis Summary";
pub const COLUMNS: [&str; 10] = [
    "Tx ID",
    "Type",
    "Round",
    "Timestamp (UTC)",
    "Sender",
    "Receiver",
    "Amount",
    "Asset ID",
    "Fee (microVOI)",
    "Note",
];

pub fn export_filename(summary: &Summary, generated_at: DateTime<Utc>) -> String {
    format!(
        "voi_filtered_txns_rounds_{}_to_{}_{}.csv",
        summary.range.min(),
        summary.range.max(),
        generated_at.format("%Y%m%d%H%M%S")
    )
}

pub fn write_transactions_csv<W: Write>(
    mut out: W,
    summary: &Summary,
    transactions: &[Transaction],
) -> csv::Result<()> {
    out.write_all(BOM)?;

    let mut wtr = WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_writer(out);

    wtr.write_record([TITLE])?;
    wtr.write_record(["Parameter", "Value"])?;
    for (label, value) in summary.metadata_rows() {
        wtr.write_record([label, value.as_str()])?;
    }
    let mut out = wtr.into_inner().map_err(|e| e.into_error())?;
    out.write_all(b"\n")?;

    let mut wtr = WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_writer(out);
    wtr.write_record(COLUMNS)?;
    for tx in transactions {
        wtr.serialize(DetailRow::from_transaction(tx))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_document(
    summary: &Summary,
    transactions: &[Transaction],
    generated_at: DateTime<Utc>,
) -> csv::Result<Document> {
    let mut body = Vec::new();
    write_transactions_csv(&mut body, summary, transactions)?;

    Ok(Document {
        filename: export_filename(summary, generated_at),
        content_type: CONTENT_TYPE,
        body,
    })
}
