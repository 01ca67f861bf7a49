use crate::models::{format_timestamp, SummaryCounts, Transaction, TxKind};
use crate::range::RoundRange;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const BINARY_NOTE: &str = "(Base64/Binary)";
pub const NATIVE_ASSET: &str = "VOI";
// Standard alphabet, padding optional
const NOTE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub const INCOMPLETE_PREFIX: &str = "Error during transaction fetch (results might be incomplete): ";

/// Display-ready result of one analysis, without the transactions themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub range: RoundRange,
    pub block_count: u64,
    pub start_date: String,
    pub end_date: String,
    pub counts: SummaryCounts,
    pub incomplete: Option<String>,
}

impl Summary {
    /// Key/value pairs heading the CSV export.
    pub fn metadata_rows(&self) -> Vec<(&'static str, String)> {
        let c = &self.counts;
        vec![
            ("Round Range", self.range.to_string()),
            ("Number of Blocks", self.block_count.to_string()),
            ("Start Block Timestamp (UTC)", self.start_date.clone()),
            ("End Block Timestamp (UTC)", self.end_date.clone()),
            ("Total Filtered Transactions", c.filtered.to_string()),
            ("- Payment ('pay') Txns", c.pay_filtered.to_string()),
            ("- Application Call ('appl') Txns", c.appl_filtered.to_string()),
            ("- Asset Transfer ('axfer') Txns", c.axfer_filtered.to_string()),
            ("- Asset Config ('acfg') Txns", c.acfg_filtered.to_string()),
            ("- Asset Freeze ('afrz') Txns", c.afrz_filtered.to_string()),
            ("Excluded 'keyreg' Txns", c.keyreg_excluded.to_string()),
            ("Excluded 0-Amount 'pay' Txns", c.zero_pay_excluded.to_string()),
            ("Raw Transactions Checked", c.total_raw.to_string()),
        ]
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        if let Some(notice) = &self.incomplete {
            writeln!(f, "Error: {}", notice)?;
            writeln!(f)?;
        }
        writeln!(f, "Analysis Summary")?;
        writeln!(f, "Round Range: {} to {}", self.range.min(), self.range.max())?;
        writeln!(f, "Number of Blocks Checked: {}", self.block_count)?;
        writeln!(f, "Start Block Time (UTC): {}", self.start_date)?;
        writeln!(f, "End Block Time (UTC): {}", self.end_date)?;
        writeln!(f, "----")?;
        writeln!(f, "Total Filtered Transactions: {}", c.filtered)?;
        writeln!(f, "  - Payment ('pay') Txns: {}", c.pay_filtered)?;
        writeln!(f, "  - Application Call ('appl') Txns: {}", c.appl_filtered)?;
        writeln!(f, "  - Asset Transfer ('axfer') Txns: {}", c.axfer_filtered)?;
        writeln!(f, "  - Asset Config ('acfg') Txns: {}", c.acfg_filtered)?;
        writeln!(f, "  - Asset Freeze ('afrz') Txns: {}", c.afrz_filtered)?;
        writeln!(f, "----")?;
        writeln!(f, "Excluded 'keyreg' Txns: {}", c.keyreg_excluded)?;
        write!(f, "Excluded 0-Amount 'pay' Txns: {}", c.zero_pay_excluded)
    }
}

/// One export line, fields in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub tx_id: String,
    pub tx_type: String,
    pub round: String,
    pub timestamp: String,
    pub sender: String,
    pub receiver: String,
    pub amount: String,
    pub asset_id: String,
    pub fee: String,
    pub note: String,
}

impl DetailRow {
    pub fn from_transaction(tx: &Transaction) -> Self {
        let receiver = match &tx.kind {
            TxKind::Pay { receiver, .. } | TxKind::AssetTransfer { receiver, .. } => {
                receiver.clone()
            }
            TxKind::AppCall { accounts } => accounts.first().cloned(),
            _ => None,
        };

        let amount = match &tx.kind {
            TxKind::Pay { amount, .. } | TxKind::AssetTransfer { amount, .. } => *amount,
            _ => None,
        };

        let asset_id = match &tx.kind {
            TxKind::AssetTransfer { asset_id: Some(id), .. }
            | TxKind::AssetConfig { asset_id: Some(id) } => id.to_string(),
            TxKind::Pay { .. } => NATIVE_ASSET.to_string(),
            _ => String::new(),
        };

        DetailRow {
            tx_id: tx.id.clone().unwrap_or_default(),
            tx_type: tx.type_tag().to_string(),
            round: tx.confirmed_round.map(|r| r.to_string()).unwrap_or_default(),
            timestamp: tx.round_time.and_then(format_timestamp).unwrap_or_default(),
            sender: tx.sender.clone().unwrap_or_default(),
            receiver: receiver.unwrap_or_default(),
            amount: amount.unwrap_or(0).to_string(),
            asset_id,
            fee: tx.fee.unwrap_or(0).to_string(),
            note: decode_note(tx.note.as_deref()),
        }
    }
}

/// Readable note text, the binary placeholder, or empty when there is no note.
pub fn decode_note(note: Option<&str>) -> String {
    let Some(raw) = note.filter(|n| !n.is_empty()) else {
        return String::new();
    };

    NOTE_ENGINE
        .decode(raw)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| BINARY_NOTE.to_string())
}

/// A file handed back to the caller for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Document {
    pub fn save_into(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(&self.filename);
        fs::write(&path, &self.body)?;
        Ok(path)
    }
}

/// What the caller receives for a finished analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Summary(Summary),
    Export(Document),
    FetchError(Document),
}

pub fn fetch_error_document(range: &RoundRange, error: &str, partial_filtered: u64) -> Document {
    let body = format!(
        "An error occurred while fetching transactions, CSV could not be generated.\n\
         Round Range: {} - {}\n\
         Error: {}\n\n\
         Partial Filtered Count: {}",
        range.min(),
        range.max(),
        error,
        partial_filtered
    );

    Document {
        filename: "ERROR_fetching_transactions.txt".to_string(),
        content_type: "text/plain",
        body: body.into_bytes(),
    }
}
