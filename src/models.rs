use crate::error::AnalyzerError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

pub const DATE_PLACEHOLDER: &str = "N/A";

/// Header of one boundary block of the requested range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    pub round: u64,
    pub timestamp_unix: Option<i64>,
}

impl BlockInfo {
    pub fn from_json(round: u64, block: &Value) -> Self {
        BlockInfo {
            round,
            timestamp_unix: block.get("timestamp").and_then(Value::as_i64),
        }
    }

    /// `YYYY-MM-DD HH:MM:SS UTC`, or `N/A` when the block carries no usable time.
    pub fn date_label(&self) -> String {
        self.timestamp_unix
            .filter(|ts| *ts > 0)
            .and_then(format_timestamp)
            .map(|date| format!("{} UTC", date))
            .unwrap_or_else(|| DATE_PLACEHOLDER.to_string())
    }
}

pub fn format_timestamp(unix: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(unix, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Type-specific part of a transaction. Only the fields the report reads are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxKind {
    Pay {
        receiver: Option<String>,
        amount: Option<u64>,
    },
    AssetTransfer {
        receiver: Option<String>,
        amount: Option<u64>,
        asset_id: Option<u64>,
    },
    AppCall {
        accounts: Vec<String>,
    },
    AssetConfig {
        asset_id: Option<u64>,
    },
    AssetFreeze,
    KeyReg,
    Other(String),
}

impl TxKind {
    pub fn type_tag(&self) -> &str {
        match self {
            TxKind::Pay { .. } => "pay",
            TxKind::AssetTransfer { .. } => "axfer",
            TxKind::AppCall { .. } => "appl",
            TxKind::AssetConfig { .. } => "acfg",
            TxKind::AssetFreeze => "afrz",
            TxKind::KeyReg => "keyreg",
            TxKind::Other(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: Option<String>,
    pub sender: Option<String>,
    pub confirmed_round: Option<u64>,
    pub round_time: Option<i64>,
    pub fee: Option<u64>,
    pub note: Option<String>,
    pub kind: TxKind,
}

impl Transaction {
    /// Reads one entry of an indexer `transactions` array.
    ///
    /// Never fails: a field that is missing or of the wrong JSON type is `None`,
    /// and an unknown or missing `tx-type` becomes [`TxKind::Other`].
    pub fn from_json(tx: &Value) -> Self {
        let tag = str_field(tx, "tx-type").unwrap_or_default();

        let kind = match tag.as_str() {
            "pay" => {
                let pay = section(tx, "payment-transaction");
                TxKind::Pay {
                    receiver: str_field(pay, "receiver"),
                    amount: pay.get("amount").and_then(Value::as_u64),
                }
            }
            "axfer" => {
                let xfer = section(tx, "asset-transfer-transaction");
                TxKind::AssetTransfer {
                    receiver: str_field(xfer, "receiver"),
                    amount: xfer.get("amount").and_then(Value::as_u64),
                    asset_id: xfer.get("asset-id").and_then(Value::as_u64),
                }
            }
            "appl" => TxKind::AppCall {
                accounts: section(tx, "application-transaction")
                    .get("accounts")
                    .and_then(Value::as_array)
                    .map(|accounts| {
                        accounts
                            .iter()
                            .filter_map(|a| a.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            "acfg" => TxKind::AssetConfig {
                asset_id: section(tx, "asset-config-transaction")
                    .get("asset-id")
                    .and_then(Value::as_u64),
            },
            "afrz" => TxKind::AssetFreeze,
            "keyreg" => TxKind::KeyReg,
            _ => TxKind::Other(tag),
        };

        Transaction {
            id: str_field(tx, "id"),
            sender: str_field(tx, "sender"),
            confirmed_round: tx.get("confirmed-round").and_then(Value::as_u64),
            round_time: tx.get("round-time").and_then(Value::as_i64),
            fee: tx.get("fee").and_then(Value::as_u64),
            note: str_field(tx, "note"),
            kind,
        }
    }

    pub fn type_tag(&self) -> &str {
        self.kind.type_tag()
    }
}

static NULL: Value = Value::Null;

fn section<'a>(tx: &'a Value, name: &str) -> &'a Value {
    tx.get(name).unwrap_or(&NULL)
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    pub total_raw: u64,
    pub filtered: u64,
    pub pay_filtered: u64,
    pub appl_filtered: u64,
    pub axfer_filtered: u64,
    pub acfg_filtered: u64,
    pub afrz_filtered: u64,
    pub keyreg_excluded: u64,
    pub zero_pay_excluded: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Summary,
    Detail,
}

impl OutputMode {
    // Unknown or missing values fall back to the summary view
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("detail") | Some("csv") => OutputMode::Detail,
            _ => OutputMode::Summary,
        }
    }
}

/// A result that may be incomplete: `value` holds whatever was gathered and
/// `error` is set when gathering stopped early.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    pub value: T,
    pub error: Option<AnalyzerError>,
}

impl<T> FetchOutcome<T> {
    pub fn complete(value: T) -> Self {
        FetchOutcome { value, error: None }
    }

    pub fn partial(value: T, error: AnalyzerError) -> Self {
        FetchOutcome {
            value,
            error: Some(error),
        }
    }
}
