/// # Modules Overview
///
/// This crate pulls every transaction confirmed in a range of Voi rounds from a
/// remote indexer, drops network noise (key registrations and zero-amount
/// payments), counts what is left by type and renders either a summary or a
/// CSV export.
///
/// Data flows `range` -> `scanner` -> `classifier` -> `report`/`csv`, with
/// `pipeline` driving one request end to end.

/// `range`
///
/// Validation of the requested round bounds into a `RoundRange`.
pub mod range;

pub mod config;

pub mod error;

/// `client`
///
/// The `IndexerApi` trait and its `reqwest` implementation. Maps transport,
/// HTTP and JSON failures onto `AnalyzerError`.
///
/// Example usage:
/// ```rust,ignore
/// let client = client::IndexerClient::new(&Config::default())?;
/// let block = client.fetch(&client::block_url(client.base_url(), 6891874)).await?;
/// ```
pub mod client;

/// `models`
///
/// Core data structures:
/// * `Transaction` and `TxKind` – A decoded indexer transaction, tagged by type.
/// * `BlockInfo` – Round and timestamp of a boundary block.
/// * `SummaryCounts` – Raw, kept and excluded counters.
/// * `FetchOutcome` – A possibly partial result with its trailing error.
pub mod models;

/// `scanner`
///
/// Boundary block lookup and paginated transaction retrieval over an `IndexerApi`.
///
/// Example usage:
/// ```rust,ignore
/// let boundaries = scanner::resolve_boundaries(&client, &range).await?;
/// let fetched = scanner::fetch_transactions(&client, &range, &config).await;
/// ```
pub mod scanner;

/// `classifier`
///
/// Noise exclusion and per-type counting. Pure, no network access.
pub mod classifier;

/// `report`
///
/// Summary structure, export row derivation (receiver, amount, asset, note)
/// and downloadable documents.
pub mod report;

/// `csv`
///
/// Writes the spreadsheet export: BOM, summary metadata, blank line, then one
/// row per kept transaction.
pub mod csv;

pub mod pipeline;

pub use config::Config;
pub use error::AnalyzerError;
pub use models::{OutputMode, SummaryCounts, Transaction, TxKind};
pub use range::RoundRange;
