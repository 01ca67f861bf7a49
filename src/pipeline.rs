use crate::classifier::classify;
use crate::client::IndexerApi;
use crate::config::Config;
use crate::error::{AnalyzerError, Result};
use crate::models::{OutputMode, SummaryCounts, Transaction};
use crate::range::RoundRange;
use crate::report::{fetch_error_document, Rendered, Summary, INCOMPLETE_PREFIX};
use crate::scanner::{fetch_transactions, resolve_boundaries, Boundaries};
use chrono::{DateTime, Utc};
use log::info;

/// Everything one request learned about a round range.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub range: RoundRange,
    pub boundaries: Boundaries,
    pub counts: SummaryCounts,
    pub transactions: Vec<Transaction>,
    pub fetch_error: Option<AnalyzerError>,
}

/// Resolves boundaries, pages the transactions and classifies them.
///
/// Only a boundary failure is returned as `Err`; a pagination failure is kept
/// in [`Analysis::fetch_error`] next to the partial data.
pub async fn analyze_rounds<A>(api: &A, range: RoundRange, config: &Config) -> Result<Analysis>
where
    A: IndexerApi + ?Sized,
{
    info!("Analyzing rounds {} ({} blocks)", range, range.block_count());

    let boundaries = resolve_boundaries(api, &range).await?;
    let fetched = fetch_transactions(api, &range, config).await;
    let (transactions, counts) = classify(fetched.value);

    Ok(Analysis {
        range,
        boundaries,
        counts,
        transactions,
        fetch_error: fetched.error,
    })
}

/// [`analyze_rounds`] bounded by the configured overall deadline.
pub async fn analyze_with_deadline<A>(
    api: &A,
    range: RoundRange,
    config: &Config,
) -> Result<Analysis>
where
    A: IndexerApi + ?Sized,
{
    tokio::time::timeout(config.deadline, analyze_rounds(api, range, config))
        .await
        .map_err(|_| AnalyzerError::DeadlineExceeded(config.deadline.as_secs()))?
}

/// Message shown to the user when the request cannot produce any output.
pub fn fatal_message(error: &AnalyzerError) -> String {
    match error {
        AnalyzerError::InvalidRange(_) | AnalyzerError::DeadlineExceeded(_) => error.to_string(),
        _ => format!("Error fetching block details: {}", error),
    }
}

impl Analysis {
    pub fn summary(&self) -> Summary {
        Summary {
            range: self.range,
            block_count: self.range.block_count(),
            start_date: self.boundaries.start_date(),
            end_date: self.boundaries.end_date(),
            counts: self.counts,
            incomplete: self
                .fetch_error
                .as_ref()
                .map(|e| format!("{}{}", INCOMPLETE_PREFIX, e)),
        }
    }

    pub fn render(&self, mode: OutputMode, generated_at: DateTime<Utc>) -> csv::Result<Rendered> {
        match (mode, &self.fetch_error) {
            (OutputMode::Summary, _) => Ok(Rendered::Summary(self.summary())),
            (OutputMode::Detail, Some(error)) => Ok(Rendered::FetchError(fetch_error_document(
                &self.range,
                &error.to_string(),
                self.counts.filtered,
            ))),
            (OutputMode::Detail, None) => {
                crate::csv::export_document(&self.summary(), &self.transactions, generated_at)
                    .map(Rendered::Export)
            }
        }
    }
}
