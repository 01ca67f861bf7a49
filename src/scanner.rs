use crate::client::{block_url, transactions_url, IndexerApi};
use crate::config::Config;
use crate::error::{AnalyzerError, Result};
use crate::models::{BlockInfo, FetchOutcome, Transaction};
use crate::range::RoundRange;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashSet;

/// First and last block of a range. For a single-round range both are the same block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundaries {
    pub start: BlockInfo,
    pub end: BlockInfo,
}

impl Boundaries {
    pub fn start_date(&self) -> String {
        self.start.date_label()
    }

    pub fn end_date(&self) -> String {
        self.end.date_label()
    }
}

pub async fn resolve_boundaries<A>(api: &A, range: &RoundRange) -> Result<Boundaries>
where
    A: IndexerApi + ?Sized,
{
    let start = fetch_block(api, range.min()).await?;
    let end = if range.is_single() {
        start.clone()
    } else {
        fetch_block(api, range.max()).await?
    };

    info!(
        "Resolved rounds {} ({}) to {} ({})",
        start.round,
        start.date_label(),
        end.round,
        end.date_label()
    );
    Ok(Boundaries { start, end })
}

async fn fetch_block<A>(api: &A, round: u64) -> Result<BlockInfo>
where
    A: IndexerApi + ?Sized,
{
    let block = match api.fetch(&block_url(api.base_url(), round)).await {
        Ok(block) => block,
        Err(AnalyzerError::NotFound) => return Err(AnalyzerError::BlockNotFound(round)),
        Err(e) => return Err(e),
    };

    let info = BlockInfo::from_json(round, &block);
    let has_time = info.timestamp_unix.is_some_and(|ts| ts > 0);
    // round 0 legitimately comes back empty on some indexers
    if !has_time && is_empty(&block) && round > 0 {
        return Err(AnalyzerError::BlockNotFound(round));
    }

    Ok(info)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Pages through every transaction confirmed in `range`, in indexer order.
///
/// A failed page stops the walk; whatever was collected before it comes back
/// together with the error.
pub async fn fetch_transactions<A>(
    api: &A,
    range: &RoundRange,
    config: &Config,
) -> FetchOutcome<Vec<Transaction>>
where
    A: IndexerApi + ?Sized,
{
    let mut transactions: Vec<Transaction> = Vec::new();
    let mut used_tokens: HashSet<String> = HashSet::new();
    let mut next: Option<String> = None;
    let mut page = 0u32;

    loop {
        page += 1;
        let url = match transactions_url(api.base_url(), range, config.page_limit, next.as_deref()) {
            Ok(url) => url,
            Err(e) => return FetchOutcome::partial(transactions, e),
        };

        let response = match api.fetch(&url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    "Transaction page {} failed after {} transactions: {}",
                    page,
                    transactions.len(),
                    e
                );
                return FetchOutcome::partial(transactions, e);
            }
        };

        let on_page = response
            .get("transactions")
            .and_then(Value::as_array)
            .map(|txs| txs.as_slice())
            .unwrap_or_default();
        transactions.extend(on_page.iter().map(Transaction::from_json));
        info!(
            "Fetched page {} ({} transactions, {} so far)",
            page,
            on_page.len(),
            transactions.len()
        );

        let token = response
            .get("next-token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty());
        match token {
            None => break,
            Some(token) => {
                if !used_tokens.insert(token.to_string()) {
                    return FetchOutcome::partial(
                        transactions,
                        AnalyzerError::RepeatedToken(token.to_string()),
                    );
                }
                debug!("Continuing with token {}", token);
                next = Some(token.to_string());
                tokio::time::sleep(config.page_delay).await;
            }
        }
    }

    FetchOutcome::complete(transactions)
}
