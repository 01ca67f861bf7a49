use crate::models::{SummaryCounts, Transaction, TxKind};
use log::info;

// Stand-in for a missing amount; only an explicit zero marks a payment as noise
const MISSING_AMOUNT: i128 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Keep,
    KeyRegNoise,
    ZeroPayNoise,
}

fn verdict(tx: &Transaction) -> Verdict {
    match &tx.kind {
        TxKind::KeyReg => Verdict::KeyRegNoise,
        TxKind::Pay { amount, .. } => {
            let amount = amount.map(i128::from).unwrap_or(MISSING_AMOUNT);
            if amount == 0 {
                Verdict::ZeroPayNoise
            } else {
                Verdict::Keep
            }
        }
        _ => Verdict::Keep,
    }
}

/// Drops noise transactions and counts the survivors by type.
/// Survivors keep their input order.
pub fn classify(raw: Vec<Transaction>) -> (Vec<Transaction>, SummaryCounts) {
    let mut counts = SummaryCounts {
        total_raw: raw.len() as u64,
        ..SummaryCounts::default()
    };
    let mut kept = Vec::with_capacity(raw.len());

    for tx in raw {
        match verdict(&tx) {
            Verdict::KeyRegNoise => counts.keyreg_excluded += 1,
            Verdict::ZeroPayNoise => counts.zero_pay_excluded += 1,
            Verdict::Keep => {
                counts.filtered += 1;
                match tx.kind {
                    TxKind::Pay { .. } => counts.pay_filtered += 1,
                    TxKind::AppCall { .. } => counts.appl_filtered += 1,
                    TxKind::AssetTransfer { .. } => counts.axfer_filtered += 1,
                    TxKind::AssetConfig { .. } => counts.acfg_filtered += 1,
                    TxKind::AssetFreeze => counts.afrz_filtered += 1,
                    TxKind::KeyReg | TxKind::Other(_) => {}
                }
                kept.push(tx);
            }
        }
    }

    info!(
        "Classified {} raw transactions: {} kept, {} keyreg and {} zero-amount pay excluded",
        counts.total_raw, counts.filtered, counts.keyreg_excluded, counts.zero_pay_excluded
    );
    (kept, counts)
}
