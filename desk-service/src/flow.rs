//! Result submission flow
//!
//! Turns raw operator-typed tokens into one atomic ledger append. Parsing is
//! deliberately lenient: non-digit characters are stripped and anything left
//! empty counts as 0, so `"12abc"` is 12 and `"-"` is 0. Negative amounts
//! cannot occur. Either the whole validated submission lands as one row, or
//! nothing is appended.

use crate::error::Result;
use room_control::OperatorId;
use shift_ledger::{LedgerRow, LedgerStore, OperatorKey};
use std::collections::HashMap;
use std::sync::Arc;

/// Strip non-digits and parse; empty or fully non-numeric is 0
pub fn parse_amount(token: &str) -> u64 {
    let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Orchestrates validation and ledger append for one submission
pub struct ResultSubmissionFlow {
    ledger: Arc<LedgerStore>,
}

impl ResultSubmissionFlow {
    /// Create new flow over a ledger store
    pub fn new(ledger: Arc<LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Parse raw entries and append one row for the operator
    pub async fn submit(
        &self,
        operator: &OperatorId,
        entries: &HashMap<String, String>,
    ) -> Result<LedgerRow> {
        let amounts: HashMap<String, u64> = entries
            .iter()
            .map(|(category, token)| (category.clone(), parse_amount(token)))
            .collect();

        let key = OperatorKey::new(operator.as_str());
        let row = self.ledger.append(&key, &amounts).await?;

        tracing::info!(
            operator = %key,
            daily_total = row.daily_total,
            weekly_accumulated = row.weekly_accumulated,
            "Results recorded"
        );

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shift_ledger::LedgerConfig;
    use tempfile::TempDir;

    #[test]
    fn test_parse_amount_lenient() {
        assert_eq!(parse_amount("12"), 12);
        assert_eq!(parse_amount("12abc"), 12);
        assert_eq!(parse_amount("$1,250"), 1250);
        assert_eq!(parse_amount(""), 0);
        assert_eq!(parse_amount("n/a"), 0);
        assert_eq!(parse_amount("-7"), 7);
    }

    fn open_flow() -> (ResultSubmissionFlow, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = LedgerConfig {
            sheet_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        let ledger = Arc::new(LedgerStore::open(config).unwrap());
        (ResultSubmissionFlow::new(ledger), temp_dir)
    }

    fn entries(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_submit_parses_and_appends() {
        let (flow, _temp) = open_flow();
        let operator = OperatorId::new("ana");

        let row = flow
            .submit(
                &operator,
                &entries(&[("Streams", "12"), ("Messages", "7x"), ("Calls", "0")]),
            )
            .await
            .unwrap();

        // "Tips" missing, defaults to 0
        assert_eq!(row.values, vec![12, 7, 0, 0]);
        assert_eq!(row.daily_total, 19);
        assert_eq!(row.weekly_accumulated, 19);
    }

    #[tokio::test]
    async fn test_unknown_category_appends_nothing() {
        let (flow, _temp) = open_flow();
        let operator = OperatorId::new("ana");

        let result = flow
            .submit(&operator, &entries(&[("Streams", "3"), ("Bitcoin", "9")]))
            .await;
        assert!(result.is_err());

        // The valid part of the submission must not have been applied
        let retry = flow
            .submit(&operator, &entries(&[("Streams", "3")]))
            .await
            .unwrap();
        assert_eq!(retry.weekly_accumulated, 3);
    }
}
