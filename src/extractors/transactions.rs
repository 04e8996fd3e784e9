// src/extractors/transactions.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// --- Regex Patterns (Lazy Static) ---
// Ticker symbols are printed in parentheses after the asset name, e.g. "Apple Inc. (AAPL)".
static TICKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\((\w+)\)").expect("Failed to compile TICKER_RE")
});

// Transaction dates are MM/DD/YYYY.
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}/\d{2}/\d{4})").expect("Failed to compile DATE_RE")
});

// First alternative wins; the whole match (label included) becomes the description.
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"D:\s*(.*)|DESCRIPTION:\s*(.*)|O:\s*(.*)").expect("Failed to compile DESCRIPTION_RE")
});

const DESCRIPTION_LABEL: &str = "DESCRIPTION:";

// --- Data Structures ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionType {
    #[serde(rename = "P")]
    Purchase,
    #[serde(rename = "S")]
    Sale,
}

/// One trade read out of a periodic transaction report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub asset: String,
    pub transaction_type: TransactionType,
    pub transaction_date: String, // As printed, MM/DD/YYYY
    pub description: String,
    pub source_file: String,
}

/// Line-by-line accumulator for report text.
///
/// Report layout is irregular: one trade may be spread over several lines and a
/// single line may carry several fields. Each line can overwrite any field; once
/// ticker, type, date and description are all known a record is emitted and the
/// accumulator starts over.
#[derive(Debug, Default)]
pub struct TransactionParser {
    ticker: Option<String>,
    transaction_type: Option<TransactionType>,
    transaction_date: Option<String>,
    description: Option<String>,
}

impl TransactionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets all partially collected fields.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feeds one physical line; returns a record if this line completed one.
    pub fn feed_line(&mut self, line: &str, source_file: &str) -> Option<TransactionRecord> {
        let line = line.trim();

        // 1. Ticker
        if let Some(caps) = TICKER_RE.captures(line) {
            self.ticker = Some(caps[1].to_string());
        }

        // 2. Transaction type, P beats S. The "DESCRIPTION:" label is masked first
        // since its own P would otherwise mark every labelled line a purchase.
        let letters = line.replace(DESCRIPTION_LABEL, "");
        if letters.contains('P') {
            self.transaction_type = Some(TransactionType::Purchase);
        } else if letters.contains('S') {
            self.transaction_type = Some(TransactionType::Sale);
        }

        // 3. Date
        if let Some(caps) = DATE_RE.captures(line) {
            self.transaction_date = Some(caps[1].to_string());
        }

        // 4. Description, tried on every line
        if let Some(m) = DESCRIPTION_RE.find(line) {
            let text = m.as_str().trim();
            if !text.is_empty() {
                self.description = Some(text.to_string());
            }
        }

        // 5. Emit
        self.take_complete(source_file)
    }

    fn take_complete(&mut self, source_file: &str) -> Option<TransactionRecord> {
        let complete = matches!(self.ticker.as_deref(), Some(t) if !t.is_empty())
            && self.transaction_type.is_some()
            && matches!(self.transaction_date.as_deref(), Some(d) if !d.is_empty())
            && matches!(self.description.as_deref(), Some(d) if !d.is_empty());
        if !complete {
            return None;
        }

        let record = TransactionRecord {
            asset: self.ticker.clone()?,
            transaction_type: self.transaction_type?,
            transaction_date: self.transaction_date.clone()?,
            description: self.description.clone()?,
            source_file: source_file.to_string(),
        };
        self.reset();
        Some(record)
    }
}

/// Parses the normalized text of one document. Any fields still pending at the
/// end of the text are dropped.
pub fn parse_transactions(text: &str, source_file: &str) -> Vec<TransactionRecord> {
    let mut parser = TransactionParser::new();
    let transactions: Vec<_> = text
        .split('\n')
        .filter_map(|line| parser.feed_line(line, source_file))
        .collect();

    tracing::debug!("{}: {} transactions parsed", source_file, transactions.len());
    transactions
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "Smith_20024001.pdf";

    #[test]
    fn test_single_line_transaction() {
        let records = parse_transactions("Apple Inc. (AAPL) P 01/15/2024 D: Purchase of 100 shares", SOURCE);
        assert_eq!(
            records,
            vec![TransactionRecord {
                asset: "AAPL".to_string(),
                transaction_type: TransactionType::Purchase,
                transaction_date: "01/15/2024".to_string(),
                description: "D: Purchase of 100 shares".to_string(),
                source_file: SOURCE.to_string(),
            }]
        );
    }

    #[test]
    fn test_fields_spread_over_two_lines() {
        let records = parse_transactions("(MSFT)\nS 03/02/2023 DESCRIPTION: Sale of holdings", SOURCE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].asset, "MSFT");
        assert_eq!(records[0].transaction_type, TransactionType::Sale);
        assert_eq!(records[0].transaction_date, "03/02/2023");
        assert_eq!(records[0].description, "DESCRIPTION: Sale of holdings");
    }

    #[test]
    fn test_unmatched_line_keeps_partial_state() {
        let mut parser = TransactionParser::new();
        assert!(parser.feed_line("Microsoft Corp (MSFT) S", SOURCE).is_none());
        assert!(parser.feed_line("filing status: new", SOURCE).is_none());
        assert_eq!(parser.ticker.as_deref(), Some("MSFT"));
        assert_eq!(parser.transaction_type, Some(TransactionType::Sale));

        let record = parser.feed_line("03/02/2023 D: sold", SOURCE).unwrap();
        assert_eq!(record.asset, "MSFT");
        assert_eq!(record.transaction_type, TransactionType::Sale);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(parse_transactions("", SOURCE).is_empty());
    }

    #[test]
    fn test_reset_after_emission() {
        let mut parser = TransactionParser::new();
        parser.feed_line("(MSFT)", SOURCE);
        let line = "S 03/02/2023 DESCRIPTION: Sale of holdings";
        assert!(parser.feed_line(line, SOURCE).is_some());
        // The ticker was consumed by the previous record.
        assert!(parser.feed_line(line, SOURCE).is_none());
        assert!(parser.ticker.is_none());
        assert!(parser.description.is_some());
    }

    #[test]
    fn test_p_takes_priority_over_s() {
        let mut parser = TransactionParser::new();
        parser.feed_line("SP 12/01/2023", SOURCE);
        assert_eq!(parser.transaction_type, Some(TransactionType::Purchase));
    }

    #[test]
    fn test_any_capital_p_counts_as_purchase() {
        let mut parser = TransactionParser::new();
        parser.feed_line("Sold PayPal", SOURCE);
        assert_eq!(parser.transaction_type, Some(TransactionType::Purchase));
    }

    #[test]
    fn test_later_ticker_overwrites_earlier() {
        let records = parse_transactions(
            "Alphabet (GOOG)\nAlphabet Class A (GOOGL) P 02/10/2024\nD: rebalance",
            SOURCE,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].asset, "GOOGL");
        assert_eq!(records[0].description, "D: rebalance");
    }

    #[test]
    fn test_ticker_requires_word_characters() {
        let mut parser = TransactionParser::new();
        parser.feed_line("Berkshire (BRK.B) [ST]", SOURCE);
        assert!(parser.ticker.is_none());
        parser.feed_line("Berkshire (BRK_B)", SOURCE);
        assert_eq!(parser.ticker.as_deref(), Some("BRK_B"));
    }

    #[test]
    fn test_subholding_label_sets_description() {
        let records = parse_transactions("Tesla (TSLA) [ST] S 04/05/2024\nS O: Brokerage Account", SOURCE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "O: Brokerage Account");
        assert_eq!(records[0].transaction_type, TransactionType::Sale);
    }

    #[test]
    fn test_bare_o_label_sets_description() {
        let mut parser = TransactionParser::new();
        parser.feed_line("INFO: nothing here", SOURCE);
        assert_eq!(parser.description.as_deref(), Some("O: nothing here"));

        let records = parse_transactions("Apple (AAPL) P 01/15/2024\nCUSTODIAN INFO: Schwab", SOURCE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "O: Schwab");
    }

    #[test]
    fn test_description_text_can_set_type() {
        let records = parse_transactions("Microsoft (MSFT) S 02/01/2024\nD: Purchase of 50 shares", SOURCE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transaction_type, TransactionType::Purchase);
        assert_eq!(records[0].description, "D: Purchase of 50 shares");
    }

    #[test]
    fn test_description_label_does_not_count_as_purchase() {
        let mut parser = TransactionParser::new();
        parser.feed_line("DESCRIPTION: quarterly rebalance", SOURCE);
        assert!(parser.transaction_type.is_none());
    }

    #[test]
    fn test_unfinished_tail_is_dropped() {
        let text = "Apple Inc. (AAPL) P 01/15/2024 D: first\nNvidia (NVDA) P 01/16/2024";
        let records = parse_transactions(text, SOURCE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].asset, "AAPL");
    }

    #[test]
    fn test_multiple_transactions_in_one_document() {
        let text = "\
ID Owner Asset Transaction Type Date
Apple Inc. (AAPL) [ST] P 01/15/2024 01/20/2024
D: Purchase of 100 shares
Microsoft Corp (MSFT) [ST] S 02/01/2024 02/03/2024
D: Trimmed position";
        let records = parse_transactions(text, SOURCE);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].asset, "AAPL");
        assert_eq!(records[0].transaction_date, "01/15/2024");
        assert_eq!(records[1].asset, "MSFT");
        assert_eq!(records[1].transaction_type, TransactionType::Sale);
        assert!(records.iter().all(|r| r.source_file == SOURCE));
    }
}
