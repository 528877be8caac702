//! Command dispatch and reply rendering.
//!
//! Every inbound message is either one of the four recognized commands or a
//! free-text record attempt. Handlers are stateless; the store is the only
//! shared state. Storage errors never escape a handler: the user gets a
//! generic error reply, the details go to the log, and the dispatcher keeps
//! listening.

use tracing::{error, info};

use crate::ledger::message::{InboundMessage, OutboundMessage};
use crate::ledger::similarity;
use crate::ledger::store::LedgerStore;
use crate::ledger::transaction::parse_message;

const USAGE_HINT: &str = "Invalid message format. Use: <owner> <sum> <comment> <purpose>";
const FILTER_USAGE: &str = "Usage: /filter <keyword>";

/// The closed set of recognized commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Total,
    Clear,
    Similar,
    /// Keyword already lowercased; empty means the argument was missing.
    Filter(String),
}

impl Command {
    /// Classify a message text. `/total`, `/clear` and `/similar` must match
    /// the whole text; `/filter` takes the rest of the line as its keyword.
    /// Anything else is free text.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "/total" => Some(Command::Total),
            "/clear" => Some(Command::Clear),
            "/similar" => Some(Command::Similar),
            "/filter" => Some(Command::Filter(String::new())),
            _ => text
                .strip_prefix("/filter ")
                .map(|keyword| Command::Filter(keyword.to_lowercase())),
        }
    }
}

/// The ledger engine: routes inbound events to the parser, store, or
/// similarity scanner, and formats replies.
pub struct LedgerEngine {
    store: LedgerStore,
    /// Chat that receives a copy of every recorded transaction, if set.
    broadcast_chat_id: Option<i64>,
}

impl LedgerEngine {
    pub fn new(store: LedgerStore, broadcast_chat_id: Option<i64>) -> Self {
        Self { store, broadcast_chat_id }
    }

    /// Handle one inbound message and return the replies to send.
    pub fn handle(&self, msg: &InboundMessage) -> Vec<OutboundMessage> {
        match Command::parse(&msg.text) {
            Some(Command::Total) => vec![OutboundMessage::new(msg.chat_id, self.render_totals())],
            Some(Command::Clear) => vec![OutboundMessage::new(msg.chat_id, self.render_clear())],
            Some(Command::Similar) => {
                vec![OutboundMessage::new(msg.chat_id, self.render_similar())]
            }
            Some(Command::Filter(keyword)) => {
                vec![OutboundMessage::new(msg.chat_id, self.render_filter(&keyword))]
            }
            None => self.record(msg),
        }
    }

    /// Parse free text and append it to the ledger. On success the sender
    /// gets a confirmation and the broadcast chat, when configured, gets a
    /// richer copy naming the sender.
    fn record(&self, msg: &InboundMessage) -> Vec<OutboundMessage> {
        let Some(tx) = parse_message(&msg.text) else {
            return vec![OutboundMessage::new(msg.chat_id, USAGE_HINT.to_string())];
        };

        match self.store.append(&tx) {
            Ok(()) => {
                info!("Recorded: {} {} {} for {}", tx.owner, tx.sum, tx.currency, tx.purpose);
                let mut replies = vec![OutboundMessage::new(
                    msg.chat_id,
                    format!("Recorded: {} {} {} for {}", tx.owner, tx.sum, tx.currency, tx.purpose),
                )];
                if let Some(chat_id) = self.broadcast_chat_id {
                    replies.push(OutboundMessage::new(
                        chat_id,
                        format!(
                            "{}: {} {} {} ({}) for {}",
                            msg.sender_name, tx.owner, tx.sum, tx.currency, tx.comment, tx.purpose
                        ),
                    ));
                }
                replies
            }
            Err(e) => {
                error!("Failed to save transaction: {e}");
                vec![OutboundMessage::new(msg.chat_id, "Error saving data.".to_string())]
            }
        }
    }

    fn render_totals(&self) -> String {
        match self.store.totals() {
            Ok(rows) => {
                let mut response = String::from("Totals by owner and purpose:\n");
                for row in &rows {
                    response.push_str(&format!(
                        "{}-{}: {} {}\n",
                        row.owner, row.purpose, row.total, row.currency
                    ));
                }
                response
            }
            Err(e) => {
                error!("Failed to calculate totals: {e}");
                "Error calculating totals.".to_string()
            }
        }
    }

    fn render_clear(&self) -> String {
        match self.store.clear() {
            Ok(_) => "Data cleared.".to_string(),
            Err(e) => {
                error!("Failed to clear ledger: {e}");
                "Error clearing data.".to_string()
            }
        }
    }

    fn render_similar(&self) -> String {
        match self.store.list_all() {
            Ok(records) => {
                let comments: Vec<String> = records.into_iter().map(|r| r.comment).collect();
                let pairs = similarity::similar_pairs(&comments);

                let mut response = String::from("Similar words in comments:\n");
                if pairs.is_empty() {
                    response.push_str("No similar comments found.");
                } else {
                    for pair in &pairs {
                        response.push_str(&format!(
                            "Comments \"{}\" and \"{}\" are {}% similar.\n",
                            pair.first, pair.second, pair.percent
                        ));
                    }
                }
                response
            }
            Err(e) => {
                error!("Failed to load transactions: {e}");
                "Error retrieving data.".to_string()
            }
        }
    }

    fn render_filter(&self, keyword: &str) -> String {
        if keyword.is_empty() {
            return FILTER_USAGE.to_string();
        }

        match self.store.filter(keyword) {
            Ok(result) => {
                let mut body = format!("Transactions containing \"{keyword}\":\n");
                if result.records.is_empty() {
                    body.push_str("No transactions found.");
                } else {
                    for r in &result.records {
                        body.push_str(&format!(
                            "{} {} {} for {} ({})\n",
                            r.owner, r.sum, r.currency, r.purpose, r.comment
                        ));
                    }
                }
                format!("Total Sum: {} so'm, {} $\n{}", result.total_som, result.total_usd, body)
            }
            Err(e) => {
                error!("Failed to filter transactions: {e}");
                "Error retrieving data.".to_string()
            }
        }
    }
}
