//! Persistent SQLite store for ledger transactions.

use rusqlite::{Connection, Result, Row, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use crate::ledger::transaction::{Currency, Transaction};

/// A transaction row read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTransaction {
    pub owner: String,
    pub sum: f64,
    pub currency: Currency,
    pub purpose: String,
    pub comment: String,
    /// Server-side timestamp assigned at append. Stored, never rendered.
    pub created_at: String,
}

/// One `/total` group: all records sharing (owner, purpose, currency).
#[derive(Debug, Clone, PartialEq)]
pub struct TotalRow {
    pub owner: String,
    pub purpose: String,
    pub currency: Currency,
    pub total: f64,
}

/// `/filter` output: the matching rows plus per-currency sums across them.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    pub records: Vec<StoredTransaction>,
    pub total_som: f64,
    pub total_usd: f64,
}

/// Persistent SQLite store for the ledger.
pub struct LedgerStore {
    conn: Mutex<Connection>,
}

impl LedgerStore {
    /// Create an in-memory store (used by tests).
    pub fn open_in_memory() -> Self {
        let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema();
        store
    }

    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> Self {
        let conn = Connection::open(path).expect("Failed to open ledger database");
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema();
        info!("Opened ledger database at {:?} ({} transactions)", path, store.count());
        store
    }

    fn init_schema(&self) {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner TEXT NOT NULL,
                sum REAL NOT NULL,
                currency TEXT NOT NULL,
                purpose TEXT NOT NULL,
                comment TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_owner ON transactions(owner);
            "#,
        )
        .expect("Failed to initialize database schema");
    }

    fn count(&self) -> usize {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get::<_, i64>(0))
            .unwrap_or(0) as usize
    }

    /// Append one transaction, stamping `created_at` server-side.
    pub fn append(&self, tx: &Transaction) -> Result<()> {
        let created_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO transactions (owner, sum, currency, purpose, comment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![tx.owner, tx.sum, tx.currency.marker(), tx.purpose, tx.comment, created_at],
        )?;
        Ok(())
    }

    /// Sum of `sum` per (owner, purpose, currency) group, in key order.
    pub fn totals(&self) -> Result<Vec<TotalRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT owner, purpose, currency, SUM(sum) FROM transactions
             GROUP BY owner, purpose, currency
             ORDER BY owner, purpose, currency",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TotalRow {
                owner: row.get(0)?,
                purpose: row.get(1)?,
                currency: Currency::from_marker(&row.get::<_, String>(2)?),
                total: row.get(3)?,
            })
        })?;
        rows.collect()
    }

    /// Rows whose comment contains `keyword` (expected pre-lowercased) as a
    /// case-insensitive substring, plus per-currency sums over the matches.
    pub fn filter(&self, keyword: &str) -> Result<FilterResult> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT owner, sum, currency, purpose, comment, created_at FROM transactions
             WHERE instr(lower(comment), ?1) > 0
             ORDER BY id",
        )?;
        let records: Vec<StoredTransaction> =
            stmt.query_map(params![keyword], row_to_stored)?.collect::<Result<_>>()?;

        let mut total_som = 0.0;
        let mut total_usd = 0.0;
        for record in &records {
            match record.currency {
                Currency::Usd => total_usd += record.sum,
                Currency::Som => total_som += record.sum,
            }
        }

        Ok(FilterResult { records, total_som, total_usd })
    }

    /// Delete every transaction. Returns the number removed.
    pub fn clear(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute("DELETE FROM transactions", [])?;
        info!("Cleared {removed} transactions");
        Ok(removed)
    }

    /// Every transaction in insertion order.
    pub fn list_all(&self) -> Result<Vec<StoredTransaction>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT owner, sum, currency, purpose, comment, created_at FROM transactions
             ORDER BY id",
        )?;
        stmt.query_map([], row_to_stored)?.collect()
    }
}

fn row_to_stored(row: &Row<'_>) -> Result<StoredTransaction> {
    Ok(StoredTransaction {
        owner: row.get(0)?,
        sum: row.get(1)?,
        currency: Currency::from_marker(&row.get::<_, String>(2)?),
        purpose: row.get(3)?,
        comment: row.get(4)?,
        created_at: row.get(5)?,
    })
}
