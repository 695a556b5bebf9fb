//! `SQLite` benchmark backends.
//!
//! [`SqliteBackend`] drives the staged CRUD benchmark against a real
//! `SQLite` database (file-backed or in-memory); [`SqliteSearchBackend`]
//! serves the search scenarios from fixture data loaded into indexed
//! tables. Timestamps are stored as RFC 3339 TEXT, which compares
//! lexicographically for UTC values in a uniform format.

use crate::backend::{BackendAdapter, BackendOp, SearchBackend};
use crate::error::{DbPerfError, Result};
use crate::model::{FieldUpdate, FieldValue, FlatRecord, ProductRecord, SimpleRecord};
use crate::search::config::QueryParameters;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params, params_from_iter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SIMPLE_SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS simple_records (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        score REAL NOT NULL,
        is_active INTEGER NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_simple_records_age ON simple_records(age);
";

const PRODUCT_SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        price INTEGER NOT NULL,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        is_active INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_products_name ON products(name);
    CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);
    CREATE INDEX IF NOT EXISTS idx_products_price ON products(price);
    CREATE INDEX IF NOT EXISTS idx_products_date ON products(date);

    CREATE TABLE IF NOT EXISTS product_tags (
        product_id TEXT NOT NULL,
        tag TEXT NOT NULL,
        PRIMARY KEY (product_id, tag)
    );
    CREATE INDEX IF NOT EXISTS idx_product_tags_tag ON product_tags(tag);
";

fn field_value_to_sql(value: &FieldValue) -> Value {
    match value {
        FieldValue::Bool(b) => Value::Integer(i64::from(*b)),
        FieldValue::Int(i) => Value::Integer(*i),
        FieldValue::Double(d) => Value::Real(*d),
        FieldValue::Text(s) => Value::Text(s.clone()),
    }
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbPerfError::invalid_data(format!("bad timestamp '{text}': {e}")))
}

/// `SQLite` CRUD backend over [`SimpleRecord`].
pub struct SqliteBackend {
    name: String,
    path: Option<PathBuf>,
    conn: Option<Connection>,
}

impl SqliteBackend {
    /// Backend over a database file at `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            name: "sqlite".to_string(),
            path: Some(path.into()),
            conn: None,
        }
    }

    /// Backend over an in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            name: "sqlite-memory".to_string(),
            path: None,
            conn: None,
        }
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(DbPerfError::NotInitialized)
    }

    fn conn_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(DbPerfError::NotInitialized)
    }

    fn column_for(field: &str) -> Result<&'static str> {
        match field {
            "name" => Ok("name"),
            "age" => Ok("age"),
            "score" => Ok("score"),
            "isActive" => Ok("is_active"),
            _ => Err(DbPerfError::invalid_data(format!(
                "unknown field '{field}'"
            ))),
        }
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<(SimpleRecord, String)> {
        let created_at: String = row.get(5)?;
        Ok((
            SimpleRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                age: row.get(2)?,
                score: row.get(3)?,
                is_active: row.get::<_, i64>(4)? != 0,
                created_at: Utc::now(), // patched from the raw column below
            },
            created_at,
        ))
    }

    fn query_records(conn: &Connection, sql: &str, query_params: &[Value]) -> Result<Vec<SimpleRecord>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(query_params.iter()), Self::row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            let (mut record, created_at) = row?;
            record.created_at = parse_timestamp(&created_at)?;
            records.push(record);
        }
        Ok(records)
    }

    fn insert_record(conn: &Connection, record: &SimpleRecord) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO simple_records (id, name, age, score, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                record.id,
                record.name,
                record.age,
                record.score,
                i64::from(record.is_active),
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_record(conn: &Connection, id: &str, updates: &[FieldUpdate]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }
        let mut set_clauses = Vec::with_capacity(updates.len());
        let mut values: Vec<Value> = Vec::with_capacity(updates.len() + 1);
        for update in updates {
            let column = Self::column_for(&update.field)?;
            set_clauses.push(format!("{column} = ?"));
            values.push(field_value_to_sql(&update.value));
        }
        values.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE simple_records SET {} WHERE id = ?",
            set_clauses.join(", ")
        );
        let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(DbPerfError::RecordNotFound { id: id.to_string() });
        }
        Ok(())
    }

    fn apply_op(conn: &Connection, op: &BackendOp<SimpleRecord>) -> Result<()> {
        match op {
            BackendOp::Create(record) => Self::insert_record(conn, record),
            BackendOp::Update { id, fields } => Self::update_record(conn, id, fields),
        }
    }
}

impl BackendAdapter for SqliteBackend {
    type Record = SimpleRecord;

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        rusqlite::version()
    }

    fn initialize(&mut self) -> Result<()> {
        let conn = match &self.path {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        conn.execute_batch(SIMPLE_SCHEMA_SQL)?;
        conn.execute("DELETE FROM simple_records", [])?;
        self.conn = Some(conn);
        debug!(backend = %self.name, "sqlite backend initialized");
        Ok(())
    }

    fn create(&mut self, record: &SimpleRecord) -> Result<()> {
        Self::insert_record(self.conn()?, record)
    }

    fn create_batch(&mut self, records: &[SimpleRecord]) -> Result<()> {
        let conn = self.conn_mut()?;
        let tx = conn.transaction()?;
        for record in records {
            Self::insert_record(&tx, record)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn read(&mut self, id: &str) -> Result<Option<SimpleRecord>> {
        let records = Self::query_records(
            self.conn()?,
            "SELECT id, name, age, score, is_active, created_at FROM simple_records WHERE id = ?",
            &[Value::Text(id.to_string())],
        )?;
        Ok(records.into_iter().next())
    }

    fn search_indexed(&mut self, field: &str, value: &FieldValue) -> Result<Vec<SimpleRecord>> {
        let column = Self::column_for(field)?;
        let sql = format!(
            "SELECT id, name, age, score, is_active, created_at FROM simple_records WHERE {column} = ?"
        );
        Self::query_records(self.conn()?, &sql, &[field_value_to_sql(value)])
    }

    fn search_non_indexed(&mut self, field: &str, value: &FieldValue) -> Result<Vec<SimpleRecord>> {
        // Same query path; the planner falls back to a full scan for
        // columns without an index.
        self.search_indexed(field, value)
    }

    fn complex_query(&mut self) -> Result<Vec<SimpleRecord>> {
        Self::query_records(
            self.conn()?,
            "SELECT id, name, age, score, is_active, created_at FROM simple_records
             WHERE age BETWEEN ? AND ? AND is_active = 1 AND score > ?
             ORDER BY score DESC",
            &[Value::Integer(25), Value::Integer(45), Value::Real(30.0)],
        )
    }

    fn update(&mut self, id: &str, updates: &[FieldUpdate]) -> Result<()> {
        Self::update_record(self.conn()?, id, updates)
    }

    fn execute_transaction(&mut self, ops: &[BackendOp<SimpleRecord>]) -> Result<()> {
        let conn = self.conn_mut()?;
        let tx = conn.transaction()?;
        for op in ops {
            Self::apply_op(&tx, op)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn execute_concurrent(&mut self, ops: Vec<BackendOp<SimpleRecord>>) -> Result<()> {
        let conn = self.conn()?;
        for op in &ops {
            Self::apply_op(conn, op)?;
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM simple_records WHERE id = ?", params![id])?;
        Ok(())
    }

    fn delete_all(&mut self) -> Result<()> {
        self.conn()?.execute("DELETE FROM simple_records", [])?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.conn = None;
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // No-op for non-WAL databases; checkpoints otherwise.
        let _busy: i64 =
            self.conn()?
                .query_row("PRAGMA wal_checkpoint(PASSIVE)", [], |row| row.get(0))?;
        Ok(())
    }
}

/// `SQLite` search backend over a loaded fixture.
pub struct SqliteSearchBackend {
    name: String,
    conn: Connection,
}

impl SqliteSearchBackend {
    /// Create an empty in-memory search backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be opened.
    pub fn in_memory() -> Result<Self> {
        Self::with_connection("sqlite", Connection::open_in_memory()?)
    }

    /// Create an empty file-backed search backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_connection("sqlite", Connection::open(path)?)
    }

    fn with_connection(name: &str, conn: Connection) -> Result<Self> {
        conn.execute_batch(PRODUCT_SCHEMA_SQL)?;
        Ok(Self {
            name: name.to_string(),
            conn,
        })
    }

    /// Bulk-load flat fixture records (no tags).
    ///
    /// # Errors
    ///
    /// Returns an error when any insert fails.
    pub fn load_flat(&mut self, records: &[FlatRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO products (id, name, category, price, date, description, is_active)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.id,
                    record.name,
                    record.category,
                    record.price,
                    record.date.to_rfc3339(),
                    record.description,
                    i64::from(record.is_active),
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = records.len(), "flat records loaded into sqlite");
        Ok(())
    }

    /// Bulk-load product fixture records together with their tags.
    ///
    /// # Errors
    ///
    /// Returns an error when any insert fails.
    pub fn load_products(&mut self, products: &[ProductRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut product_stmt = tx.prepare(
                "INSERT OR REPLACE INTO products (id, name, category, price, date, description, is_active)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )?;
            let mut tag_stmt = tx.prepare(
                "INSERT OR REPLACE INTO product_tags (product_id, tag) VALUES (?, ?)",
            )?;
            for product in products {
                product_stmt.execute(params![
                    product.id,
                    product.name,
                    product.category,
                    product.price,
                    product.date.to_rfc3339(),
                    product.description,
                    i64::from(product.is_active),
                ])?;
                for tag in &product.tags {
                    tag_stmt.execute(params![product.id, tag])?;
                }
            }
        }
        tx.commit()?;
        debug!(count = products.len(), "products loaded into sqlite");
        Ok(())
    }

    fn build_query(params: &QueryParameters) -> (String, Vec<Value>) {
        let mut sql = String::from("SELECT COUNT(*) FROM products p WHERE 1=1");
        let mut values: Vec<Value> = Vec::new();

        if let Some(name) = &params.name {
            sql.push_str(" AND p.name = ?");
            values.push(Value::Text(name.clone()));
        }
        if let Some(category) = &params.category {
            sql.push_str(" AND p.category = ?");
            values.push(Value::Text(category.clone()));
        }
        if let Some(min) = params.price_min {
            sql.push_str(" AND p.price >= ?");
            values.push(Value::Integer(min));
        }
        if let Some(max) = params.price_max {
            sql.push_str(" AND p.price <= ?");
            values.push(Value::Integer(max));
        }
        if let Some(from) = params.date_from {
            sql.push_str(" AND p.date >= ?");
            values.push(Value::Text(from.to_rfc3339()));
        }
        if let Some(keyword) = &params.keyword {
            // instr avoids LIKE wildcard escaping.
            sql.push_str(" AND instr(p.description, ?) > 0");
            values.push(Value::Text(keyword.clone()));
        }
        if let Some(tag) = &params.tag {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM product_tags t WHERE t.product_id = p.id AND t.tag = ?)",
            );
            values.push(Value::Text(tag.clone()));
        }
        if let Some(tags) = &params.tags {
            for tag in tags {
                sql.push_str(
                    " AND EXISTS (SELECT 1 FROM product_tags t WHERE t.product_id = p.id AND t.tag = ?)",
                );
                values.push(Value::Text(tag.clone()));
            }
        }
        (sql, values)
    }
}

impl SearchBackend for SqliteSearchBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        rusqlite::version()
    }

    fn indexed(&self) -> bool {
        true
    }

    fn search(&self, params: &QueryParameters) -> Result<usize> {
        let (sql, values) = Self::build_query(params);
        let count: i64 =
            self.conn
                .query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
