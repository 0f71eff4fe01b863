use chrono::NaiveDate;
use sqlx::MySqlPool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    Bool(bool),
    Date(NaiveDate),
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug, PartialEq)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Accumulates `column = ?` pairs for a partial update. Column names come from
/// code, never from the request body.
#[derive(Debug, Default)]
pub struct UpdateSet {
    columns: Vec<&'static str>,
    values: Vec<SqlValue>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: Option<SqlValue>) -> Self {
        if let Some(value) = value {
            self.columns.push(column);
            self.values.push(value);
        }
        self
    }

    /// Returns `None` when no column was set.
    pub fn build(self, table: &str, id_column: &str, id_value: u64) -> Option<SqlUpdate> {
        if self.columns.is_empty() {
            return None;
        }

        let set_clause = self
            .columns
            .iter()
            .map(|c| format!("{} = ?", c))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

        let mut values = self.values;
        // WHERE id = ?
        values.push(SqlValue::U64(id_value));

        Some(SqlUpdate { sql, values })
    }
}

/// `?, ?, ?` for an `IN (...)` clause of `n` items.
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}
