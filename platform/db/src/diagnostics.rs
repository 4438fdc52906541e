use sea_orm::{ConnectionTrait, FromQueryResult, Statement};
use tracing::warn;

use crate::{DbPool, DbResult, employees};

pub const EMPLOYEES_TABLE: &str = "employees";

const TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

const COLUMNS_SQL: &str = r#"
SELECT name, type AS data_type, "notnull" AS not_null, pk AS primary_key
FROM pragma_table_info('employees')
ORDER BY cid
"#;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// Snapshot of what the database currently holds.
#[derive(Clone, Debug, Default)]
pub struct DbReport {
    pub connected: bool,
    pub tables: Vec<String>,
    pub employee_count: Option<u64>,
    pub columns: Vec<ColumnInfo>,
}

impl DbReport {
    pub fn has_employees_table(&self) -> bool {
        self.tables.iter().any(|name| name == EMPLOYEES_TABLE)
    }

    pub fn is_empty(&self) -> bool {
        self.employee_count.unwrap_or(0) == 0
    }
}

#[derive(FromQueryResult)]
struct TableRow {
    name: String,
}

#[derive(FromQueryResult)]
struct ColumnRow {
    name: String,
    data_type: String,
    not_null: i32,
    primary_key: i32,
}

impl From<ColumnRow> for ColumnInfo {
    fn from(row: ColumnRow) -> Self {
        Self {
            name: row.name,
            data_type: row.data_type,
            not_null: row.not_null != 0,
            primary_key: row.primary_key != 0,
        }
    }
}

/// Probes connectivity, then reports tables, employee row count and the
/// `employees` column layout. A failed probe yields a disconnected report
/// rather than an error.
pub async fn inspect(pool: &DbPool) -> DbResult<DbReport> {
    let backend = pool.get_database_backend();
    if let Err(err) = pool
        .execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
    {
        warn!(error = %err, "database connectivity probe failed");
        return Ok(DbReport::default());
    }

    let tables = TableRow::find_by_statement(Statement::from_string(
        backend,
        TABLES_SQL.to_string(),
    ))
    .all(pool)
    .await?
    .into_iter()
    .map(|row| row.name)
    .collect::<Vec<_>>();

    let mut report = DbReport {
        connected: true,
        tables,
        ..DbReport::default()
    };
    if !report.has_employees_table() {
        return Ok(report);
    }

    report.employee_count = Some(employees::count(pool).await?);
    report.columns = ColumnRow::find_by_statement(Statement::from_string(
        backend,
        COLUMNS_SQL.to_string(),
    ))
    .all(pool)
    .await?
    .into_iter()
    .map(ColumnInfo::from)
    .collect();
    Ok(report)
}
