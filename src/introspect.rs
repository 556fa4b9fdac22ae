//! Schema introspection for unidb.
//!
//! Walks an instance's data dictionary through the per-engine catalog
//! templates and returns engine-neutral descriptors. Engines whose
//! catalog entry is a skip sentinel surface `IntrospectionNotSupported`
//! carrying the human-readable reason; nothing is guessed.

use crate::catalog::{skip_reason, template_for, SchemaObjectKind};
use crate::driver::{Row, Value};
use crate::error::{Result, UnidbError};
use crate::executor::{BindParams, FailurePolicy, StatementExecutor};
use crate::instance::InstanceHandle;
use crate::typemap::{classify, DataTypeGroup};

/// A view and its defining SQL, when the engine exposes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewInfo {
    pub name: String,
    pub definition: Option<String>,
}

/// One column of a table or view.
///
/// `rendered_type` arrives fully formatted from the catalog SQL
/// (length/precision/scale included); it is never re-assembled here.
/// `default_value` and `comment` are never absent: a database NULL, a
/// missing catalog column, and the `'(null)'` the catalog SQL emits all
/// come through as the literal `"(null)"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub ordinal: i64,
    pub name: String,
    pub rendered_type: String,
    pub nullable: bool,
    pub default_value: String,
    pub comment: String,
}

/// One index on a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: String,
    pub index_type: String,
    pub table_type: String,
    pub unique: bool,
}

/// One column (or expression) within an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub position: i64,
    pub name: String,
    pub descending: bool,
    pub expression: Option<String>,
}

impl IndexColumn {
    /// The expression when present, the plain column name otherwise.
    pub fn display_name(&self) -> &str {
        self.expression.as_deref().unwrap_or(&self.name)
    }
}

/// An index together with its assembled column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub info: IndexInfo,
    /// `"(expr_or_name ASC, expr_or_name DESC, ...)"`.
    pub columns_display: String,
}

/// Everything worth showing about one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub table_name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub indexes: Vec<IndexReport>,
}

/// Everything worth showing about one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewReport {
    pub view_name: String,
    pub definition: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
}

/// Reads schema objects from an instance's data dictionary.
///
/// Catalog queries always propagate driver failures: a broken dictionary
/// query is a defect, not something to degrade over.
#[derive(Debug, Clone, Copy)]
pub struct SchemaIntrospector {
    executor: StatementExecutor,
}

impl Default for SchemaIntrospector {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaIntrospector {
    pub fn new() -> Self {
        Self {
            executor: StatementExecutor::with_policy(FailurePolicy::Propagate),
        }
    }

    /// Lists table names, sorted by the engine's catalog.
    pub async fn find_tables(&self, handle: &InstanceHandle) -> Result<Vec<String>> {
        let rows = self
            .run_catalog(handle, SchemaObjectKind::Tables, None)
            .await?;
        Ok(rows.iter().map(|row| cell_string(row, 0)).collect())
    }

    /// Lists views with their definitions.
    pub async fn find_views(&self, handle: &InstanceHandle) -> Result<Vec<ViewInfo>> {
        let rows = self
            .run_catalog(handle, SchemaObjectKind::Views, None)
            .await?;
        Ok(rows
            .iter()
            .map(|row| ViewInfo {
                name: cell_string(row, 0),
                definition: cell_opt(row, 1),
            })
            .collect())
    }

    /// Describes the columns of one table.
    pub async fn find_columns(
        &self,
        handle: &InstanceHandle,
        table_name: &str,
    ) -> Result<Vec<ColumnDescriptor>> {
        let rows = self
            .run_catalog(handle, SchemaObjectKind::TableColumns, Some(table_name))
            .await?;
        Ok(rows.iter().map(column_from_row).collect())
    }

    /// Describes the columns of one view.
    pub async fn find_view_columns(
        &self,
        handle: &InstanceHandle,
        view_name: &str,
    ) -> Result<Vec<ColumnDescriptor>> {
        let rows = self
            .run_catalog(handle, SchemaObjectKind::ViewColumns, Some(view_name))
            .await?;
        Ok(rows.iter().map(column_from_row).collect())
    }

    /// Lists the indexes on one table.
    pub async fn find_indexes(
        &self,
        handle: &InstanceHandle,
        table_name: &str,
    ) -> Result<Vec<IndexInfo>> {
        let rows = self
            .run_catalog(handle, SchemaObjectKind::Indexes, Some(table_name))
            .await?;
        Ok(rows
            .iter()
            .map(|row| IndexInfo {
                name: cell_string(row, 0),
                index_type: cell_string(row, 1),
                table_type: cell_string(row, 2),
                unique: cell_string(row, 3) == "Yes",
            })
            .collect())
    }

    /// Lists the columns of one index, in position order.
    pub async fn find_index_columns(
        &self,
        handle: &InstanceHandle,
        index_name: &str,
    ) -> Result<Vec<IndexColumn>> {
        let rows = self
            .run_catalog(handle, SchemaObjectKind::IndexColumns, Some(index_name))
            .await?;
        Ok(rows
            .iter()
            .map(|row| IndexColumn {
                position: cell_i64(row, 0),
                name: cell_string(row, 1),
                descending: cell_string(row, 2).eq_ignore_ascii_case("DESC"),
                expression: cell_opt(row, 3),
            })
            .collect())
    }

    /// Columns plus indexes (with their assembled column lists) for one
    /// table.
    pub async fn table_report(
        &self,
        handle: &InstanceHandle,
        table_name: &str,
    ) -> Result<TableReport> {
        let columns = self.find_columns(handle, table_name).await?;
        let mut indexes = Vec::new();
        for info in self.find_indexes(handle, table_name).await? {
            let index_columns = self.find_index_columns(handle, &info.name).await?;
            indexes.push(IndexReport {
                columns_display: assemble_index_columns(&index_columns),
                info,
            });
        }
        Ok(TableReport {
            table_name: table_name.to_string(),
            columns,
            indexes,
        })
    }

    /// Looks up a column's rendered type and classifies it.
    ///
    /// Best-effort: the classification is a substring heuristic over the
    /// rendered type, good enough to decide literal quoting and nothing
    /// stronger. An unknown column comes back as `None`.
    pub async fn data_type_of(
        &self,
        handle: &InstanceHandle,
        table_name: &str,
        column_name: &str,
    ) -> Result<Option<DataTypeGroup>> {
        let columns = self.find_columns(handle, table_name).await?;
        Ok(columns
            .iter()
            .find(|col| col.name == column_name)
            .map(|col| classify(handle.engine(), &col.rendered_type)))
    }

    /// Definition plus columns for one view.
    pub async fn view_report(
        &self,
        handle: &InstanceHandle,
        view_name: &str,
    ) -> Result<ViewReport> {
        let definition = self
            .find_views(handle)
            .await?
            .into_iter()
            .find(|view| view.name == view_name)
            .and_then(|view| view.definition);
        let columns = self.find_view_columns(handle, view_name).await?;
        Ok(ViewReport {
            view_name: view_name.to_string(),
            definition,
            columns,
        })
    }

    /// Resolves and runs the catalog template for one object kind,
    /// turning the skip sentinels into errors before any SQL is sent.
    async fn run_catalog(
        &self,
        handle: &InstanceHandle,
        kind: SchemaObjectKind,
        object_name: Option<&str>,
    ) -> Result<Vec<Row>> {
        let engine = handle.engine();
        let query = template_for(kind, engine);
        if let Some(reason) = skip_reason(query, kind, engine) {
            return Err(UnidbError::IntrospectionNotSupported(reason));
        }
        // Object names are substituted textually into a quoted literal.
        let name = object_name.unwrap_or_default().replace('\'', "''");
        let sql = query
            .substitute(&name)
            .ok_or_else(|| UnidbError::IntrospectionNotSupported(kind.as_str().to_string()))?;
        let result = self.executor.run(handle, &sql, &BindParams::None).await?;
        Ok(result.rows.unwrap_or_default())
    }
}

/// Joins index columns into `"(a ASC, UPPER(b) DESC)"`, preferring the
/// expression text over the stored column name.
pub fn assemble_index_columns(columns: &[IndexColumn]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .map(|col| {
            format!(
                "{} {}",
                col.display_name(),
                if col.descending { "DESC" } else { "ASC" }
            )
        })
        .collect();
    format!("({})", parts.join(", "))
}

fn column_from_row(row: &Row) -> ColumnDescriptor {
    ColumnDescriptor {
        ordinal: cell_i64(row, 0),
        name: cell_string(row, 1),
        rendered_type: cell_string(row, 2),
        nullable: cell_string(row, 3) == "Yes",
        default_value: cell_sentinel(row, 4),
        comment: cell_sentinel(row, 5),
    }
}

fn cell_string(row: &Row, index: usize) -> String {
    row.get(index)
        .map(Value::to_display_string)
        .unwrap_or_default()
}

/// Reads an optional cell: SQL NULL, a missing column, the empty string,
/// and the `'(null)'` placeholder the catalog queries emit all collapse
/// to None.
fn cell_opt(row: &Row, index: usize) -> Option<String> {
    let text = cell_string(row, index);
    if text.is_empty() || text == "(null)" {
        None
    } else {
        Some(text)
    }
}

/// Reads a never-absent cell: SQL NULL and a missing column surface as
/// the explicit `"(null)"` sentinel rather than an empty string, so the
/// presenter has something to print.
fn cell_sentinel(row: &Row, index: usize) -> String {
    let text = cell_string(row, index);
    if text.is_empty() {
        "(null)".to_string()
    } else {
        text
    }
}

fn cell_i64(row: &Row, index: usize) -> i64 {
    match row.get(index) {
        Some(Value::Int(i)) => *i,
        Some(other) => other.to_display_string().parse().unwrap_or_default(),
        None => 0,
    }
}
