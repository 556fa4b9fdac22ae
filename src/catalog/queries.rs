//! Data-dictionary query templates, per (object kind, engine).
//!
//! Each entry is either a SQL template with a single `{}` substitution
//! point for the object name, or one of two sentinels: `NotImplemented`
//! (no catalog query written for this engine yet) and `NotPossible` (the
//! engine cannot expose this through SQL at all, e.g. Access). Callers
//! must check for the sentinels before substituting.
//!
//! Rendered-type formatting (length/precision/scale) lives inside each
//! engine's SQL because every engine encodes these differently; the
//! introspector never post-processes type strings.

use super::{profile_for, Engine};

/// The kinds of schema object the introspector can enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaObjectKind {
    Tables,
    Views,
    TableColumns,
    ViewColumns,
    Indexes,
    IndexColumns,
}

impl SchemaObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tables => "tables",
            Self::Views => "views",
            Self::TableColumns => "table columns",
            Self::ViewColumns => "view columns",
            Self::Indexes => "indexes",
            Self::IndexColumns => "index columns",
        }
    }
}

/// A catalog query template, or the reason there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogQuery {
    Sql(&'static str),
    NotImplemented,
    NotPossible,
}

impl CatalogQuery {
    /// True when this entry is a skip sentinel rather than runnable SQL.
    pub fn is_skip(&self) -> bool {
        !matches!(self, Self::Sql(_))
    }

    /// Substitutes the object name into the template.
    ///
    /// Returns None for the sentinels; check `skip_reason` first.
    pub fn substitute(&self, object_name: &str) -> Option<String> {
        match self {
            Self::Sql(template) => Some(template.replace("{}", object_name)),
            _ => None,
        }
    }
}

/// Human-readable explanation for a skipped (kind, engine) pair.
pub fn skip_reason(query: CatalogQuery, kind: SchemaObjectKind, engine: Engine) -> Option<String> {
    match query {
        CatalogQuery::Sql(_) => None,
        CatalogQuery::NotImplemented => Some(format!(
            "FINDING YOUR {} NOT IMPLEMENTED FOR {}.",
            kind.as_str(),
            engine.as_str().to_uppercase()
        )),
        CatalogQuery::NotPossible => Some(format!(
            "SQL CANNOT READ THE SCHEMA IN {} THROUGH {}.",
            engine.as_str().to_uppercase(),
            profile_for(engine).driver_name.to_uppercase()
        )),
    }
}

/// Looks up the catalog query for one (object kind, engine) pair.
///
/// Result-set column order is part of the contract:
/// - Tables: `table_name`
/// - Views: `view_name, view_sql` (extra columns ignored)
/// - Table/view columns: `column_id, column_name, data_type, nullable
///   ('Yes'/'No'), data_default[, comments]`
/// - Indexes: `index_name, index_type, table_type, unique ('Yes'/'No')`
/// - Index columns: `column_position, column_name, descend, column_expression`
pub fn template_for(kind: SchemaObjectKind, engine: Engine) -> CatalogQuery {
    use CatalogQuery::{NotImplemented, NotPossible, Sql};
    use Engine::*;
    use SchemaObjectKind::*;

    match (kind, engine) {
        (_, Access) => NotPossible,

        (Tables, Mysql) => Sql(
            "SELECT table_name \
             FROM information_schema.tables \
             WHERE table_type = 'BASE TABLE' \
             AND table_schema = database() \
             ORDER BY table_name",
        ),
        (Tables, Oracle) => Sql(
            "SELECT table_name \
             FROM user_tables \
             ORDER BY table_name",
        ),
        (Tables, Postgres) => Sql(
            "SELECT table_name \
             FROM information_schema.tables \
             WHERE table_type = 'BASE TABLE' \
             AND table_schema = 'public' \
             ORDER BY table_name",
        ),
        (Tables, Sqlite) => Sql(
            "SELECT name AS table_name \
             FROM sqlite_master \
             WHERE type='table' \
             AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        ),
        (Tables, SqlServer) => Sql(
            "SELECT name AS table_name \
             FROM sys.tables \
             WHERE type='U' \
             ORDER BY name",
        ),

        (Views, Mysql) => Sql(
            "SELECT table_name AS view_name, view_definition AS view_sql, \
               check_option, is_updatable \
             FROM information_schema.views \
             WHERE table_schema = database() \
             ORDER BY table_name",
        ),
        (Views, Oracle) => Sql(
            "SELECT view_name, text AS view_sql \
             FROM user_views \
             ORDER BY view_name",
        ),
        (Views, Postgres) => Sql(
            "SELECT table_name AS view_name, view_definition AS view_sql, \
               check_option, is_updatable \
             FROM information_schema.views \
             WHERE table_schema = 'public' \
             ORDER BY table_name",
        ),
        (Views, Sqlite) => Sql(
            "SELECT name AS view_name, sql AS view_sql \
             FROM sqlite_master \
             WHERE type='view' \
             ORDER BY name",
        ),
        (Views, SqlServer) => Sql(
            "SELECT name AS view_name, \
               object_definition(object_id(name)) AS view_sql \
             FROM sys.views WHERE type='V' \
             ORDER BY name",
        ),

        (TableColumns | ViewColumns, Oracle) => Sql(
            "SELECT column_id, c.column_name, \
               CASE \
                 WHEN (data_type LIKE '%CHAR%' OR data_type IN ('RAW','UROWID')) \
                   THEN data_type||'('||c.char_length|| \
                        DECODE(char_used,'B',' BYTE','C',' CHAR',NULL)||')' \
                 WHEN data_type = 'NUMBER' \
                   THEN \
                     CASE \
                       WHEN c.data_precision IS NULL AND c.data_scale IS NULL \
                         THEN 'NUMBER' \
                       WHEN c.data_precision IS NULL AND c.data_scale IS NOT NULL \
                         THEN 'NUMBER(38,'||c.data_scale||')' \
                       ELSE data_type||'('||c.data_precision||','||c.data_scale||')' \
                       END \
                 WHEN data_type = 'BFILE' \
                   THEN 'BINARY FILE LOB (BFILE)' \
                 WHEN data_type = 'FLOAT' \
                   THEN data_type||'('||to_char(data_precision)||')'|| \
                        DECODE(data_precision, 126,' (double precision)', \
                        63,' (real)',NULL) \
                 ELSE data_type \
                 END AS data_type, \
               DECODE(nullable,'Y','Yes','No') AS nullable, \
               NVL(data_default,'(null)') AS data_default, \
               NVL(comments,'(null)') AS comments \
             FROM user_tab_cols c, user_col_comments com \
             WHERE c.table_name = '{}' \
             AND c.table_name = com.table_name \
             AND c.column_name = com.column_name \
             ORDER BY column_id",
        ),
        (TableColumns | ViewColumns, Postgres) => Sql(
            "SELECT ordinal_position, column_name, \
               CASE \
                 WHEN character_maximum_length IS NOT NULL \
                   THEN data_type||'('||character_maximum_length||')' \
                 WHEN data_type IN ('numeric','decimal') \
                      AND numeric_precision IS NOT NULL \
                   THEN data_type||'('||numeric_precision||','||numeric_scale||')' \
                 ELSE data_type \
                 END AS data_type, \
               CASE WHEN is_nullable = 'YES' THEN 'Yes' ELSE 'No' END AS nullable, \
               COALESCE(column_default, '(null)') AS data_default, \
               COALESCE(col_description( \
                 format('%I.%I', table_schema, table_name)::regclass::oid, \
                 ordinal_position), '(null)') AS comments \
             FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name = '{}' \
             ORDER BY ordinal_position",
        ),
        (TableColumns | ViewColumns, Sqlite) => Sql(
            "SELECT cid AS column_id, name AS column_name, type AS data_type, \
               CASE \
                 WHEN \"notnull\" = 1 \
                   THEN 'No' \
               ELSE 'Yes' \
               END AS nullable, \
               CASE \
                 WHEN dflt_value IS NULL \
                   THEN '(null)' \
                 ELSE dflt_value \
                 END AS data_default \
             FROM pragma_table_info('{}')",
        ),
        (TableColumns, SqlServer) => Sql(
            "SELECT c.column_id, c.name AS column_name, \
               CASE \
                 WHEN t.name IN ('varchar','char','nvarchar','nchar','varbinary') \
                   THEN CONCAT(t.name,'(',c.max_length,')') \
                 WHEN t.name IN ('decimal','numeric') \
                   THEN CONCAT(t.name,'(',c.precision,',',c.scale,')') \
                 ELSE t.name \
                 END AS data_type, \
               CASE WHEN c.is_nullable = 1 THEN 'Yes' ELSE 'No' END AS nullable, \
               ISNULL(object_definition(c.default_object_id), '(null)') \
                 AS data_default \
             FROM sys.columns c INNER JOIN sys.objects o \
               ON o.object_id = c.object_id \
             LEFT JOIN sys.types t \
               ON t.user_type_id = c.user_type_id \
             WHERE o.type = 'U' \
             AND o.name = '{}' \
             ORDER BY c.column_id",
        ),
        (ViewColumns, SqlServer) => NotImplemented,
        (TableColumns | ViewColumns, Mysql) => NotImplemented,

        (Indexes, Oracle) => Sql(
            "SELECT index_name, index_type, table_type, \
               CASE \
                 WHEN uniqueness = 'UNIQUE' \
                   THEN 'Yes' \
               ELSE 'No' \
               END AS \"unique\" \
             FROM user_indexes WHERE table_name = '{}' \
             ORDER BY index_name",
        ),
        (Indexes, Postgres) => Sql(
            "SELECT i.relname AS index_name, am.amname AS index_type, \
               'TABLE' AS table_type, \
               CASE WHEN ix.indisunique THEN 'Yes' ELSE 'No' END AS \"unique\" \
             FROM pg_class t \
             JOIN pg_index ix ON t.oid = ix.indrelid \
             JOIN pg_class i ON i.oid = ix.indexrelid \
             JOIN pg_am am ON am.oid = i.relam \
             JOIN pg_namespace n ON n.oid = t.relnamespace \
             WHERE n.nspname = 'public' AND t.relname = '{}' \
             ORDER BY i.relname",
        ),
        (Indexes, Sqlite) => Sql(
            "SELECT name AS index_name, 'DUMMY' AS index_type, \
               'DUMMY' AS table_type, \
               CASE \
                 WHEN \"unique\" = 1 \
                   THEN 'Yes' \
               ELSE 'No' \
               END AS \"unique\" \
             FROM pragma_index_list('{}')",
        ),
        (Indexes, Mysql | SqlServer) => NotImplemented,

        (IndexColumns, Oracle) => Sql(
            "SELECT ic.column_position, column_name, descend, \
             column_expression FROM user_ind_columns ic \
             LEFT OUTER JOIN user_ind_expressions ie \
             ON ic.column_position = ie.column_position \
             AND ic.index_name = ie.index_name \
             WHERE ic.index_name = '{}' \
             ORDER BY ic.column_position",
        ),
        (IndexColumns, Postgres) => Sql(
            "SELECT k.n AS column_position, \
               pg_get_indexdef(i.oid, k.n, true) AS column_name, \
               CASE WHEN (ix.indoption[k.n-1] & 1) = 1 \
                 THEN 'DESC' ELSE 'ASC' END AS descend, \
               '' AS column_expression \
             FROM pg_class i \
             JOIN pg_index ix ON ix.indexrelid = i.oid \
             JOIN pg_namespace ns ON ns.oid = i.relnamespace, \
             LATERAL generate_series(1, ix.indnkeyatts) AS k(n) \
             WHERE ns.nspname = 'public' AND i.relname = '{}' \
             ORDER BY k.n",
        ),
        (IndexColumns, Sqlite) => Sql(
            "SELECT seqno AS column_position, name AS column_name, \
               'ASC' AS descend, '' AS column_expression \
             FROM pragma_index_info('{}')",
        ),
        (IndexColumns, Mysql | SqlServer) => NotImplemented,
    }
}
