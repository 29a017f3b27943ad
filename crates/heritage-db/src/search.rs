//! Free-text heritage search across every table that carries a heritage
//! name column.
//!
//! Tables are discovered at query time through `information_schema`, so new
//! layers loaded into the schema become searchable without code changes.
//! Each table is queried on its own; a table whose query fails is logged and
//! left out of the response.

use heritage_core::HeritageProperties;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::DbError;

/// Column that marks a table as searchable.
pub const NAME_COLUMN: &str = "국가유산명";

/// A searchable table and its first geometry column, if any.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SearchTable {
    pub table_name: String,
    pub geometry_column: Option<String>,
}

/// One matching row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub source_table: String,
    pub properties: HeritageProperties,
    /// GeoJSON geometry in EPSG:4326.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
    /// Set for point geometries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total: usize,
}

#[derive(Debug, sqlx::FromRow)]
struct HitRow {
    attributes: Value,
    geometry: Option<Value>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Lists tables in `schema` that have a [`NAME_COLUMN`] column, by name.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the catalog query fails.
pub async fn list_searchable_tables(
    pool: &PgPool,
    schema: &str,
) -> Result<Vec<SearchTable>, sqlx::Error> {
    sqlx::query_as::<_, SearchTable>(
        "SELECT c.table_name::text AS table_name, \
                (SELECT g.column_name::text \
                   FROM information_schema.columns g \
                  WHERE g.table_schema = c.table_schema \
                    AND g.table_name = c.table_name \
                    AND g.udt_name = 'geometry' \
                  ORDER BY g.ordinal_position \
                  LIMIT 1) AS geometry_column \
         FROM information_schema.columns c \
         WHERE c.table_schema = $1 \
           AND c.column_name = $2 \
         ORDER BY c.table_name::text COLLATE \"C\"",
    )
    .bind(schema)
    .bind(NAME_COLUMN)
    .fetch_all(pool)
    .await
}

/// Case-insensitive partial match of `keyword` against [`NAME_COLUMN`] in
/// every searchable table of `schema`, at most `row_limit` rows per table.
///
/// `%`, `_` and `\` in the keyword match literally. Results keep table order
/// (by name), then row order within each table.
///
/// # Errors
///
/// - [`DbError::EmptyKeyword`] if `keyword` is blank.
/// - [`DbError::Sqlx`] if table discovery fails. Failures of individual
///   table queries are logged and skipped.
pub async fn search_heritage(
    pool: &PgPool,
    schema: &str,
    keyword: &str,
    row_limit: i64,
) -> Result<SearchResponse, DbError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(DbError::EmptyKeyword);
    }

    let tables = list_searchable_tables(pool, schema).await?;
    let pattern = like_pattern(keyword);
    let mut results = Vec::new();

    for table in &tables {
        let sql = table_search_sql(schema, table);
        let rows = sqlx::query_as::<_, HitRow>(&sql)
            .bind(&pattern)
            .bind(row_limit)
            .bind(table.geometry_column.as_deref().unwrap_or_default())
            .fetch_all(pool)
            .await;

        match rows {
            Ok(rows) => {
                tracing::debug!(table = %table.table_name, hits = rows.len(), "searched table");
                results.extend(rows.into_iter().map(|row| into_hit(&table.table_name, row)));
            }
            Err(e) => {
                tracing::warn!(
                    table = %table.table_name,
                    error = %e,
                    "heritage search failed for table; skipping"
                );
            }
        }
    }

    let total = results.len();
    Ok(SearchResponse { results, total })
}

fn into_hit(table_name: &str, row: HitRow) -> SearchHit {
    let attributes = match row.attributes {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    SearchHit {
        source_table: table_name.to_string(),
        properties: HeritageProperties::from_attributes(attributes),
        geometry: row.geometry,
        lat: row.lat,
        lon: row.lon,
    }
}

/// Builds the per-table query. Binds: `$1` pattern, `$2` limit, `$3` the
/// geometry column name to drop from the attribute map.
fn table_search_sql(schema: &str, table: &SearchTable) -> String {
    let relation = format!("{}.{}", quote_ident(schema), quote_ident(&table.table_name));
    let name = quote_ident(NAME_COLUMN);

    match &table.geometry_column {
        Some(column) => format!(
            "SELECT to_jsonb(t) - $3::text AS attributes, \
                    ST_AsGeoJSON(w.g)::jsonb AS geometry, \
                    CASE WHEN GeometryType(w.g) = 'POINT' THEN ST_Y(w.g) END AS lat, \
                    CASE WHEN GeometryType(w.g) = 'POINT' THEN ST_X(w.g) END AS lon \
             FROM {relation} AS t \
             CROSS JOIN LATERAL (SELECT CASE \
                 WHEN ST_SRID(t.{geom}) IN (0, 4326) THEN t.{geom} \
                 ELSE ST_Transform(t.{geom}, 4326) END AS g) AS w \
             WHERE t.{name}::text ILIKE $1 ESCAPE '\\' \
             LIMIT $2",
            geom = quote_ident(column),
        ),
        None => format!(
            "SELECT to_jsonb(t) - $3::text AS attributes, \
                    NULL::jsonb AS geometry, \
                    NULL::float8 AS lat, \
                    NULL::float8 AS lon \
             FROM {relation} AS t \
             WHERE t.{name}::text ILIKE $1 ESCAPE '\\' \
             LIMIT $2"
        ),
    }
}

/// Quotes a Postgres identifier, doubling embedded double quotes.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// `%keyword%` with LIKE metacharacters escaped by `\`.
pub(crate) fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
