//! Paginated list queries over allowlisted entities.
//!
//! An entity opts in by implementing [`Listable`], which names its row
//! source, the columns callers may filter and sort on, and the columns
//! free-text search runs over. [`find_many`] then turns a decoded
//! [`FilterParam`] into two parameterised queries: a `COUNT(*)` over the
//! filtered set and one page of rows.
//!
//! Identifiers only ever come from the static allowlist; every filter value
//! is bound as a parameter after being coerced to the column's kind.
//!
//! ```text
//! SELECT <select> FROM <source>
//!  WHERE <search OR ...> | <filter AND/OR ...>
//!  ORDER BY <sort expr> <ASC|DESC>, <id> ASC
//!  LIMIT $n OFFSET $m
//! ```

use bookstore_core::pagination::{FilterOperator, FilterParam, FilterValue};
use bookstore_core::response::MetaData;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::error::StoreError;

/// How filter values are coerced before binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Timestamp,
    Date,
    Uuid,
}

/// A column exposed to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Name used in `sort` and `filter` query parameters
    pub name: &'static str,
    /// SQL expression the name resolves to
    pub expr: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(name: &'static str, expr: &'static str, kind: ColumnKind) -> Self {
        Self { name, expr, kind }
    }
}

pub trait Listable: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Human-readable name used in error messages, e.g. `"Book"`.
    const ENTITY: &'static str;
    /// Table rows are deleted from.
    const TABLE: &'static str;
    /// Body of the `FROM` clause, joins included.
    const SOURCE: &'static str;
    /// Select list matching the row type.
    const SELECT: &'static str;
    /// Qualified primary key expression.
    const ID_COLUMN: &'static str;
    const COLUMNS: &'static [Column];
    /// Expressions matched by free-text search.
    const SEARCH_COLUMNS: &'static [&'static str];

    fn column(name: &str) -> Result<&'static Column, StoreError> {
        Self::COLUMNS
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| StoreError::InvalidColumn(name.to_string()))
    }
}

/// One page of records and the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn meta(&self, filter: &FilterParam) -> MetaData {
        MetaData {
            total_count: self.total_count,
            page: filter.page,
            per_page: filter.per_page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

/// A filter value after coercion to its column's kind.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BoundValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Uuid(Uuid),
}

fn invalid(column: &Column, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidValue {
        column: column.name.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn coerce(column: &Column, value: &FilterValue) -> Result<BoundValue, StoreError> {
    match (column.kind, value) {
        (ColumnKind::Text, v) => Ok(BoundValue::Text(v.to_string())),

        (ColumnKind::Integer, FilterValue::Integer(i)) => Ok(BoundValue::Integer(*i)),
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        (ColumnKind::Integer, FilterValue::Float(f))
            if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f) =>
        {
            Ok(BoundValue::Integer(*f as i64))
        }
        (ColumnKind::Integer, FilterValue::Text(s)) => s
            .trim()
            .parse()
            .map(BoundValue::Integer)
            .map_err(|_| invalid(column, "expected an integer")),
        (ColumnKind::Integer, _) => Err(invalid(column, "expected an integer")),

        (ColumnKind::Float, FilterValue::Integer(i)) => Ok(BoundValue::Float(*i as f64)),
        (ColumnKind::Float, FilterValue::Float(f)) => Ok(BoundValue::Float(*f)),
        (ColumnKind::Float, FilterValue::Text(s)) => s
            .trim()
            .parse()
            .map(BoundValue::Float)
            .map_err(|_| invalid(column, "expected a number")),
        (ColumnKind::Float, _) => Err(invalid(column, "expected a number")),

        (ColumnKind::Timestamp, FilterValue::Text(s)) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Ok(BoundValue::Timestamp(ts.with_timezone(&Utc)));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| BoundValue::Timestamp(dt.and_utc()))
                .ok_or_else(|| invalid(column, "expected an RFC 3339 timestamp or YYYY-MM-DD"))
        }
        (ColumnKind::Timestamp, _) => Err(invalid(column, "expected a timestamp string")),

        (ColumnKind::Date, FilterValue::Text(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(BoundValue::Date)
            .map_err(|_| invalid(column, "expected a date in YYYY-MM-DD format")),
        (ColumnKind::Date, _) => Err(invalid(column, "expected a date string")),

        (ColumnKind::Uuid, FilterValue::Text(s)) => Uuid::parse_str(s.trim())
            .map(BoundValue::Uuid)
            .map_err(|_| invalid(column, "expected a UUID")),
        (ColumnKind::Uuid, _) => Err(invalid(column, "expected a UUID string")),
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: BoundValue) {
    match value {
        BoundValue::Text(v) => qb.push_bind(v),
        BoundValue::Integer(v) => qb.push_bind(v),
        BoundValue::Float(v) => qb.push_bind(v),
        BoundValue::Timestamp(v) => qb.push_bind(v),
        BoundValue::Date(v) => qb.push_bind(v),
        BoundValue::Uuid(v) => qb.push_bind(v),
    };
}

/// Escapes `LIKE` wildcards so a search term matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Appends the `WHERE` clause for `filter`, if any.
///
/// A non-empty search replaces structured filters entirely.
fn push_conditions<E: Listable>(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &FilterParam,
) -> Result<(), StoreError> {
    if filter.is_search() {
        if E::SEARCH_COLUMNS.is_empty() {
            return Ok(());
        }

        let pattern = format!("%{}%", escape_like(&filter.search));
        qb.push(" WHERE (");
        for (i, expr) in E::SEARCH_COLUMNS.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*expr).push(" ILIKE ").push_bind(pattern.clone());
        }
        qb.push(")");
        return Ok(());
    }

    // Resolve everything before touching the builder.
    let mut clauses = Vec::with_capacity(filter.filters.len());
    for f in &filter.filters {
        let column = E::column(&f.column_name)?;
        if f.operator == FilterOperator::Like && column.kind != ColumnKind::Text {
            return Err(StoreError::InvalidOperator {
                column: column.name.to_string(),
                operator: f.operator.to_string(),
            });
        }
        clauses.push((column, f.operator, coerce(column, &f.value)?));
    }

    if clauses.is_empty() {
        return Ok(());
    }

    qb.push(" WHERE ");
    for (i, (column, operator, value)) in clauses.into_iter().enumerate() {
        if i > 0 {
            qb.push(filter.link_operator.as_sql());
        }
        qb.push(column.expr)
            .push(" ")
            .push(operator.as_sql())
            .push(" ");
        push_value(qb, value);
    }
    Ok(())
}

/// Builds the `COUNT(*)` query for the filtered set.
pub fn build_count_query<E: Listable>(
    filter: &FilterParam,
) -> Result<QueryBuilder<'static, Postgres>, StoreError> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM ");
    qb.push(E::SOURCE);
    push_conditions::<E>(&mut qb, filter)?;
    Ok(qb)
}

/// Builds the page query: filtered, ordered, offset and limited.
pub fn build_select_query<E: Listable>(
    filter: &FilterParam,
) -> Result<QueryBuilder<'static, Postgres>, StoreError> {
    let sort_column = E::column(&filter.sort.column_name)?;

    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(E::SELECT).push(" FROM ").push(E::SOURCE);
    push_conditions::<E>(&mut qb, filter)?;

    qb.push(" ORDER BY ")
        .push(sort_column.expr)
        .push(" ")
        .push(filter.sort.value.as_sql());
    if sort_column.expr != E::ID_COLUMN {
        // stable order across pages when the sort key has ties
        qb.push(", ").push(E::ID_COLUMN).push(" ASC");
    }

    qb.push(" LIMIT ")
        .push_bind(filter.limit())
        .push(" OFFSET ")
        .push_bind(filter.offset());
    Ok(qb)
}

#[instrument(skip(db, filter), fields(entity = E::ENTITY, page = filter.page, per_page = filter.per_page))]
pub async fn find_many<E: Listable>(
    db: &PgPool,
    filter: &FilterParam,
) -> Result<Page<E>, StoreError> {
    let mut count = build_count_query::<E>(filter)?;
    let total_count: i64 = count.build_query_scalar().fetch_one(db).await?;

    let mut select = build_select_query::<E>(filter)?;
    let records = select.build_query_as::<E>().fetch_all(db).await?;

    tracing::debug!(returned = records.len(), total_count, "Listed records");
    Ok(Page {
        records,
        total_count,
    })
}

#[instrument(skip(db), fields(entity = E::ENTITY))]
pub async fn find_by_id<E: Listable>(db: &PgPool, id: Uuid) -> Result<E, StoreError> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(E::SELECT)
        .push(" FROM ")
        .push(E::SOURCE)
        .push(" WHERE ")
        .push(E::ID_COLUMN)
        .push(" = ")
        .push_bind(id);

    qb.build_query_as::<E>()
        .fetch_optional(db)
        .await?
        .ok_or(StoreError::NotFound { entity: E::ENTITY })
}

#[instrument(skip(db), fields(entity = E::ENTITY))]
pub async fn delete_by_id<E: Listable>(db: &PgPool, id: Uuid) -> Result<(), StoreError> {
    let mut qb = QueryBuilder::new("DELETE FROM ");
    qb.push(E::TABLE).push(" WHERE id = ").push_bind(id);

    let result = qb.build().execute(db).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound { entity: E::ENTITY });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_core::pagination::{Filter, LinkOperator, Sort, SortDirection};

    #[derive(Debug, FromRow)]
    struct Widget {
        #[allow(dead_code)]
        id: Uuid,
    }

    impl Listable for Widget {
        const ENTITY: &'static str = "Widget";
        const TABLE: &'static str = "widgets";
        const SOURCE: &'static str = "widgets w";
        const SELECT: &'static str = "w.id";
        const ID_COLUMN: &'static str = "w.id";
        const COLUMNS: &'static [Column] = &[
            Column::new("id", "w.id", ColumnKind::Uuid),
            Column::new("name", "w.name", ColumnKind::Text),
            Column::new("weight", "w.weight", ColumnKind::Float),
            Column::new("stock", "w.stock", ColumnKind::Integer),
            Column::new("made_on", "w.made_on", ColumnKind::Date),
            Column::new("created_at", "w.created_at", ColumnKind::Timestamp),
        ];
        const SEARCH_COLUMNS: &'static [&'static str] = &["w.name", "w.description"];
    }

    fn filter(column: &str, operator: FilterOperator, value: FilterValue) -> Filter {
        Filter {
            column_name: column.to_string(),
            operator,
            value,
        }
    }

    #[test]
    fn test_default_select_orders_and_paginates() {
        let qb = build_select_query::<Widget>(&FilterParam::default()).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT w.id FROM widgets w ORDER BY w.created_at ASC, w.id ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_filters_joined_with_and_by_default() {
        let param = FilterParam {
            filters: vec![
                filter("weight", FilterOperator::Gt, FilterValue::Float(1.5)),
                filter("name", FilterOperator::Like, FilterValue::Text("%bolt%".into())),
            ],
            ..FilterParam::default()
        };

        let qb = build_count_query::<Widget>(&param).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM widgets w WHERE w.weight > $1 AND w.name LIKE $2"
        );
    }

    #[test]
    fn test_filters_joined_with_or_when_requested() {
        let param = FilterParam {
            filters: vec![
                filter("stock", FilterOperator::Eq, FilterValue::Integer(0)),
                filter("stock", FilterOperator::Gte, FilterValue::Integer(100)),
            ],
            link_operator: LinkOperator::Or,
            ..FilterParam::default()
        };

        let qb = build_count_query::<Widget>(&param).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM widgets w WHERE w.stock = $1 OR w.stock >= $2"
        );
    }

    #[test]
    fn test_search_replaces_filters() {
        let param = FilterParam {
            search: "foo".to_string(),
            filters: vec![filter("stock", FilterOperator::Eq, FilterValue::Integer(3))],
            ..FilterParam::default()
        };

        let qb = build_count_query::<Widget>(&param).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM widgets w WHERE (w.name ILIKE $1 OR w.description ILIKE $2)"
        );
    }

    #[test]
    fn test_search_ignores_invalid_filters() {
        let param = FilterParam {
            search: "foo".to_string(),
            filters: vec![filter("nope", FilterOperator::Eq, FilterValue::Integer(3))],
            ..FilterParam::default()
        };
        assert!(build_count_query::<Widget>(&param).is_ok());
    }

    #[test]
    fn test_not_equal_rendered_as_sql() {
        let param = FilterParam {
            filters: vec![filter("name", FilterOperator::NotEq, FilterValue::Text("x".into()))],
            ..FilterParam::default()
        };
        let qb = build_count_query::<Widget>(&param).unwrap();
        assert!(qb.sql().ends_with("WHERE w.name <> $1"));
    }

    #[test]
    fn test_sort_by_allowlisted_column() {
        let param = FilterParam {
            sort: Sort {
                column_name: "weight".to_string(),
                value: SortDirection::Desc,
            },
            ..FilterParam::default()
        };
        let qb = build_select_query::<Widget>(&param).unwrap();
        assert!(qb.sql().contains("ORDER BY w.weight DESC, w.id ASC"));
    }

    #[test]
    fn test_sort_by_id_has_no_tiebreaker() {
        let param = FilterParam {
            sort: Sort {
                column_name: "id".to_string(),
                value: SortDirection::Asc,
            },
            ..FilterParam::default()
        };
        let qb = build_select_query::<Widget>(&param).unwrap();
        assert!(qb.sql().contains("ORDER BY w.id ASC LIMIT"));
    }

    #[test]
    fn test_unknown_sort_column_rejected() {
        let param = FilterParam {
            sort: Sort {
                column_name: "created_at; DROP TABLE widgets".to_string(),
                value: SortDirection::Asc,
            },
            ..FilterParam::default()
        };
        assert!(matches!(
            build_select_query::<Widget>(&param),
            Err(StoreError::InvalidColumn(_))
        ));
    }

    #[test]
    fn test_unknown_filter_column_rejected() {
        let param = FilterParam {
            filters: vec![filter("password", FilterOperator::Eq, FilterValue::Text("x".into()))],
            ..FilterParam::default()
        };
        assert!(matches!(
            build_count_query::<Widget>(&param),
            Err(StoreError::InvalidColumn(c)) if c == "password"
        ));
    }

    #[test]
    fn test_like_on_numeric_column_rejected() {
        let param = FilterParam {
            filters: vec![filter("stock", FilterOperator::Like, FilterValue::Text("1%".into()))],
            ..FilterParam::default()
        };
        assert!(matches!(
            build_count_query::<Widget>(&param),
            Err(StoreError::InvalidOperator { .. })
        ));
    }

    #[test]
    fn test_coerce_values() {
        let col = |name| Widget::column(name).unwrap();

        assert_eq!(
            coerce(col("stock"), &FilterValue::Text("42".into())).unwrap(),
            BoundValue::Integer(42)
        );
        assert_eq!(
            coerce(col("stock"), &FilterValue::Float(-4.0)).unwrap(),
            BoundValue::Integer(-4)
        );
        assert_eq!(
            coerce(col("weight"), &FilterValue::Integer(3)).unwrap(),
            BoundValue::Float(3.0)
        );
        assert_eq!(
            coerce(col("name"), &FilterValue::Integer(1984)).unwrap(),
            BoundValue::Text("1984".into())
        );
        assert_eq!(
            coerce(col("made_on"), &FilterValue::Text("2024-02-29".into())).unwrap(),
            BoundValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert!(matches!(
            coerce(col("created_at"), &FilterValue::Text("2024-01-01".into())).unwrap(),
            BoundValue::Timestamp(_)
        ));
    }

    #[test]
    fn test_coerce_rejects_mismatched_values() {
        let col = |name| Widget::column(name).unwrap();

        assert!(coerce(col("stock"), &FilterValue::Text("many".into())).is_err());
        assert!(coerce(col("stock"), &FilterValue::Float(1.5)).is_err());
        assert!(coerce(col("stock"), &FilterValue::Float(1e20)).is_err());
        assert!(coerce(col("stock"), &FilterValue::Float(-1e20)).is_err());
        assert!(coerce(col("weight"), &FilterValue::Bool(true)).is_err());
        assert!(coerce(col("id"), &FilterValue::Text("not-a-uuid".into())).is_err());
        assert!(coerce(col("made_on"), &FilterValue::Text("29/02/2024".into())).is_err());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_page_meta() {
        let page = Page {
            records: vec![1, 2, 3, 4, 5],
            total_count: 12,
        };
        let param = FilterParam {
            page: 2,
            per_page: 5,
            ..FilterParam::default()
        };
        let meta = page.meta(&param);
        assert_eq!(meta.total_count, 12);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.per_page, 5);
    }
}
