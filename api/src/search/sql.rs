use super::builder::CompositePredicate;
use super::types::{ArticleField, FieldValue, Predicate};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Integer(i64),
}

/// Date format of the `publishing_date` column
pub const SQL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Column backing a scalar field. The article table is aliased `a` in every query.
fn column(field: ArticleField) -> Option<&'static str> {
    match field {
        ArticleField::Id => Some("a.id"),
        ArticleField::Title => Some("a.title"),
        ArticleField::ShortDescription => Some("a.short_description"),
        ArticleField::Author => Some("a.author"),
        ArticleField::Content => Some("a.content"),
        ArticleField::PublishingDate => Some("a.publishing_date"),
        ArticleField::Tags => None,
    }
}

/// Builds an SQLite WHERE clause and bind values from a composite predicate.
/// Uses `?` placeholders, bound in the order of the returned values.
///
/// An empty composite yields an empty clause; callers are expected to
/// short-circuit before reaching the database in that case.
pub fn build_sql(filter: &CompositePredicate) -> (String, Vec<SqlValue>) {
    if filter.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut bind_values = Vec::new();
    let sql_parts: Vec<String> = filter
        .predicates()
        .iter()
        .map(|predicate| build_predicate_sql(predicate, &mut bind_values))
        .collect();

    (sql_parts.join(" AND "), bind_values)
}

fn build_predicate_sql(predicate: &Predicate, binds: &mut Vec<SqlValue>) -> String {
    match predicate {
        Predicate::Equals { field, value } => {
            binds.push(to_sql_value(value));
            match column(*field) {
                Some(column) => format!("{} = ?", column),
                None => tag_exists("tg.tag = ?"),
            }
        }
        Predicate::Contains { field, needle } => {
            binds.push(SqlValue::String(needle.clone()));
            // instr() is case-sensitive, unlike LIKE in SQLite
            match column(*field) {
                Some(column) => format!("instr(CAST({} AS TEXT), ?) > 0", column),
                None => tag_exists("instr(tg.tag, ?) > 0"),
            }
        }
        Predicate::TagAnyOf(tags) => {
            let placeholders = vec!["?"; tags.len()].join(", ");
            binds.extend(tags.iter().cloned().map(SqlValue::String));
            tag_exists(&format!("tg.tag IN ({})", placeholders))
        }
        Predicate::DateCompare { op, date } => {
            binds.push(SqlValue::String(date.format(SQL_DATE_FORMAT).to_string()));
            format!("a.publishing_date {} ?", op.sql_operator())
        }
    }
}

fn tag_exists(condition: &str) -> String {
    format!(
        "EXISTS (SELECT 1 FROM article_tags tg WHERE tg.article_id = a.id AND {})",
        condition
    )
}

fn to_sql_value(value: &FieldValue) -> SqlValue {
    match value {
        FieldValue::Text(s) => SqlValue::String(s.clone()),
        FieldValue::Integer(i) => SqlValue::Integer(*i),
        FieldValue::Date(d) => SqlValue::String(d.format(SQL_DATE_FORMAT).to_string()),
    }
}
