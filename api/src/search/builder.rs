use super::error::FilterError;
use super::parser::parse_search;
use super::types::{ArticleField, FieldValue, Operation, Predicate, SearchCriteria};
use chrono::NaiveDate;

/// Date format accepted in filter values, e.g. `31.12.2020`
pub const FILTER_DATE_FORMAT: &str = "%d.%m.%Y";

/// Separates alternatives in `tags=a,b`
const TAG_SEPARATOR: char = ',';

impl Predicate {
    /// Maps one criterion onto a predicate, rejecting field/operator pairs that have no meaning.
    pub fn from_criteria(criteria: &SearchCriteria) -> Result<Self, FilterError> {
        let field = ArticleField::from_name(criteria.field())
            .ok_or_else(|| FilterError::UnknownField(criteria.field().to_string()))?;
        let value = criteria.value();

        match (criteria.operation(), field) {
            (Operation::Like, field) => Ok(Predicate::Contains {
                field,
                needle: value.to_string(),
            }),
            (Operation::Eq, ArticleField::Tags) => parse_tag_list(value).map(Predicate::TagAnyOf),
            (Operation::Eq, ArticleField::Id) => {
                let id = value.parse::<i64>().map_err(|_| FilterError::InvalidValue {
                    field: field.name().to_string(),
                    value: value.to_string(),
                    reason: "expected an integer",
                })?;
                Ok(Predicate::Equals {
                    field,
                    value: FieldValue::Integer(id),
                })
            }
            (Operation::Eq, ArticleField::PublishingDate) => Ok(Predicate::Equals {
                field,
                value: FieldValue::Date(parse_filter_date(value)?),
            }),
            (Operation::Eq, field) => Ok(Predicate::Equals {
                field,
                value: FieldValue::Text(value.to_string()),
            }),
            (operation, ArticleField::PublishingDate) => match operation.as_comparison() {
                Some(op) => Ok(Predicate::DateCompare {
                    op,
                    date: parse_filter_date(value)?,
                }),
                None => Err(unsupported(field, operation)),
            },
            (operation, field) => Err(unsupported(field, operation)),
        }
    }
}

fn unsupported(field: ArticleField, operation: Operation) -> FilterError {
    FilterError::UnsupportedOperation {
        field: field.name().to_string(),
        operation: operation.token(),
    }
}

pub fn parse_filter_date(value: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(value, FILTER_DATE_FORMAT)
        .map_err(|_| FilterError::InvalidDate(value.to_string()))
}

fn parse_tag_list(value: &str) -> Result<Vec<String>, FilterError> {
    let tags: Vec<String> = value
        .split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();

    if tags.is_empty() {
        return Err(FilterError::InvalidValue {
            field: ArticleField::Tags.name().to_string(),
            value: value.to_string(),
            reason: "expected at least one tag",
        });
    }
    Ok(tags)
}

/// AND-conjunction of predicates, built one criterion at a time.
///
/// An empty composite means "no criteria": callers must return no rows
/// for it instead of running an unfiltered query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositePredicate {
    predicates: Vec<Predicate>,
}

impl CompositePredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_criteria(criteria: &[SearchCriteria]) -> Result<Self, FilterError> {
        let mut composite = Self::new();
        for criterion in criteria {
            composite.and(criterion)?;
        }
        Ok(composite)
    }

    /// Appends one criterion. On error the composite is left unchanged.
    pub fn and(&mut self, criteria: &SearchCriteria) -> Result<&mut Self, FilterError> {
        let predicate = Predicate::from_criteria(criteria)?;
        self.predicates.push(predicate);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}

/// Parses a raw `search` value and builds the composite in one step.
pub fn build_filter(query: &str) -> Result<CompositePredicate, FilterError> {
    let criteria = parse_search(query)?;
    CompositePredicate::from_criteria(&criteria)
}
