/// AST types for the article filter grammar
use super::error::FilterError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Eq,   // field=value
    Like, // field:value
    Gt,   // field>value
    Ge,   // field>=value
    Lt,   // field<value
    Le,   // field<=value
}

impl Operation {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Self::Eq),
            ":" => Some(Self::Like),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Like => ":",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }

    /// Ordering operators map onto a date comparison; `=` and `:` do not.
    pub fn as_comparison(self) -> Option<Comparison> {
        match self {
            Self::Gt => Some(Comparison::Gt),
            Self::Ge => Some(Comparison::Ge),
            Self::Lt => Some(Comparison::Lt),
            Self::Le => Some(Comparison::Le),
            Self::Eq | Self::Like => None,
        }
    }
}

/// One parsed clause: `field`, `operation`, `value`, exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    field: String,
    operation: Operation,
    value: String,
}

impl SearchCriteria {
    pub fn new(
        field: impl Into<String>,
        operation: Operation,
        value: impl Into<String>,
    ) -> Result<Self, FilterError> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(FilterError::BlankField);
        }
        Ok(Self {
            field,
            operation,
            value: value.into(),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Article attributes addressable from a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleField {
    Id,
    Title,
    ShortDescription,
    Author,
    Content,
    PublishingDate,
    Tags,
}

impl ArticleField {
    pub const ALL: [ArticleField; 7] = [
        Self::Id,
        Self::Title,
        Self::ShortDescription,
        Self::Author,
        Self::Content,
        Self::PublishingDate,
        Self::Tags,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Name used in filter clauses
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::ShortDescription => "shortDescription",
            Self::Author => "author",
            Self::Content => "content",
            Self::PublishingDate => "publishingDate",
            Self::Tags => "tags",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    pub fn sql_operator(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

/// A single filter condition, independent of any query engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact match on a scalar attribute
    Equals { field: ArticleField, value: FieldValue },
    /// Case-sensitive substring match on the textual form of an attribute
    Contains { field: ArticleField, needle: String },
    /// Article carries at least one of the listed tags
    TagAnyOf(Vec<String>),
    DateCompare { op: Comparison, date: NaiveDate },
}
