use indexmap::IndexMap;
use thiserror::Error;

/// Errors that can occur during document construction or processing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FacturaError {
    /// One or more validation rules failed. Carries every violation found.
    #[error("invalid document: {0}")]
    Validation(Violations),

    /// A constructor or builder received input it cannot represent.
    #[error("builder error: {0}")]
    Builder(String),

    /// A derived value broke its own invariant after validation passed.
    ///
    /// This points at a defect in defaulting or padding, never at bad input,
    /// and must not be retried.
    #[error("internal consistency error: {0}")]
    Internal(String),

    /// XML generation or parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON rendering error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl FacturaError {
    /// The violations carried by a validation failure, if this is one.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::Validation(v) => Some(v),
            _ => None,
        }
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "issuer.identification.number").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Rule kind that failed (e.g. "presence", "inclusion").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule kind.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error tagged with the rule kind that produced it.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

/// Every violation found on an entity and its descendants, in evaluation order.
///
/// An empty set means the entity is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    errors: Vec<ValidationError>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Messages recorded against one field path.
    pub fn on(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Group messages by field, keeping first-seen field order.
    pub fn by_field(&self) -> IndexMap<String, Vec<String>> {
        let mut map: IndexMap<String, Vec<String>> = IndexMap::new();
        for e in &self.errors {
            map.entry(e.field.clone())
                .or_default()
                .push(e.message.clone());
        }
        map
    }

    /// Merge a child entity's violations under `prefix`.
    pub fn nest(&mut self, prefix: &str, child: Violations) {
        self.errors.extend(child.errors.into_iter().map(|e| ValidationError {
            field: format!("{prefix}.{}", e.field),
            ..e
        }));
    }

    /// `Ok(())` when valid, otherwise a [`FacturaError::Validation`].
    pub fn into_result(self) -> Result<(), FacturaError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(FacturaError::Validation(self))
        }
    }
}

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = self
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&msg)
    }
}

impl IntoIterator for Violations {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
