use std::borrow::Cow;

use super::codes::{
    CodeTable, EXONERATION_TYPES, DOCUMENT_TYPES, IDENTIFICATION_TYPES, PRODUCT_CODE_TYPES,
    REFERENCE_CODES, TAX_CODES,
};
use super::error::{ValidationError, Violations};
use super::types::*;

/// Anything that can be checked against its field rules.
///
/// Implementations are pure: the same state always yields the same
/// violations in the same order.
pub trait Validate {
    /// Every violation on `self` and, for owners, on their descendants.
    fn validate(&self) -> Violations;

    fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }
}

/// A field value as the rule interpreter sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'a> {
    /// Absent, or an empty collection.
    Missing,
    /// Present, with no textual form to check.
    Present,
    /// Present text. Blank text counts as missing for presence.
    Text(Cow<'a, str>),
}

impl<'a> Value<'a> {
    pub fn text(value: Option<&'a str>) -> Self {
        value.map_or(Self::Missing, |s| Self::Text(Cow::Borrowed(s)))
    }

    pub fn of<T>(value: Option<&T>) -> Self {
        value.map_or(Self::Missing, |_| Self::Present)
    }

    pub fn list<T>(values: &[T]) -> Self {
        if values.is_empty() {
            Self::Missing
        } else {
            Self::Present
        }
    }

    /// A number checked through its decimal digits.
    pub fn digits(value: Option<u64>) -> Self {
        value.map_or(Self::Missing, |n| Self::Text(Cow::Owned(n.to_string())))
    }

    fn is_blank(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Present => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) if !s.trim().is_empty() => Some(s.as_ref()),
            _ => None,
        }
    }
}

/// One declarative check on a field.
pub enum Rule<T> {
    /// Fails when the field is absent or blank.
    Presence,
    /// Fails when present text is not a key of the table.
    Membership(&'static CodeTable),
    /// Fails when present text is not exactly `n` characters.
    Length(usize),
    /// Fails when present text is longer than `n` characters.
    MaxLength(usize),
    /// Fails when present text holds anything but ASCII digits.
    Numeric,
    /// Presence, only while the predicate holds for the entity.
    PresenceIf(fn(&T) -> bool),
}

impl<T> Rule<T> {
    /// Rule kind, recorded on each violation.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Presence | Self::PresenceIf(_) => "presence",
            Self::Membership(_) => "inclusion",
            Self::Length(_) | Self::MaxLength(_) => "length",
            Self::Numeric => "numericality",
        }
    }

    fn check(&self, entity: &T, value: &Value<'_>) -> Option<String> {
        match self {
            Self::Presence => value.is_blank().then(|| "can't be blank".to_string()),
            Self::PresenceIf(applies) => {
                (applies(entity) && value.is_blank()).then(|| "can't be blank".to_string())
            }
            Self::Membership(table) => value
                .as_text()
                .filter(|s| !table.contains(s))
                .map(|s| format!("'{s}' is not included in the {} list", table.name())),
            Self::Length(n) => value
                .as_text()
                .filter(|s| s.chars().count() != *n)
                .map(|_| format!("is the wrong length (should be {n} characters)")),
            Self::MaxLength(n) => value
                .as_text()
                .filter(|s| s.chars().count() > *n)
                .map(|_| format!("is too long (maximum is {n} characters)")),
            Self::Numeric => value
                .as_text()
                .filter(|s| !s.bytes().all(|b| b.is_ascii_digit()))
                .map(|_| "is not a number".to_string()),
        }
    }
}

/// The rules declared for one field of `T`.
pub struct Field<T: 'static> {
    pub name: &'static str,
    pub value: fn(&T) -> Value<'_>,
    pub rules: &'static [Rule<T>],
}

/// Evaluate `fields` against `entity`, in declaration order.
pub fn check<T: 'static>(entity: &T, fields: &[Field<T>]) -> Violations {
    let mut violations = Violations::new();
    for field in fields {
        let value = (field.value)(entity);
        for rule in field.rules {
            if let Some(message) = rule.check(entity, &value) {
                violations.push(ValidationError::with_rule(field.name, message, rule.kind()));
            }
        }
    }
    violations
}

fn nest_opt<E: Validate>(violations: &mut Violations, prefix: &str, entity: Option<&E>) {
    if let Some(entity) = entity {
        violations.nest(prefix, entity.validate());
    }
}

fn nest_all<E: Validate>(violations: &mut Violations, prefix: &str, entities: &[E]) {
    for (i, entity) in entities.iter().enumerate() {
        violations.nest(&format!("{prefix}[{i}]"), entity.validate());
    }
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

static IDENTIFICATION_RULES: &[Field<IdentificationDocument>] = &[
    Field {
        name: "document_type",
        value: |d| Value::text(Some(d.document_type())),
        rules: &[Rule::Presence, Rule::Membership(&IDENTIFICATION_TYPES)],
    },
    Field {
        name: "number",
        value: |d| Value::text(Some(d.number())),
        rules: &[
            Rule::Presence,
            Rule::Length(IdentificationDocument::NORMALIZED_LEN),
        ],
    },
];

impl Validate for IdentificationDocument {
    fn validate(&self) -> Violations {
        check(self, IDENTIFICATION_RULES)
    }
}

static LOCATION_RULES: &[Field<Location>] = &[
    Field {
        name: "province",
        value: |l| Value::text(l.province.as_deref()),
        rules: &[Rule::Presence, Rule::Length(1)],
    },
    Field {
        name: "county",
        value: |l| Value::text(l.county.as_deref()),
        rules: &[Rule::Presence, Rule::Length(2)],
    },
    Field {
        name: "district",
        value: |l| Value::text(l.district.as_deref()),
        rules: &[Rule::Presence, Rule::Length(2)],
    },
    Field {
        name: "neighborhood",
        value: |l| Value::text(l.neighborhood.as_deref()),
        rules: &[Rule::Length(2)],
    },
    Field {
        name: "others",
        value: |l| Value::text(l.others.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(160)],
    },
];

impl Validate for Location {
    fn validate(&self) -> Violations {
        check(self, LOCATION_RULES)
    }
}

static PHONE_RULES: &[Field<Phone>] = &[
    Field {
        name: "country_code",
        value: |p| Value::text(p.country_code.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(3)],
    },
    Field {
        name: "number",
        value: |p| Value::text(p.number.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(20)],
    },
];

impl Validate for Phone {
    fn validate(&self) -> Violations {
        check(self, PHONE_RULES)
    }
}

static ISSUER_RULES: &[Field<Issuer>] = &[
    Field {
        name: "name",
        value: |i| Value::text(i.name.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(80)],
    },
    Field {
        name: "identification",
        value: |i| Value::of(i.identification.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "commercial_name",
        value: |i| Value::text(i.commercial_name.as_deref()),
        rules: &[Rule::MaxLength(80)],
    },
    Field {
        name: "location",
        value: |i| Value::of(i.location.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "email",
        value: |i| Value::text(i.email.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(160)],
    },
];

impl Validate for Issuer {
    fn validate(&self) -> Violations {
        let mut violations = check(self, ISSUER_RULES);
        nest_opt(&mut violations, "identification", self.identification.as_ref());
        nest_opt(&mut violations, "location", self.location.as_ref());
        nest_opt(&mut violations, "phone", self.phone.as_ref());
        nest_opt(&mut violations, "fax", self.fax.as_ref());
        violations
    }
}

static RECEIVER_RULES: &[Field<Receiver>] = &[
    Field {
        name: "name",
        value: |r| Value::text(r.name.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(80)],
    },
    Field {
        name: "foreign_id_number",
        value: |r| Value::text(r.foreign_id_number.as_deref()),
        rules: &[Rule::MaxLength(20)],
    },
    Field {
        name: "commercial_name",
        value: |r| Value::text(r.commercial_name.as_deref()),
        rules: &[Rule::MaxLength(80)],
    },
    Field {
        name: "email",
        value: |r| Value::text(r.email.as_deref()),
        rules: &[Rule::MaxLength(160)],
    },
];

impl Validate for Receiver {
    fn validate(&self) -> Violations {
        let mut violations = check(self, RECEIVER_RULES);
        nest_opt(&mut violations, "identification", self.identification.as_ref());
        nest_opt(&mut violations, "location", self.location.as_ref());
        nest_opt(&mut violations, "phone", self.phone.as_ref());
        nest_opt(&mut violations, "fax", self.fax.as_ref());
        violations
    }
}

static PRODUCT_CODE_RULES: &[Field<ProductCode>] = &[
    Field {
        name: "code_type",
        value: |c| Value::text(c.code_type.as_deref()),
        rules: &[Rule::Presence, Rule::Membership(&PRODUCT_CODE_TYPES)],
    },
    Field {
        name: "code",
        value: |c| Value::text(c.code.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(20)],
    },
];

impl Validate for ProductCode {
    fn validate(&self) -> Violations {
        check(self, PRODUCT_CODE_RULES)
    }
}

static TAX_RULES: &[Field<Tax>] = &[
    Field {
        name: "code",
        value: |t| Value::text(t.code.as_deref()),
        rules: &[Rule::Presence, Rule::Membership(&TAX_CODES)],
    },
    Field {
        name: "rate",
        value: |t| Value::of(t.rate.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "total",
        value: |t| Value::of(t.total.as_ref()),
        rules: &[Rule::Presence],
    },
];

impl Validate for Tax {
    fn validate(&self) -> Violations {
        check(self, TAX_RULES)
    }
}

static EXONERATION_RULES: &[Field<Exoneration>] = &[
    Field {
        name: "document_type",
        value: |e| Value::text(e.document_type.as_deref()),
        rules: &[Rule::Presence, Rule::Membership(&EXONERATION_TYPES)],
    },
    Field {
        name: "document_number",
        value: |e| Value::text(e.document_number.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(17)],
    },
    Field {
        name: "institution",
        value: |e| Value::text(e.institution.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(100)],
    },
    Field {
        name: "date",
        value: |e| Value::of(e.date.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "total_tax",
        value: |e| Value::of(e.total_tax.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "percentage",
        value: |e| Value::of(e.percentage.as_ref()),
        rules: &[Rule::Presence],
    },
];

impl Validate for Exoneration {
    fn validate(&self) -> Violations {
        check(self, EXONERATION_RULES)
    }
}

static ITEM_RULES: &[Field<Item>] = &[
    Field {
        name: "line_number",
        value: |i| Value::digits(i.line_number.filter(|n| *n > 0).map(u64::from)),
        rules: &[Rule::Presence],
    },
    Field {
        name: "quantity",
        value: |i| Value::of(i.quantity.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "unit",
        value: |i| Value::text(i.unit.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(15)],
    },
    Field {
        name: "commercial_unit",
        value: |i| Value::text(i.commercial_unit.as_deref()),
        rules: &[Rule::MaxLength(20)],
    },
    Field {
        name: "description",
        value: |i| Value::text(i.description.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(160)],
    },
    Field {
        name: "unit_price",
        value: |i| Value::of(i.unit_price.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "total",
        value: |i| Value::of(i.total.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "discount_reason",
        value: |i| Value::text(i.discount_reason.as_deref()),
        rules: &[
            Rule::PresenceIf(|i| i.discount.is_some()),
            Rule::MaxLength(80),
        ],
    },
    Field {
        name: "subtotal",
        value: |i| Value::of(i.subtotal.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "net_total",
        value: |i| Value::of(i.net_total.as_ref()),
        rules: &[Rule::Presence],
    },
];

impl Validate for Item {
    fn validate(&self) -> Violations {
        let mut violations = check(self, ITEM_RULES);
        nest_opt(&mut violations, "code", self.code.as_ref());
        nest_all(&mut violations, "taxes", &self.taxes);
        nest_opt(&mut violations, "exoneration", self.exoneration.as_ref());
        violations
    }
}

static REFERENCE_RULES: &[Field<Reference>] = &[
    Field {
        name: "document_type",
        value: |r| Value::text(r.document_type.as_deref()),
        rules: &[Rule::Presence, Rule::Membership(&DOCUMENT_TYPES)],
    },
    Field {
        name: "number",
        value: |r| Value::text(r.number.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(50)],
    },
    Field {
        name: "date",
        value: |r| Value::of(r.date.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "code",
        value: |r| Value::text(r.code.as_deref()),
        rules: &[Rule::Presence, Rule::Membership(&REFERENCE_CODES)],
    },
    Field {
        name: "reason",
        value: |r| Value::text(r.reason.as_deref()),
        rules: &[Rule::Presence, Rule::MaxLength(180)],
    },
];

impl Validate for Reference {
    fn validate(&self) -> Violations {
        check(self, REFERENCE_RULES)
    }
}

static REGULATION_RULES: &[Field<Regulation>] = &[
    Field {
        name: "number",
        value: |r| Value::text(r.number.as_deref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "date",
        value: |r| Value::text(r.date.as_deref()),
        rules: &[Rule::Presence],
    },
];

impl Validate for Regulation {
    fn validate(&self) -> Violations {
        check(self, REGULATION_RULES)
    }
}

static SUMMARY_RULES: &[Field<Summary>] = &[
    Field {
        name: "currency",
        value: |s| Value::text(s.currency.as_deref()),
        rules: &[Rule::Length(3)],
    },
    Field {
        name: "exchange_rate",
        value: |s| Value::of(s.exchange_rate.as_ref()),
        rules: &[Rule::PresenceIf(|s| {
            s.currency
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty() && c != "CRC")
        })],
    },
];

impl Validate for Summary {
    fn validate(&self) -> Violations {
        check(self, SUMMARY_RULES)
    }
}

impl Validate for OtherText {
    fn validate(&self) -> Violations {
        Violations::new()
    }
}
