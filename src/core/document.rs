use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize};

use super::codes::{
    CONDITIONS, CREDIT_CONDITION, DOCUMENT_SITUATIONS, DOCUMENT_TYPES, PAYMENT_TYPES,
};
use super::error::{FacturaError, Violations};
use super::format::format_timestamp;
use super::tree::{Node, ToFragment};
use super::types::*;
use super::validation::{Field, Rule, Validate, Value, check};

/// Country prefix of every key.
pub const COUNTRY_CODE: &str = "506";
/// Length of the `Clave`.
pub const KEY_LEN: usize = 50;
/// Length of the `NumeroConsecutivo`.
pub const SEQUENCE_LEN: usize = 20;
/// Default branch (casa matriz).
pub const DEFAULT_HEADQUARTERS: &str = "001";
/// Default point of sale.
pub const DEFAULT_TERMINAL: &str = "00001";

/// Hacienda v4.2 schema locations.
pub mod ns {
    pub const INVOICE: &str =
        "https://tribunet.hacienda.go.cr/docs/esquemas/2017/v4.2/facturaElectronica";
    pub const DEBIT_NOTE: &str =
        "https://tribunet.hacienda.go.cr/docs/esquemas/2017/v4.2/notaDebitoElectronica";
    pub const CREDIT_NOTE: &str =
        "https://tribunet.hacienda.go.cr/docs/esquemas/2017/v4.2/notaCreditoElectronica";
    pub const TICKET: &str =
        "https://tribunet.hacienda.go.cr/docs/esquemas/2017/v4.2/tiqueteElectronico";
    pub const DS: &str = "http://www.w3.org/2000/09/xmldsig#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
}

/// The document variants. Each fixes its document type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// 01: Factura Electrónica.
    Invoice,
    /// 02: Nota de Débito Electrónica.
    DebitNote,
    /// 03: Nota de Crédito Electrónica.
    CreditNote,
    /// 04: Tiquete Electrónico.
    Ticket,
}

impl DocumentKind {
    /// Document type code (`TipoDoc`).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invoice => "01",
            Self::DebitNote => "02",
            Self::CreditNote => "03",
            Self::Ticket => "04",
        }
    }

    /// Parse from a document type code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::Invoice),
            "02" => Some(Self::DebitNote),
            "03" => Some(Self::CreditNote),
            "04" => Some(Self::Ticket),
            _ => None,
        }
    }

    /// Root element name.
    pub fn root_tag(&self) -> &'static str {
        match self {
            Self::Invoice => "FacturaElectronica",
            Self::DebitNote => "NotaDebitoElectronica",
            Self::CreditNote => "NotaCreditoElectronica",
            Self::Ticket => "TiqueteElectronico",
        }
    }

    /// Schema namespace of the root element.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Invoice => ns::INVOICE,
            Self::DebitNote => ns::DEBIT_NOTE,
            Self::CreditNote => ns::CREDIT_NOTE,
            Self::Ticket => ns::TICKET,
        }
    }

    /// Notes must cite the documents they amend.
    pub fn requires_references(&self) -> bool {
        matches!(self, Self::DebitNote | Self::CreditNote)
    }

    /// Root declarations used when the caller supplies none.
    pub fn default_namespaces(&self) -> Vec<(String, String)> {
        [
            ("xmlns", self.namespace()),
            ("xmlns:ds", ns::DS),
            ("xmlns:xsd", ns::XSD),
            ("xmlns:xsi", ns::XSI),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

/// A fiscal document. Build with [`DocumentBuilder`](super::DocumentBuilder).
///
/// Nothing is checked at construction; [`validate`](Validate::validate) runs
/// on demand, and every derived output (`key`, `to_tree`, `api_payload`)
/// validates first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub(crate) kind: DocumentKind,
    /// Caller-assigned sequence number (at most 10 digits).
    pub number: Option<u64>,
    /// FechaEmision.
    pub date: Option<DateTime<FixedOffset>>,
    pub issuer: Option<Issuer>,
    pub receiver: Option<Receiver>,
    /// CondicionVenta.
    pub condition: Option<String>,
    /// PlazoCredito: required for credit sales.
    pub credit_term: Option<String>,
    /// MedioPago.
    pub payment_type: Option<String>,
    /// Situación del comprobante (key position 42).
    pub situation: Option<String>,
    /// Código de seguridad (8 characters, last block of the key).
    pub security_code: Option<String>,
    pub items: Vec<Item>,
    pub references: Vec<Reference>,
    pub summary: Option<Summary>,
    pub regulation: Option<Regulation>,
    /// Otros.
    pub others: Vec<OtherText>,
    /// Branch code (3 digits).
    pub headquarters: String,
    /// Point-of-sale code (5 digits).
    pub terminal: String,
    /// Root attributes, emitted verbatim.
    pub namespaces: Vec<(String, String)>,
}

static DOCUMENT_RULES: &[Field<Document>] = &[
    Field {
        name: "number",
        value: |d| Value::digits(d.number.filter(|n| *n > 0)),
        rules: &[Rule::Presence, Rule::MaxLength(10)],
    },
    Field {
        name: "date",
        value: |d| Value::of(d.date.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "issuer",
        value: |d| Value::of(d.issuer.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "condition",
        value: |d| Value::text(d.condition.as_deref()),
        rules: &[Rule::Presence, Rule::Membership(&CONDITIONS)],
    },
    Field {
        name: "credit_term",
        value: |d| Value::text(d.credit_term.as_deref()),
        rules: &[Rule::PresenceIf(|d| {
            d.condition.as_deref() == Some(CREDIT_CONDITION)
        })],
    },
    Field {
        name: "payment_type",
        value: |d| Value::text(d.payment_type.as_deref()),
        rules: &[Rule::Presence, Rule::Membership(&PAYMENT_TYPES)],
    },
    Field {
        name: "document_type",
        value: |d| Value::text(Some(d.kind.code())),
        rules: &[Rule::Presence, Rule::Membership(&DOCUMENT_TYPES)],
    },
    Field {
        name: "situation",
        value: |d| Value::text(d.situation.as_deref()),
        rules: &[Rule::Presence, Rule::Membership(&DOCUMENT_SITUATIONS)],
    },
    Field {
        name: "security_code",
        value: |d| Value::text(d.security_code.as_deref()),
        rules: &[Rule::Presence, Rule::Length(8)],
    },
    Field {
        name: "items",
        value: |d| Value::list(&d.items),
        rules: &[Rule::Presence],
    },
    Field {
        name: "references",
        value: |d| Value::list(&d.references),
        rules: &[Rule::PresenceIf(|d| d.kind.requires_references())],
    },
    Field {
        name: "summary",
        value: |d| Value::of(d.summary.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "regulation",
        value: |d| Value::of(d.regulation.as_ref()),
        rules: &[Rule::Presence],
    },
    Field {
        name: "headquarters",
        value: |d| Value::text(Some(d.headquarters.as_str())),
        rules: &[Rule::Presence, Rule::Numeric, Rule::Length(3)],
    },
    Field {
        name: "terminal",
        value: |d| Value::text(Some(d.terminal.as_str())),
        rules: &[Rule::Presence, Rule::Numeric, Rule::Length(5)],
    },
];

impl Validate for Document {
    /// Own rules followed by every descendant's, under dotted paths
    /// (`issuer.identification.number`, `items[0].taxes[1].code`).
    fn validate(&self) -> Violations {
        let mut violations = check(self, DOCUMENT_RULES);
        if let Some(issuer) = &self.issuer {
            violations.nest("issuer", issuer.validate());
        }
        if let Some(receiver) = &self.receiver {
            violations.nest("receiver", receiver.validate());
        }
        for (i, item) in self.items.iter().enumerate() {
            violations.nest(&format!("items[{i}]"), item.validate());
        }
        if let Some(summary) = &self.summary {
            violations.nest("summary", summary.validate());
        }
        for (i, reference) in self.references.iter().enumerate() {
            violations.nest(&format!("references[{i}]"), reference.validate());
        }
        if let Some(regulation) = &self.regulation {
            violations.nest("regulation", regulation.validate());
        }
        violations
    }
}

impl Document {
    /// The variant of this document.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Document type code, fixed by the variant.
    pub fn document_type(&self) -> &'static str {
        self.kind.code()
    }

    /// NumeroConsecutivo: headquarters + terminal + document type + number
    /// padded to 10 digits.
    ///
    /// Does not validate; a missing number renders as zeros.
    pub fn sequence(&self) -> String {
        format!(
            "{}{}{}{:0>10}",
            self.headquarters,
            self.terminal,
            self.kind.code(),
            self.number.unwrap_or_default()
        )
    }

    /// Clave: the 50-character document key.
    ///
    /// Fails with [`FacturaError::Validation`] on an invalid document and with
    /// [`FacturaError::Internal`] if the derived key is not 50 characters.
    pub fn key(&self) -> Result<String, FacturaError> {
        self.validate().into_result()?;
        self.derive_key()
    }

    /// Key derivation over an already validated document.
    fn derive_key(&self) -> Result<String, FacturaError> {
        let (Some(date), Some(id), Some(situation), Some(security_code)) = (
            self.date.as_ref(),
            self.issuer.as_ref().and_then(|i| i.identification.as_ref()),
            self.situation.as_deref(),
            self.security_code.as_deref(),
        ) else {
            return Err(FacturaError::Internal(
                "key derived from a document missing validated fields".into(),
            ));
        };

        let key = format!(
            "{COUNTRY_CODE}{:02}{:02}{:02}{}{}{situation}{security_code}",
            date.day(),
            date.month(),
            date.year().rem_euclid(100),
            id.number(),
            self.sequence(),
        );

        let len = key.chars().count();
        if len != KEY_LEN {
            tracing::error!(key = %key, len, "derived key has the wrong length");
            return Err(FacturaError::Internal(format!(
                "key '{key}' is {len} characters, expected {KEY_LEN}"
            )));
        }

        tracing::debug!(key = %key, document = self.kind.root_tag(), "derived document key");
        Ok(key)
    }

    /// The ordered output tree.
    ///
    /// Validates the whole document first; an invalid document yields no tree.
    pub fn to_tree(&self) -> Result<Node, FacturaError> {
        let violations = self.validate();
        if !violations.is_valid() {
            tracing::warn!(
                document = self.kind.root_tag(),
                violations = violations.len(),
                "document failed validation"
            );
            return Err(FacturaError::Validation(violations));
        }
        let key = self.derive_key()?;
        self.build_tree(key)
    }

    fn build_tree(&self, key: String) -> Result<Node, FacturaError> {
        let missing = |field: &str| FacturaError::Internal(format!("{field} vanished after validation"));
        let date = self.date.as_ref().ok_or_else(|| missing("date"))?;
        let issuer = self.issuer.as_ref().ok_or_else(|| missing("issuer"))?;
        let summary = self.summary.as_ref().ok_or_else(|| missing("summary"))?;
        let regulation = self.regulation.as_ref().ok_or_else(|| missing("regulation"))?;
        let condition = self.condition.as_deref().unwrap_or_default();

        let mut root = Node::new(self.kind.root_tag());
        root.attributes = self.namespaces.clone();

        root.push_text("Clave", key)
            .push_text("NumeroConsecutivo", self.sequence())
            .push_text("FechaEmision", format_timestamp(date))
            .push(issuer.build_fragment());
        if let Some(receiver) = &self.receiver {
            root.push(receiver.build_fragment());
        }
        root.push_text("CondicionVenta", condition);
        if condition == CREDIT_CONDITION {
            root.push_opt("PlazoCredito", self.credit_term.as_deref());
        }
        root.push_text("MedioPago", self.payment_type.as_deref().unwrap_or_default());

        let mut details = Node::new("DetalleServicio");
        for item in &self.items {
            details.push(item.build_fragment());
        }
        root.push(details).push(summary.build_fragment());

        for reference in &self.references {
            root.push(reference.build_fragment());
        }
        root.push(regulation.build_fragment());

        if !self.others.is_empty() {
            let mut others = Node::new("Otros");
            for text in &self.others {
                others.push(text.build_fragment());
            }
            root.push(others);
        }

        tracing::debug!(
            document = self.kind.root_tag(),
            items = self.items.len(),
            "serialized document tree"
        );
        Ok(root)
    }

    /// Reduced payload for the reception API.
    pub fn api_payload(&self) -> Result<ApiPayload, FacturaError> {
        let clave = self.key()?;
        let missing = |field: &str| FacturaError::Internal(format!("{field} vanished after validation"));
        let date = self.date.as_ref().ok_or_else(|| missing("date"))?;
        let issuer_id = self
            .issuer
            .as_ref()
            .and_then(|i| i.identification.as_ref())
            .ok_or_else(|| missing("issuer.identification"))?;

        Ok(ApiPayload {
            clave,
            fecha: format_timestamp(date),
            emisor: PartyIdentification::from(issuer_id),
            receptor: self
                .receiver
                .as_ref()
                .and_then(|r| r.identification.as_ref())
                .map(PartyIdentification::from),
        })
    }
}

/// Payload posted to the reception API alongside the signed XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPayload {
    pub clave: String,
    pub fecha: String,
    pub emisor: PartyIdentification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receptor: Option<PartyIdentification>,
}

/// Identification pair of a party in the API payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyIdentification {
    pub tipo_identificacion: String,
    /// 12-digit normalized number.
    pub numero_identificacion: String,
}

impl From<&IdentificationDocument> for PartyIdentification {
    fn from(id: &IdentificationDocument) -> Self {
        Self {
            tipo_identificacion: id.document_type().to_string(),
            numero_identificacion: id.number().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::*;
    use rust_decimal_macros::dec;

    fn valid_invoice() -> Document {
        let date = DateTime::parse_from_rfc3339("2023-05-10T09:00:00-06:00").unwrap();
        let item = ItemBuilder::new(1, "Servicio", dec!(1), "Sp", dec!(1000)).build();
        DocumentBuilder::invoice(42, date)
            .issuer(
                IssuerBuilder::new(
                    "Emisor S.A.",
                    IdentificationDocument::new("01", "301230456").unwrap(),
                    Location::new("1", "01", "01", "Centro"),
                    "e@example.cr",
                )
                .build(),
            )
            .condition("01")
            .payment_type("01")
            .situation("1")
            .security_code("A1B2C3D4")
            .summary(Summary::from_items(std::slice::from_ref(&item)))
            .add_item(item)
            .regulation(Regulation::default())
            .build()
    }

    #[test]
    fn derive_key_guards_length() {
        let mut doc = valid_invoice();
        doc.headquarters = "1".into();
        // Validation would catch this; derive directly to exercise the guard.
        let err = doc.derive_key().unwrap_err();
        assert!(matches!(err, FacturaError::Internal(_)));
        assert!(matches!(doc.key(), Err(FacturaError::Validation(_))));
    }

    #[test]
    fn kind_codes_round_trip() {
        for kind in [
            DocumentKind::Invoice,
            DocumentKind::DebitNote,
            DocumentKind::CreditNote,
            DocumentKind::Ticket,
        ] {
            assert_eq!(DocumentKind::from_code(kind.code()), Some(kind));
            assert!(DOCUMENT_TYPES.contains(kind.code()));
        }
        assert_eq!(DocumentKind::from_code("05"), None);
    }

    #[test]
    fn notes_require_references() {
        assert!(DocumentKind::CreditNote.requires_references());
        assert!(DocumentKind::DebitNote.requires_references());
        assert!(!DocumentKind::Invoice.requires_references());
        assert!(!DocumentKind::Ticket.requires_references());
    }

    #[test]
    fn two_digit_year() {
        let mut doc = valid_invoice();
        doc.date = Some(DateTime::parse_from_rfc3339("2105-01-02T00:00:00+00:00").unwrap());
        let key = doc.key().unwrap();
        assert_eq!(&key[3..9], "020105");
    }
}
