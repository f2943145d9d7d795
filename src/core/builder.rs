use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use super::document::{DEFAULT_HEADQUARTERS, DEFAULT_TERMINAL, Document, DocumentKind};
use super::types::*;

/// Builder for fiscal documents.
///
/// Building never validates; call [`Validate::validate`](super::Validate::validate)
/// or any derived output (`key`, `to_tree`) to check the result.
///
/// ```
/// use chrono::DateTime;
/// use facturacr::core::*;
///
/// let date = DateTime::parse_from_rfc3339("2024-02-01T08:30:00-06:00").unwrap();
/// let note = DocumentBuilder::credit_note(7, date)
///     .headquarters("002")
///     .terminal("00010")
///     .build();
///
/// assert_eq!(note.sequence(), "00200010030000000007");
/// assert!(!note.is_valid());
/// ```
pub struct DocumentBuilder {
    kind: DocumentKind,
    number: u64,
    date: DateTime<FixedOffset>,
    issuer: Option<Issuer>,
    receiver: Option<Receiver>,
    condition: Option<String>,
    credit_term: Option<String>,
    payment_type: Option<String>,
    situation: Option<String>,
    security_code: Option<String>,
    items: Vec<Item>,
    references: Vec<Reference>,
    summary: Option<Summary>,
    regulation: Option<Regulation>,
    others: Vec<OtherText>,
    headquarters: String,
    terminal: String,
    namespaces: Option<Vec<(String, String)>>,
}

impl DocumentBuilder {
    pub fn new(kind: DocumentKind, number: u64, date: DateTime<FixedOffset>) -> Self {
        Self {
            kind,
            number,
            date,
            issuer: None,
            receiver: None,
            condition: None,
            credit_term: None,
            payment_type: None,
            situation: None,
            security_code: None,
            items: Vec::new(),
            references: Vec::new(),
            summary: None,
            regulation: None,
            others: Vec::new(),
            headquarters: DEFAULT_HEADQUARTERS.to_string(),
            terminal: DEFAULT_TERMINAL.to_string(),
            namespaces: None,
        }
    }

    pub fn invoice(number: u64, date: DateTime<FixedOffset>) -> Self {
        Self::new(DocumentKind::Invoice, number, date)
    }

    pub fn debit_note(number: u64, date: DateTime<FixedOffset>) -> Self {
        Self::new(DocumentKind::DebitNote, number, date)
    }

    pub fn credit_note(number: u64, date: DateTime<FixedOffset>) -> Self {
        Self::new(DocumentKind::CreditNote, number, date)
    }

    pub fn ticket(number: u64, date: DateTime<FixedOffset>) -> Self {
        Self::new(DocumentKind::Ticket, number, date)
    }

    pub fn issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn condition(mut self, code: impl Into<String>) -> Self {
        self.condition = Some(code.into());
        self
    }

    pub fn credit_term(mut self, term: impl Into<String>) -> Self {
        self.credit_term = Some(term.into());
        self
    }

    pub fn payment_type(mut self, code: impl Into<String>) -> Self {
        self.payment_type = Some(code.into());
        self
    }

    pub fn situation(mut self, code: impl Into<String>) -> Self {
        self.situation = Some(code.into());
        self
    }

    pub fn security_code(mut self, code: impl Into<String>) -> Self {
        self.security_code = Some(code.into());
        self
    }

    pub fn add_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn add_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn summary(mut self, summary: Summary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn regulation(mut self, regulation: Regulation) -> Self {
        self.regulation = Some(regulation);
        self
    }

    pub fn add_other(mut self, text: OtherText) -> Self {
        self.others.push(text);
        self
    }

    /// Branch code (default "001").
    pub fn headquarters(mut self, code: impl Into<String>) -> Self {
        self.headquarters = code.into();
        self
    }

    /// Point-of-sale code (default "00001").
    pub fn terminal(mut self, code: impl Into<String>) -> Self {
        self.terminal = code.into();
        self
    }

    /// Replace the root declarations. Defaults to the variant's schema set.
    pub fn namespaces<K, V>(mut self, namespaces: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.namespaces = Some(
            namespaces
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn build(self) -> Document {
        Document {
            namespaces: self
                .namespaces
                .unwrap_or_else(|| self.kind.default_namespaces()),
            kind: self.kind,
            number: Some(self.number),
            date: Some(self.date),
            issuer: self.issuer,
            receiver: self.receiver,
            condition: self.condition,
            credit_term: self.credit_term,
            payment_type: self.payment_type,
            situation: self.situation,
            security_code: self.security_code,
            items: self.items,
            references: self.references,
            summary: self.summary,
            regulation: self.regulation,
            others: self.others,
            headquarters: self.headquarters,
            terminal: self.terminal,
        }
    }
}

/// Builder for the issuing party.
pub struct IssuerBuilder {
    name: String,
    identification: IdentificationDocument,
    commercial_name: Option<String>,
    location: Location,
    phone: Option<Phone>,
    fax: Option<Phone>,
    email: String,
}

impl IssuerBuilder {
    pub fn new(
        name: impl Into<String>,
        identification: IdentificationDocument,
        location: Location,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            identification,
            commercial_name: None,
            location,
            phone: None,
            fax: None,
            email: email.into(),
        }
    }

    pub fn commercial_name(mut self, name: impl Into<String>) -> Self {
        self.commercial_name = Some(name.into());
        self
    }

    pub fn phone(mut self, country_code: impl Into<String>, number: impl Into<String>) -> Self {
        self.phone = Some(Phone::new(country_code, number));
        self
    }

    pub fn fax(mut self, country_code: impl Into<String>, number: impl Into<String>) -> Self {
        self.fax = Some(Phone::fax(country_code, number));
        self
    }

    pub fn build(self) -> Issuer {
        Issuer {
            name: Some(self.name),
            identification: Some(self.identification),
            commercial_name: self.commercial_name,
            location: Some(self.location),
            phone: self.phone,
            fax: self.fax,
            email: Some(self.email),
        }
    }
}

/// Builder for the receiving party. Only the name is mandatory.
pub struct ReceiverBuilder {
    name: String,
    identification: Option<IdentificationDocument>,
    foreign_id_number: Option<String>,
    commercial_name: Option<String>,
    location: Option<Location>,
    phone: Option<Phone>,
    fax: Option<Phone>,
    email: Option<String>,
}

impl ReceiverBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identification: None,
            foreign_id_number: None,
            commercial_name: None,
            location: None,
            phone: None,
            fax: None,
            email: None,
        }
    }

    pub fn identification(mut self, id: IdentificationDocument) -> Self {
        self.identification = Some(id);
        self
    }

    pub fn foreign_id_number(mut self, number: impl Into<String>) -> Self {
        self.foreign_id_number = Some(number.into());
        self
    }

    pub fn commercial_name(mut self, name: impl Into<String>) -> Self {
        self.commercial_name = Some(name.into());
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn phone(mut self, country_code: impl Into<String>, number: impl Into<String>) -> Self {
        self.phone = Some(Phone::new(country_code, number));
        self
    }

    pub fn fax(mut self, country_code: impl Into<String>, number: impl Into<String>) -> Self {
        self.fax = Some(Phone::fax(country_code, number));
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn build(self) -> Receiver {
        Receiver {
            name: Some(self.name),
            identification: self.identification,
            foreign_id_number: self.foreign_id_number,
            commercial_name: self.commercial_name,
            location: self.location,
            phone: self.phone,
            fax: self.fax,
            email: self.email,
        }
    }
}

/// Builder for line items. Amounts are derived at build:
/// `MontoTotal = quantity * unit_price`, `SubTotal = MontoTotal - discount`,
/// `MontoTotalLinea = SubTotal + taxes`.
pub struct ItemBuilder {
    line_number: u32,
    description: String,
    quantity: Decimal,
    unit: String,
    unit_price: Decimal,
    code: Option<ProductCode>,
    commercial_unit: Option<String>,
    discount: Option<(Decimal, String)>,
    taxes: Vec<Tax>,
    exoneration: Option<Exoneration>,
}

impl ItemBuilder {
    pub fn new(
        line_number: u32,
        description: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            line_number,
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            code: None,
            commercial_unit: None,
            discount: None,
            taxes: Vec::new(),
            exoneration: None,
        }
    }

    pub fn code(mut self, code_type: impl Into<String>, code: impl Into<String>) -> Self {
        self.code = Some(ProductCode::new(code_type, code));
        self
    }

    pub fn commercial_unit(mut self, unit: impl Into<String>) -> Self {
        self.commercial_unit = Some(unit.into());
        self
    }

    pub fn discount(mut self, amount: Decimal, reason: impl Into<String>) -> Self {
        self.discount = Some((amount, reason.into()));
        self
    }

    pub fn tax(mut self, tax: Tax) -> Self {
        self.taxes.push(tax);
        self
    }

    pub fn exoneration(mut self, exoneration: Exoneration) -> Self {
        self.exoneration = Some(exoneration);
        self
    }

    pub fn build(self) -> Item {
        let total = self.quantity * self.unit_price;
        let (discount, discount_reason) = match self.discount {
            Some((amount, reason)) => (Some(amount), Some(reason)),
            None => (None, None),
        };
        let subtotal = total - discount.unwrap_or(Decimal::ZERO);
        let taxes_total: Decimal = self.taxes.iter().filter_map(|t| t.total).sum();

        Item {
            line_number: Some(self.line_number),
            code: self.code,
            quantity: Some(self.quantity),
            unit: Some(self.unit),
            commercial_unit: self.commercial_unit,
            description: Some(self.description),
            unit_price: Some(self.unit_price),
            total: Some(total),
            discount,
            discount_reason,
            subtotal: Some(subtotal),
            taxes: self.taxes,
            exoneration: self.exoneration,
            net_total: Some(subtotal + taxes_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2023-05-10T09:00:00-06:00").unwrap()
    }

    #[test]
    fn defaults_headquarters_and_terminal() {
        let doc = DocumentBuilder::invoice(1, date()).build();
        assert_eq!(doc.headquarters, "001");
        assert_eq!(doc.terminal, "00001");
        assert_eq!(doc.kind(), DocumentKind::Invoice);
        assert_eq!(doc.namespaces[0].0, "xmlns");
        assert_eq!(doc.namespaces.len(), 4);
    }

    #[test]
    fn namespaces_override_defaults() {
        let doc = DocumentBuilder::ticket(1, date())
            .namespaces([("xmlns", "urn:test")])
            .build();
        assert_eq!(doc.namespaces, [("xmlns".to_string(), "urn:test".to_string())]);
    }

    #[test]
    fn item_amounts_are_derived() {
        let item = ItemBuilder::new(1, "Mesa", dec!(3), "Unid", dec!(150))
            .discount(dec!(50), "Liquidación")
            .tax(Tax::levied("01", dec!(13), dec!(400)))
            .build();
        assert_eq!(item.total, Some(dec!(450)));
        assert_eq!(item.subtotal, Some(dec!(400)));
        assert_eq!(item.net_total, Some(dec!(452)));
        assert_eq!(item.discount_reason.as_deref(), Some("Liquidación"));
    }

    #[test]
    fn receiver_only_needs_name() {
        let receiver = ReceiverBuilder::new("Cliente Contado").build();
        assert!(receiver.identification.is_none());
        assert!(crate::core::Validate::is_valid(&receiver));
    }
}
