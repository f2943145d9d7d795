use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FacturaError;

/// Identificacion: identification type plus number.
///
/// The number is kept twice: as supplied (emitted in `Numero`) and
/// left-padded with zeros to exactly 12 digits (used in the key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IdentificationFields")]
pub struct IdentificationDocument {
    document_type: String,
    raw_number: String,
    number: String,
}

impl IdentificationDocument {
    /// Width of the normalized number.
    pub const NORMALIZED_LEN: usize = 12;

    /// Build from a type code and a numeric string of at most 12 digits.
    ///
    /// The type code is checked by validation, not here.
    pub fn new(
        document_type: impl Into<String>,
        number: impl Into<String>,
    ) -> Result<Self, FacturaError> {
        let raw_number = number.into();
        if raw_number.is_empty() || !raw_number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FacturaError::Builder(format!(
                "identification number '{raw_number}' must be numeric"
            )));
        }
        if raw_number.len() > Self::NORMALIZED_LEN {
            return Err(FacturaError::Builder(format!(
                "identification number '{raw_number}' exceeds {} digits",
                Self::NORMALIZED_LEN
            )));
        }
        let number = format!("{raw_number:0>width$}", width = Self::NORMALIZED_LEN);
        Ok(Self {
            document_type: document_type.into(),
            raw_number,
            number,
        })
    }

    /// Identification type code (`Tipo`).
    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    /// Number as supplied (`Numero`).
    pub fn raw_number(&self) -> &str {
        &self.raw_number
    }

    /// Number padded to 12 digits.
    pub fn number(&self) -> &str {
        &self.number
    }
}

#[derive(Deserialize)]
struct IdentificationFields {
    document_type: String,
    raw_number: String,
}

impl TryFrom<IdentificationFields> for IdentificationDocument {
    type Error = FacturaError;

    fn try_from(fields: IdentificationFields) -> Result<Self, Self::Error> {
        Self::new(fields.document_type, fields.raw_number)
    }
}

/// Ubicacion: province / county / district address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Provincia (1 digit).
    pub province: Option<String>,
    /// Canton (2 digits).
    pub county: Option<String>,
    /// Distrito (2 digits).
    pub district: Option<String>,
    /// Barrio (2 digits, optional).
    pub neighborhood: Option<String>,
    /// OtrasSenas: free-text directions.
    pub others: Option<String>,
}

impl Location {
    pub fn new(
        province: impl Into<String>,
        county: impl Into<String>,
        district: impl Into<String>,
        others: impl Into<String>,
    ) -> Self {
        Self {
            province: Some(province.into()),
            county: Some(county.into()),
            district: Some(district.into()),
            neighborhood: None,
            others: Some(others.into()),
        }
    }

    pub fn neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }
}

/// Which element a [`Phone`] renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhoneType {
    /// Telefono.
    Phone,
    /// Fax.
    Fax,
}

impl PhoneType {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Phone => "Telefono",
            Self::Fax => "Fax",
        }
    }
}

/// Telefono / Fax: country calling code plus number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub kind: PhoneType,
    /// CodigoPais (e.g. "506").
    pub country_code: Option<String>,
    /// NumTelefono.
    pub number: Option<String>,
}

impl Phone {
    pub fn new(country_code: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            kind: PhoneType::Phone,
            country_code: Some(country_code.into()),
            number: Some(number.into()),
        }
    }

    pub fn fax(country_code: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            kind: PhoneType::Fax,
            ..Self::new(country_code, number)
        }
    }
}

/// Emisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub name: Option<String>,
    pub identification: Option<IdentificationDocument>,
    pub commercial_name: Option<String>,
    pub location: Option<Location>,
    pub phone: Option<Phone>,
    pub fax: Option<Phone>,
    pub email: Option<String>,
}

/// Receptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    pub name: Option<String>,
    pub identification: Option<IdentificationDocument>,
    /// IdentificacionExtranjero: for receivers without a local id.
    pub foreign_id_number: Option<String>,
    pub commercial_name: Option<String>,
    pub location: Option<Location>,
    pub phone: Option<Phone>,
    pub fax: Option<Phone>,
    pub email: Option<String>,
}

/// Codigo: product/service code on a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCode {
    /// Tipo (see [`PRODUCT_CODE_TYPES`](super::codes::PRODUCT_CODE_TYPES)).
    pub code_type: Option<String>,
    pub code: Option<String>,
}

impl ProductCode {
    pub fn new(code_type: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            code_type: Some(code_type.into()),
            code: Some(code.into()),
        }
    }
}

/// Impuesto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    /// Codigo (see [`TAX_CODES`](super::codes::TAX_CODES)).
    pub code: Option<String>,
    /// Tarifa: percentage.
    pub rate: Option<Decimal>,
    /// Monto.
    pub total: Option<Decimal>,
}

impl Tax {
    pub fn new(code: impl Into<String>, rate: Decimal, total: Decimal) -> Self {
        Self {
            code: Some(code.into()),
            rate: Some(rate),
            total: Some(total),
        }
    }

    /// Tax at `rate` percent of `taxable`, rounded to 5 decimals.
    pub fn levied(code: impl Into<String>, rate: Decimal, taxable: Decimal) -> Self {
        let total = (taxable * rate / Decimal::ONE_HUNDRED).round_dp(5);
        Self::new(code, rate, total)
    }
}

/// Exoneracion: tax exemption backing a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exoneration {
    /// TipoDocumento (see [`EXONERATION_TYPES`](super::codes::EXONERATION_TYPES)).
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub institution: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    /// MontoImpuesto: exempted tax amount.
    pub total_tax: Option<Decimal>,
    /// PorcentajeCompra.
    pub percentage: Option<Decimal>,
}

impl Exoneration {
    pub fn new(
        document_type: impl Into<String>,
        document_number: impl Into<String>,
        institution: impl Into<String>,
        date: DateTime<FixedOffset>,
        total_tax: Decimal,
        percentage: Decimal,
    ) -> Self {
        Self {
            document_type: Some(document_type.into()),
            document_number: Some(document_number.into()),
            institution: Some(institution.into()),
            date: Some(date),
            total_tax: Some(total_tax),
            percentage: Some(percentage),
        }
    }
}

/// LineaDetalle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// NumeroLinea (1-based).
    pub line_number: Option<u32>,
    pub code: Option<ProductCode>,
    pub quantity: Option<Decimal>,
    /// UnidadMedida (e.g. "Unid", "Sp", "kg").
    pub unit: Option<String>,
    /// UnidadMedidaComercial.
    pub commercial_unit: Option<String>,
    /// Detalle.
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    /// MontoTotal = quantity * unit_price.
    pub total: Option<Decimal>,
    /// MontoDescuento.
    pub discount: Option<Decimal>,
    /// NaturalezaDescuento: required when a discount is given.
    pub discount_reason: Option<String>,
    /// SubTotal = total - discount.
    pub subtotal: Option<Decimal>,
    pub taxes: Vec<Tax>,
    pub exoneration: Option<Exoneration>,
    /// MontoTotalLinea = subtotal + taxes.
    pub net_total: Option<Decimal>,
}

/// InformacionReferencia: a prior document this one amends or cites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// TipoDoc (see [`DOCUMENT_TYPES`](super::codes::DOCUMENT_TYPES)).
    pub document_type: Option<String>,
    /// Numero: usually the referenced document's key.
    pub number: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    /// Codigo (see [`REFERENCE_CODES`](super::codes::REFERENCE_CODES)).
    pub code: Option<String>,
    /// Razon.
    pub reason: Option<String>,
}

impl Reference {
    pub fn new(
        document_type: impl Into<String>,
        number: impl Into<String>,
        date: DateTime<FixedOffset>,
        code: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            document_type: Some(document_type.into()),
            number: Some(number.into()),
            date: Some(date),
            code: Some(code.into()),
            reason: Some(reason.into()),
        }
    }
}

/// Normativa: the resolution authorizing electronic documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulation {
    /// NumeroResolucion.
    pub number: Option<String>,
    /// FechaResolucion, as published ("dd-mm-yyyy hh:mm:ss").
    pub date: Option<String>,
}

impl Regulation {
    pub fn new(number: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            date: Some(date.into()),
        }
    }
}

impl Default for Regulation {
    /// Resolution DGT-R-48-2016.
    fn default() -> Self {
        Self::new("DGT-R-48-2016", "07-10-2016 08:00:00")
    }
}

/// ResumenFactura: document totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// CodigoMoneda (ISO 4217); absent means colones.
    pub currency: Option<String>,
    /// TipoCambio: required for any currency other than CRC.
    pub exchange_rate: Option<Decimal>,
    pub services_taxable_total: Decimal,
    pub services_exempt_total: Decimal,
    pub goods_taxable_total: Decimal,
    pub goods_exempt_total: Decimal,
    pub taxable_total: Decimal,
    pub exempt_total: Decimal,
    /// TotalVenta.
    pub sale_total: Decimal,
    pub discount_total: Decimal,
    /// TotalVentaNeta.
    pub net_sale_total: Decimal,
    pub tax_total: Decimal,
    /// TotalComprobante.
    pub voucher_total: Decimal,
}

/// OtroTexto: free text with arbitrary attributes. Not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherText {
    pub content: String,
    pub attributes: IndexMap<String, String>,
}

impl OtherText {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}
