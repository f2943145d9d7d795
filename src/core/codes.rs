//! Hacienda v4.2 code tables.
//!
//! Each table maps a code to its label. Key sets are a compliance contract:
//! membership rules accept exactly these codes. Entries are sorted for
//! binary search.

/// A static code → label table used for membership validation.
#[derive(Debug)]
pub struct CodeTable {
    name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl CodeTable {
    const fn new(name: &'static str, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, entries }
    }

    /// Table name, used in violation messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check whether `code` is a key of this table.
    pub fn contains(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    /// Label for `code`, if known.
    pub fn label(&self, code: &str) -> Option<&'static str> {
        self.position(code).map(|i| self.entries[i].1)
    }

    /// All codes in table order.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(code, _)| *code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.entries.binary_search_by(|(c, _)| (*c).cmp(code)).ok()
    }
}

/// Condition-of-sale code for credit sales; makes `PlazoCredito` mandatory.
pub const CREDIT_CONDITION: &str = "02";

/// Condición de la venta.
pub static CONDITIONS: CodeTable = CodeTable::new(
    "condition",
    &[
        ("01", "Contado"),
        ("02", "Crédito"),
        ("03", "Consignación"),
        ("04", "Apartado"),
        ("05", "Arrendamiento con Opción de Compra"),
        ("06", "Arrendamiento en Función Financiera"),
        ("99", "Otros"),
    ],
);

/// Medio de pago.
pub static PAYMENT_TYPES: CodeTable = CodeTable::new(
    "payment type",
    &[
        ("01", "Efectivo"),
        ("02", "Tarjeta"),
        ("03", "Cheque"),
        ("04", "Transferencia"),
        ("05", "Recaudado por Terceros"),
        ("99", "Otros"),
    ],
);

/// Tipo de documento. Also used for `InformacionReferencia/TipoDoc`.
pub static DOCUMENT_TYPES: CodeTable = CodeTable::new(
    "document type",
    &[
        ("01", "Factura Electrónica"),
        ("02", "Nota de débito"),
        ("03", "Nota de crédito"),
        ("04", "Tiquete Electrónico"),
        ("05", "Nota de despacho"),
        ("06", "Contrato"),
        ("07", "Procedimiento"),
        ("08", "Comprobante Emitido en Contingencia"),
        ("99", "Otros"),
    ],
);

/// Situación del comprobante. Single character, position 42 of the key.
pub static DOCUMENT_SITUATIONS: CodeTable = CodeTable::new(
    "document situation",
    &[("1", "Normal"), ("2", "Contingencia"), ("3", "Sin Internet")],
);

/// Tipo de identificación.
pub static IDENTIFICATION_TYPES: CodeTable = CodeTable::new(
    "identification type",
    &[
        ("01", "Cédula Física"),
        ("02", "Cédula Jurídica"),
        ("03", "DIMEX"),
        ("04", "NITE"),
    ],
);

/// Tipo de documento de exoneración.
pub static EXONERATION_TYPES: CodeTable = CodeTable::new(
    "exoneration type",
    &[
        ("01", "Compras Autorizadas"),
        ("02", "Ventas exentas a diplomáticos"),
        ("03", "Orden de Compra (Instituciones Públicas y otros organismos)"),
        ("04", "Exenciones Dirección General de Hacienda"),
        ("05", "Zonas Francas"),
        ("99", "Otros"),
    ],
);

/// Código del impuesto.
pub static TAX_CODES: CodeTable = CodeTable::new(
    "tax code",
    &[
        ("01", "Impuesto General sobre las Ventas"),
        ("02", "Impuesto Selectivo de Consumo"),
        ("03", "Impuesto Único a los combustibles"),
        ("04", "Impuesto específico de Bebidas Alcohólicas"),
        ("05", "Impuesto Específico sobre las bebidas envasadas sin contenido alcohólico y jabones de tocador"),
        ("06", "Impuesto a los Productos de Tabaco"),
        ("07", "Servicio"),
        ("08", "Impuesto General sobre las Ventas Diplomáticos"),
        ("09", "Impuesto General sobre las Ventas Compras Autorizadas"),
        ("10", "Impuesto General sobre las Ventas Instituciones Públicas y otros organismos"),
        ("11", "Impuesto Selectivo de Consumo Compras Autorizadas"),
        ("12", "Impuesto Específico al Cemento"),
        ("99", "Otros"),
    ],
);

/// Código de referencia.
pub static REFERENCE_CODES: CodeTable = CodeTable::new(
    "reference code",
    &[
        ("01", "Anula Documento de Referencia"),
        ("02", "Corrige texto documento de referencia"),
        ("03", "Corrige monto"),
        ("04", "Referencia a otro documento"),
        ("05", "Sustituye comprobante provisional por contingencia"),
        ("99", "Otros"),
    ],
);

/// Tipo de código de producto/servicio.
pub static PRODUCT_CODE_TYPES: CodeTable = CodeTable::new(
    "product code type",
    &[
        ("01", "Código del producto del vendedor"),
        ("02", "Código del producto del comprador"),
        ("03", "Código del producto asignado por la industria"),
        ("04", "Código uso interno"),
        ("99", "Otros"),
    ],
);

/// Units of measure that denote services rather than goods.
pub(crate) static SERVICE_UNITS: &[&str] = &["Al", "Alc", "Cm", "I", "Os", "Sp", "Spe", "St"];

pub(crate) fn is_service_unit(unit: &str) -> bool {
    SERVICE_UNITS.binary_search(&unit).is_ok()
}
