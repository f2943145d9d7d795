//! JSON rendering of the reception API payload.
//!
//! The payload carries the key, the emission timestamp and the identification
//! pairs of both parties. The signed XML and the HTTP exchange are left to the
//! caller.

use crate::core::{Document, FacturaError};

/// Validate `doc` and render its API payload as JSON.
///
/// ```
/// # use chrono::DateTime;
/// # use facturacr::core::*;
/// # use rust_decimal_macros::dec;
/// # let date = DateTime::parse_from_rfc3339("2023-05-10T09:00:00-06:00").unwrap();
/// # let item = ItemBuilder::new(1, "Servicio", dec!(1), "Sp", dec!(1000)).build();
/// # let doc = DocumentBuilder::ticket(5, date)
/// #     .issuer(IssuerBuilder::new(
/// #         "Soda La Esquina",
/// #         IdentificationDocument::new("01", "114480790").unwrap(),
/// #         Location::new("2", "01", "03", "Frente al parque"),
/// #         "soda@example.cr",
/// #     ).build())
/// #     .condition("01").payment_type("01").situation("1").security_code("12345678")
/// #     .summary(Summary::from_items(std::slice::from_ref(&item)))
/// #     .add_item(item)
/// #     .regulation(Regulation::default())
/// #     .build();
/// let json = facturacr::api::to_json(&doc).unwrap();
/// assert!(json.contains(r#""numeroIdentificacion":"000114480790""#));
/// assert!(!json.contains("receptor"));
/// ```
pub fn to_json(doc: &Document) -> Result<String, FacturaError> {
    let payload = doc.api_payload()?;
    serde_json::to_string(&payload).map_err(|e| FacturaError::Json(e.to_string()))
}

/// Like [`to_json`], pretty-printed.
pub fn to_json_pretty(doc: &Document) -> Result<String, FacturaError> {
    let payload = doc.api_payload()?;
    serde_json::to_string_pretty(&payload).map_err(|e| FacturaError::Json(e.to_string()))
}
