//! XML rendering of fiscal documents and identification parsing.
//!
//! Renders the ordered tree from [`Document::to_tree`](crate::core::Document::to_tree)
//! as indented UTF-8 XML in the Hacienda v4.2 element layout. The output is
//! unsigned; the signature is applied downstream.
//!
//! # Example
//!
//! ```
//! # use chrono::DateTime;
//! # use rust_decimal_macros::dec;
//! use facturacr::core::*;
//! use facturacr::xml;
//!
//! # let date = DateTime::parse_from_rfc3339("2023-05-10T09:00:00-06:00").unwrap();
//! # let item = ItemBuilder::new(1, "Servicio", dec!(1), "Sp", dec!(1000)).build();
//! let invoice = DocumentBuilder::invoice(42, date)
//!     .issuer(IssuerBuilder::new(
//!         "Comercial S.A.",
//!         IdentificationDocument::new("01", "301230456").unwrap(),
//!         Location::new("1", "01", "01", "Avenida Central"),
//!         "facturas@comercial.cr",
//!     ).build())
//!     .condition("01")
//!     .payment_type("01")
//!     .situation("1")
//!     .security_code("A1B2C3D4")
//! #   .summary(Summary::from_items(std::slice::from_ref(&item)))
//! #   .add_item(item)
//!     .regulation(Regulation::default())
//!     .build();
//!
//! let xml = xml::to_xml(&invoice).unwrap();
//! let ids = xml::read_identifications(&xml).unwrap();
//! assert_eq!(ids[0].identification.number(), "000301230456");
//! ```

mod reader;
mod writer;

pub use reader::{ParsedIdentification, read_identifications};

use crate::core::{Document, FacturaError, Node};
use writer::XmlWriter;

/// Render any node tree, preceded by the XML declaration.
pub fn render(node: &Node) -> Result<String, FacturaError> {
    let mut w = XmlWriter::new()?;
    w.node(node)?;
    w.into_string()
}

/// Validate `doc` and render it as XML.
///
/// An invalid document yields [`FacturaError::Validation`] and no output.
pub fn to_xml(doc: &Document) -> Result<String, FacturaError> {
    let tree = doc.to_tree()?;
    let xml = render(&tree)?;
    tracing::debug!(root = %tree.name, bytes = xml.len(), "rendered document XML");
    Ok(xml)
}
