//! # facturacr
//!
//! Costa Rican electronic fiscal documents (comprobantes electrónicos):
//! invoices, debit notes, credit notes and tickets.
//!
//! The crate validates a caller-built document tree, derives the 50-character
//! `Clave` and the 20-digit `NumeroConsecutivo`, and serializes the
//! document into the Hacienda v4.2 element layout plus the flat payload
//! submitted to the reception API. Signing and transport are left to the
//! caller.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::DateTime;
//! use facturacr::core::*;
//! use rust_decimal_macros::dec;
//!
//! let date = DateTime::parse_from_rfc3339("2023-05-10T09:00:00-06:00").unwrap();
//! let issuer = IssuerBuilder::new(
//!     "Comercial S.A.",
//!     IdentificationDocument::new("01", "301230456").unwrap(),
//!     Location::new("1", "01", "01", "Avenida Central"),
//!     "facturas@comercial.cr",
//! )
//! .build();
//!
//! let item = ItemBuilder::new(1, "Consultoría", dec!(2), "Sp", dec!(50000))
//!     .tax(Tax::levied("01", dec!(13), dec!(100000)))
//!     .build();
//! let summary = Summary::from_items(std::slice::from_ref(&item));
//!
//! let invoice = DocumentBuilder::invoice(42, date)
//!     .issuer(issuer)
//!     .condition("01")
//!     .payment_type("01")
//!     .situation("1")
//!     .security_code("A1B2C3D4")
//!     .add_item(item)
//!     .summary(summary)
//!     .regulation(Regulation::default())
//!     .build();
//!
//! assert_eq!(invoice.key().unwrap(), "506100523000301230456001000010100000000421A1B2C3D4");
//! assert_eq!(invoice.sequence(), "00100001010000000042");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Document model, code tables, validation, key derivation |
//! | `xml` | XML rendering and identification parsing (quick-xml) |
//! | `api` | JSON rendering of the reception API payload |
//! | `all` | Everything (also the default) |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "api")]
pub mod api;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
