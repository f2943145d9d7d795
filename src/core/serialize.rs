//! Fragment emitters. Element order inside each fragment is fixed by the
//! Hacienda v4.2 schema.

use super::error::FacturaError;
use super::format::format_timestamp;
use super::tree::{Node, ToFragment};
use super::types::*;

impl ToFragment for IdentificationDocument {
    fn tag(&self) -> &str {
        "Identificacion"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_text("Tipo", self.document_type())
            .push_text("Numero", self.raw_number());
        node
    }
}

impl IdentificationDocument {
    /// Recover an identification from its `Identificacion` fragment.
    pub fn from_node(node: &Node) -> Result<Self, FacturaError> {
        if node.name != "Identificacion" {
            return Err(FacturaError::Builder(format!(
                "expected Identificacion, found {}",
                node.name
            )));
        }
        let document_type = node
            .text_of("Tipo")
            .ok_or_else(|| FacturaError::Builder("Identificacion without Tipo".into()))?;
        let number = node
            .text_of("Numero")
            .ok_or_else(|| FacturaError::Builder("Identificacion without Numero".into()))?;
        Self::new(document_type, number)
    }
}

impl ToFragment for Location {
    fn tag(&self) -> &str {
        "Ubicacion"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_opt("Provincia", self.province.as_deref())
            .push_opt("Canton", self.county.as_deref())
            .push_opt("Distrito", self.district.as_deref())
            .push_opt("Barrio", self.neighborhood.as_deref())
            .push_opt("OtrasSenas", self.others.as_deref());
        node
    }
}

impl ToFragment for Phone {
    fn tag(&self) -> &str {
        self.kind.tag()
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_opt("CodigoPais", self.country_code.as_deref())
            .push_opt("NumTelefono", self.number.as_deref());
        node
    }
}

impl ToFragment for Issuer {
    fn tag(&self) -> &str {
        "Emisor"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_opt("Nombre", self.name.as_deref());
        if let Some(id) = &self.identification {
            node.push(id.build_fragment());
        }
        node.push_opt("NombreComercial", self.commercial_name.as_deref());
        if let Some(location) = &self.location {
            node.push(location.build_fragment());
        }
        // The issuer's phone and fax always render under their own tags.
        if let Some(phone) = &self.phone {
            node.push(Phone { kind: PhoneType::Phone, ..phone.clone() }.build_fragment());
        }
        if let Some(fax) = &self.fax {
            node.push(Phone { kind: PhoneType::Fax, ..fax.clone() }.build_fragment());
        }
        node.push_opt("CorreoElectronico", self.email.as_deref());
        node
    }
}

impl ToFragment for Receiver {
    fn tag(&self) -> &str {
        "Receptor"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_opt("Nombre", self.name.as_deref());
        if let Some(id) = &self.identification {
            node.push(id.build_fragment());
        }
        node.push_opt("IdentificacionExtranjero", self.foreign_id_number.as_deref())
            .push_opt("NombreComercial", self.commercial_name.as_deref());
        if let Some(location) = &self.location {
            node.push(location.build_fragment());
        }
        if let Some(phone) = &self.phone {
            node.push(Phone { kind: PhoneType::Phone, ..phone.clone() }.build_fragment());
        }
        if let Some(fax) = &self.fax {
            node.push(Phone { kind: PhoneType::Fax, ..fax.clone() }.build_fragment());
        }
        node.push_opt("CorreoElectronico", self.email.as_deref());
        node
    }
}

impl ToFragment for ProductCode {
    fn tag(&self) -> &str {
        "Codigo"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_opt("Tipo", self.code_type.as_deref())
            .push_opt("Codigo", self.code.as_deref());
        node
    }
}

impl ToFragment for Tax {
    fn tag(&self) -> &str {
        "Impuesto"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_opt("Codigo", self.code.as_deref())
            .push_opt_amount("Tarifa", self.rate)
            .push_opt_amount("Monto", self.total);
        node
    }
}

impl ToFragment for Exoneration {
    fn tag(&self) -> &str {
        "Exoneracion"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_opt("TipoDocumento", self.document_type.as_deref())
            .push_opt("NumeroDocumento", self.document_number.as_deref())
            .push_opt("NombreInstitucion", self.institution.as_deref());
        if let Some(date) = &self.date {
            node.push_text("FechaEmision", format_timestamp(date));
        }
        node.push_opt_amount("MontoImpuesto", self.total_tax);
        if let Some(percentage) = self.percentage {
            node.push_text("PorcentajeCompra", percentage.normalize().to_string());
        }
        node
    }
}

impl ToFragment for Item {
    fn tag(&self) -> &str {
        "LineaDetalle"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        if let Some(line_number) = self.line_number {
            node.push_text("NumeroLinea", line_number.to_string());
        }
        if let Some(code) = &self.code {
            node.push(code.build_fragment());
        }
        if let Some(quantity) = self.quantity {
            node.push_text("Cantidad", quantity.normalize().to_string());
        }
        node.push_opt("UnidadMedida", self.unit.as_deref())
            .push_opt("UnidadMedidaComercial", self.commercial_unit.as_deref())
            .push_opt("Detalle", self.description.as_deref())
            .push_opt_amount("PrecioUnitario", self.unit_price)
            .push_opt_amount("MontoTotal", self.total)
            .push_opt_amount("MontoDescuento", self.discount)
            .push_opt("NaturalezaDescuento", self.discount_reason.as_deref())
            .push_opt_amount("SubTotal", self.subtotal);
        for tax in &self.taxes {
            node.push(tax.build_fragment());
        }
        if let Some(exoneration) = &self.exoneration {
            node.push(exoneration.build_fragment());
        }
        node.push_opt_amount("MontoTotalLinea", self.net_total);
        node
    }
}

impl ToFragment for Reference {
    fn tag(&self) -> &str {
        "InformacionReferencia"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_opt("TipoDoc", self.document_type.as_deref())
            .push_opt("Numero", self.number.as_deref());
        if let Some(date) = &self.date {
            node.push_text("FechaEmision", format_timestamp(date));
        }
        node.push_opt("Codigo", self.code.as_deref())
            .push_opt("Razon", self.reason.as_deref());
        node
    }
}

impl ToFragment for Regulation {
    fn tag(&self) -> &str {
        "Normativa"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_opt("NumeroResolucion", self.number.as_deref())
            .push_opt("FechaResolucion", self.date.as_deref());
        node
    }
}

impl ToFragment for Summary {
    fn tag(&self) -> &str {
        "ResumenFactura"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::new(self.tag());
        node.push_opt("CodigoMoneda", self.currency.as_deref())
            .push_opt_amount("TipoCambio", self.exchange_rate)
            .push_amount("TotalServGravados", self.services_taxable_total)
            .push_amount("TotalServExentos", self.services_exempt_total)
            .push_amount("TotalMercanciasGravadas", self.goods_taxable_total)
            .push_amount("TotalMercanciasExentas", self.goods_exempt_total)
            .push_amount("TotalGravado", self.taxable_total)
            .push_amount("TotalExento", self.exempt_total)
            .push_amount("TotalVenta", self.sale_total)
            .push_amount("TotalDescuentos", self.discount_total)
            .push_amount("TotalVentaNeta", self.net_sale_total)
            .push_amount("TotalImpuesto", self.tax_total)
            .push_amount("TotalComprobante", self.voucher_total);
        node
    }
}

impl ToFragment for OtherText {
    fn tag(&self) -> &str {
        "OtroTexto"
    }

    fn build_fragment(&self) -> Node {
        let mut node = Node::leaf(self.tag(), self.content.clone());
        node.attributes = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    #[test]
    fn identification_fragment_round_trip() {
        let id = IdentificationDocument::new("02", "3101123456").unwrap();
        let node = id.to_fragment().unwrap();
        assert_eq!(node.child_names(), ["Tipo", "Numero"]);
        assert_eq!(node.text_of("Numero"), Some("3101123456"));
        assert_eq!(IdentificationDocument::from_node(&node).unwrap(), id);
    }

    #[test]
    fn invalid_entity_emits_nothing() {
        let id = IdentificationDocument::new("09", "1").unwrap();
        let err = id.to_fragment().unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.on("document_type").len(), 1);
    }

    #[test]
    fn from_node_rejects_other_elements() {
        assert!(IdentificationDocument::from_node(&Node::new("Emisor")).is_err());
        let mut node = Node::new("Identificacion");
        node.push_text("Tipo", "01");
        assert!(IdentificationDocument::from_node(&node).is_err());
    }

    #[test]
    fn item_fragment_order() {
        let date = DateTime::parse_from_rfc3339("2023-01-15T10:00:00-06:00").unwrap();
        let item = Item {
            line_number: Some(3),
            code: Some(ProductCode::new("01", "SKU-1")),
            quantity: Some(dec!(2.500)),
            unit: Some("kg".into()),
            commercial_unit: None,
            description: Some("Café".into()),
            unit_price: Some(dec!(4000)),
            total: Some(dec!(10000)),
            discount: Some(dec!(1000)),
            discount_reason: Some("Promoción".into()),
            subtotal: Some(dec!(9000)),
            taxes: vec![Tax::new("01", dec!(13), dec!(1170))],
            exoneration: Some(Exoneration::new(
                "03",
                "OC-77",
                "Ministerio de Salud",
                date,
                dec!(1170),
                dec!(100),
            )),
            net_total: Some(dec!(10170)),
        };

        let node = item.to_fragment().unwrap();
        assert_eq!(
            node.child_names(),
            [
                "NumeroLinea",
                "Codigo",
                "Cantidad",
                "UnidadMedida",
                "Detalle",
                "PrecioUnitario",
                "MontoTotal",
                "MontoDescuento",
                "NaturalezaDescuento",
                "SubTotal",
                "Impuesto",
                "Exoneracion",
                "MontoTotalLinea",
            ]
        );
        assert_eq!(node.text_of("Cantidad"), Some("2.5"));
        let exo = node.child("Exoneracion").unwrap();
        assert_eq!(exo.text_of("FechaEmision"), Some("2023-01-15T10:00:00-06:00"));
        assert_eq!(exo.text_of("PorcentajeCompra"), Some("100"));
    }

    #[test]
    fn fax_renders_under_fax_tag() {
        let issuer = Issuer {
            name: Some("Emisor".into()),
            identification: Some(IdentificationDocument::new("01", "112345678").unwrap()),
            commercial_name: None,
            location: Some(Location::new("1", "01", "01", "Centro")),
            phone: Some(Phone::new("506", "22223333")),
            fax: Some(Phone::new("506", "22224444")),
            email: Some("a@b.cr".into()),
        };
        let node = issuer.to_fragment().unwrap();
        assert_eq!(
            node.child_names(),
            ["Nombre", "Identificacion", "Ubicacion", "Telefono", "Fax", "CorreoElectronico"]
        );
        assert_eq!(node.child("Fax").unwrap().text_of("NumTelefono"), Some("22224444"));
    }

    #[test]
    fn other_text_keeps_attributes() {
        let text = OtherText::new("Gracias por su compra").attribute("codigo", "obs");
        let node = text.to_fragment().unwrap();
        assert_eq!(node.attributes, [("codigo".to_string(), "obs".to_string())]);
        assert_eq!(node.text.as_deref(), Some("Gracias por su compra"));
    }

    #[test]
    fn summary_emits_all_totals() {
        let node = Summary::default().to_fragment().unwrap();
        assert_eq!(node.children.len(), 11);
        assert_eq!(node.text_of("TotalComprobante"), Some("0.00"));
    }
}
