#![cfg(feature = "xml")]

use chrono::{DateTime, FixedOffset};
use facturacr::core::*;
use facturacr::xml;
use rust_decimal_macros::dec;

fn date(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn issuer() -> Issuer {
    IssuerBuilder::new(
        "Ferretería El Clavo S.A.",
        IdentificationDocument::new("02", "3101123456").unwrap(),
        Location::new("2", "01", "04", "Costado sur del mercado").neighborhood("03"),
        "ventas@elclavo.cr",
    )
    .phone("506", "24401122")
    .fax("506", "24401123")
    .build()
}

fn receiver() -> Receiver {
    ReceiverBuilder::new("María Rodríguez")
        .identification(IdentificationDocument::new("01", "114480790").unwrap())
        .email("maria@example.cr")
        .build()
}

fn items() -> Vec<Item> {
    vec![
        ItemBuilder::new(1, "Martillo de uña", dec!(2), "Unid", dec!(7500))
            .code("04", "MART-16")
            .discount(dec!(500), "Promoción")
            .tax(Tax::levied("01", dec!(13), dec!(14500)))
            .build(),
        ItemBuilder::new(2, "Instalación", dec!(1.5), "h", dec!(10000))
            .tax(Tax::levied("01", dec!(13), dec!(15000)))
            .exoneration(Exoneration::new(
                "03",
                "AL-00012345-19",
                "Ministerio de Hacienda",
                date("2023-01-15T08:00:00-06:00"),
                dec!(1950),
                dec!(100),
            ))
            .build(),
    ]
}

fn populate(mut builder: DocumentBuilder) -> DocumentBuilder {
    let items = items();
    builder = builder
        .issuer(issuer())
        .receiver(receiver())
        .condition("02")
        .credit_term("30 días")
        .payment_type("04")
        .situation("1")
        .security_code("90817263")
        .summary(Summary::from_items(&items))
        .regulation(Regulation::default());
    for item in items {
        builder = builder.add_item(item);
    }
    builder
}

fn invoice() -> DocumentBuilder {
    populate(DocumentBuilder::invoice(1207, date("2023-05-10T09:00:00-06:00")))
}

// --- Element order ---

#[test]
fn root_children_in_schema_order() {
    let tree = invoice()
        .add_other(OtherText::new("Orden de compra 5512").attribute("codigo", "OC"))
        .build()
        .to_tree()
        .unwrap();
    assert_eq!(tree.name, "FacturaElectronica");
    assert_eq!(
        tree.child_names(),
        [
            "Clave",
            "NumeroConsecutivo",
            "FechaEmision",
            "Emisor",
            "Receptor",
            "CondicionVenta",
            "PlazoCredito",
            "MedioPago",
            "DetalleServicio",
            "ResumenFactura",
            "Normativa",
            "Otros",
        ]
    );
}

#[test]
fn root_children_without_optionals() {
    let mut doc = invoice().condition("01").build();
    doc.receiver = None;
    let tree = doc.to_tree().unwrap();
    assert_eq!(
        tree.child_names(),
        [
            "Clave",
            "NumeroConsecutivo",
            "FechaEmision",
            "Emisor",
            "CondicionVenta",
            "MedioPago",
            "DetalleServicio",
            "ResumenFactura",
            "Normativa",
        ]
    );
}

#[test]
fn references_between_summary_and_regulation() {
    let reference = Reference::new(
        "01",
        "506100523000310112345600100001010000012071908172",
        date("2023-05-10T09:00:00-06:00"),
        "01",
        "Anulación total",
    );
    let note = populate(DocumentBuilder::credit_note(3, date("2023-05-12T11:00:00-06:00")))
        .add_reference(reference.clone())
        .add_reference(reference)
        .build();

    let tree = note.to_tree().unwrap();
    assert_eq!(tree.name, "NotaCreditoElectronica");
    let names = tree.child_names();
    let summary = names.iter().position(|n| *n == "ResumenFactura").unwrap();
    assert_eq!(names[summary + 1], "InformacionReferencia");
    assert_eq!(names[summary + 2], "InformacionReferencia");
    assert_eq!(names[summary + 3], "Normativa");
}

#[test]
fn party_fragments_in_order() {
    let tree = invoice().build().to_tree().unwrap();
    let emisor = tree.child("Emisor").unwrap();
    assert_eq!(
        emisor.child_names(),
        [
            "Nombre",
            "Identificacion",
            "Ubicacion",
            "Telefono",
            "Fax",
            "CorreoElectronico"
        ]
    );
    assert_eq!(
        emisor.child("Ubicacion").unwrap().child_names(),
        ["Provincia", "Canton", "Distrito", "Barrio", "OtrasSenas"]
    );
    let receptor = tree.child("Receptor").unwrap();
    assert_eq!(
        receptor.child_names(),
        ["Nombre", "Identificacion", "CorreoElectronico"]
    );
}

#[test]
fn line_items_in_order() {
    let tree = invoice().build().to_tree().unwrap();
    let lines: Vec<&Node> = tree
        .child("DetalleServicio")
        .unwrap()
        .children_named("LineaDetalle")
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0].child_names(),
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
            "MontoTotalLinea",
        ]
    );
    assert_eq!(lines[0].text_of("MontoTotal"), Some("15000.00"));
    assert_eq!(lines[0].text_of("SubTotal"), Some("14500.00"));
    assert_eq!(lines[0].text_of("MontoTotalLinea"), Some("16385.00"));
    assert_eq!(lines[1].text_of("Cantidad"), Some("1.5"));

    let names = lines[1].child_names();
    let tax = names.iter().position(|n| *n == "Impuesto").unwrap();
    assert_eq!(names[tax + 1], "Exoneracion");
    assert_eq!(names[tax + 2], "MontoTotalLinea");
    let exoneration = lines[1].child("Exoneracion").unwrap();
    assert_eq!(exoneration.child_names()[0], "TipoDocumento");
    assert_eq!(exoneration.text_of("TipoDocumento"), Some("03"));
    assert_eq!(exoneration.text_of("PorcentajeCompra"), Some("100"));
}

// --- Rendered XML ---

#[test]
fn xml_declaration_and_namespaces() {
    let xml = xml::to_xml(&invoice().build()).unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(
        r#"<FacturaElectronica xmlns="https://tribunet.hacienda.go.cr/docs/esquemas/2017/v4.2/facturaElectronica" xmlns:ds="http://www.w3.org/2000/09/xmldsig#" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    assert!(xml.trim_end().ends_with("</FacturaElectronica>"));
}

#[test]
fn custom_namespaces_verbatim() {
    let doc = invoice()
        .namespaces([("xmlns", "urn:prueba"), ("xmlns:ds", "urn:firma")])
        .build();
    let xml = xml::to_xml(&doc).unwrap();
    assert!(xml.contains(r#"<FacturaElectronica xmlns="urn:prueba" xmlns:ds="urn:firma">"#));
}

#[test]
fn timestamps_keep_offset() {
    let xml = xml::to_xml(&invoice().build()).unwrap();
    assert!(xml.contains("<FechaEmision>2023-05-10T09:00:00-06:00</FechaEmision>"));
    assert!(xml.contains("<FechaEmision>2023-01-15T08:00:00-06:00</FechaEmision>"));
}

#[test]
fn key_and_sequence_rendered() {
    let doc = invoice().build();
    let xml = xml::to_xml(&doc).unwrap();
    assert!(xml.contains(&format!("<Clave>{}</Clave>", doc.key().unwrap())));
    assert!(xml.contains("<NumeroConsecutivo>00100001010000001207</NumeroConsecutivo>"));
    assert!(xml.contains("<Numero>3101123456</Numero>"));
}

#[test]
fn rendering_is_byte_identical() {
    let doc = invoice().build();
    assert_eq!(xml::to_xml(&doc).unwrap(), xml::to_xml(&doc).unwrap());
}

#[test]
fn invalid_document_renders_nothing() {
    let doc = invoice().credit_term("").build();
    let err = xml::to_xml(&doc).unwrap_err();
    let violations = err.violations().unwrap();
    assert_eq!(violations.on("credit_term"), ["can't be blank"]);
}

#[test]
fn other_texts_after_regulation() {
    let doc = invoice()
        .add_other(OtherText::new("Entregar en bodega 2").attribute("codigo", "ENT"))
        .add_other(OtherText::new("Gracias por su compra"))
        .build();
    let xml = xml::to_xml(&doc).unwrap();
    let normativa = xml.find("</Normativa>").unwrap();
    let otros = xml.find("<Otros>").unwrap();
    assert!(normativa < otros);
    assert!(xml.contains(r#"<OtroTexto codigo="ENT">Entregar en bodega 2</OtroTexto>"#));
    assert!(xml.contains("<OtroTexto>Gracias por su compra</OtroTexto>"));
}

#[test]
fn malformed_attribute_name_is_an_error() {
    let doc = invoice()
        .add_other(OtherText::new("Nota").attribute("bad name", "1"))
        .build();
    assert!(doc.is_valid());
    assert!(matches!(xml::to_xml(&doc), Err(FacturaError::Xml(_))));
}

#[test]
fn summary_amounts_rendered() {
    let tree = invoice().build().to_tree().unwrap();
    let summary = tree.child("ResumenFactura").unwrap();
    assert_eq!(summary.child_names()[0], "TotalServGravados");
    assert_eq!(summary.text_of("TotalMercanciasGravadas"), Some("30000.00"));
    assert_eq!(summary.text_of("TotalDescuentos"), Some("500.00"));
    assert_eq!(summary.text_of("TotalComprobante"), Some("33335.00"));
    assert_eq!(summary.child_names().last(), Some(&"TotalComprobante"));
}

// --- Identification round trip ---

#[test]
fn identifications_round_trip() {
    let doc = invoice().build();
    let xml = xml::to_xml(&doc).unwrap();
    let ids = xml::read_identifications(&xml).unwrap();

    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0].party, "Emisor");
    assert_eq!(
        Some(&ids[0].identification),
        doc.issuer.as_ref().unwrap().identification.as_ref()
    );
    assert_eq!(ids[1].party, "Receptor");
    assert_eq!(ids[1].identification.document_type(), "01");
    assert_eq!(ids[1].identification.raw_number(), "114480790");
}

#[test]
fn fragment_round_trip_through_node() {
    let tree = invoice().build().to_tree().unwrap();
    let node = tree
        .child("Emisor")
        .and_then(|e| e.child("Identificacion"))
        .unwrap();
    let id = IdentificationDocument::from_node(node).unwrap();
    assert_eq!(id.document_type(), "02");
    assert_eq!(id.raw_number(), "3101123456");
    assert_eq!(id.number(), "003101123456");
}

#[test]
fn render_arbitrary_node() {
    let mut node = Node::new("Raiz");
    node.push_text("Hijo", "valor");
    let xml = xml::render(&node).unwrap();
    assert!(xml.contains("<Raiz>"));
    assert!(xml.contains("  <Hijo>valor</Hijo>"));
}
