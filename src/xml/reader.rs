use quick_xml::Reader;
use quick_xml::events::Event;

use crate::core::{FacturaError, IdentificationDocument};

/// An identification recovered from a serialized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentification {
    /// Enclosing party element, `Emisor` or `Receptor`.
    pub party: String,
    pub identification: IdentificationDocument,
}

/// Pull every `Identificacion` under `Emisor` or `Receptor` out of `xml`,
/// in document order.
///
/// The recovered identifications go through the same constructor as
/// caller-built ones, so a number longer than 12 digits is rejected.
pub fn read_identifications(xml: &str) -> Result<Vec<ParsedIdentification>, FacturaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut found = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut tipo: Option<String> = None;
    let mut numero: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "Identificacion" {
                    tipo = None;
                    numero = None;
                }
                path.push(name);
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| FacturaError::Xml(format!("XML parse error: {e}")))?;
                if in_identification_leaf(&path) {
                    match path.last().map(String::as_str) {
                        Some("Tipo") => tipo = Some(text.into_owned()),
                        Some("Numero") => numero = Some(text.into_owned()),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(_)) => {
                let ended = path.pop().unwrap_or_default();
                if ended == "Identificacion" && path.last().is_some_and(|p| is_party(p)) {
                    let party = path.last().cloned().unwrap_or_default();
                    let (Some(t), Some(n)) = (tipo.take(), numero.take()) else {
                        return Err(FacturaError::Xml(format!(
                            "{party}/Identificacion requires Tipo and Numero"
                        )));
                    };
                    tracing::debug!(party = %party, tipo = %t, "read identification");
                    found.push(ParsedIdentification {
                        party,
                        identification: IdentificationDocument::new(t, n)?,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FacturaError::Xml(format!("XML parse error: {e}")));
            }
            _ => {}
        }
    }

    Ok(found)
}

fn is_party(name: &str) -> bool {
    matches!(name, "Emisor" | "Receptor")
}

/// A leaf directly under `Emisor/Identificacion` or `Receptor/Identificacion` is open.
fn in_identification_leaf(path: &[String]) -> bool {
    match path {
        [.., party, id, _] => is_party(party) && id == "Identificacion",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_issuer_and_receiver() {
        let xml = r#"<FacturaElectronica xmlns="urn:x">
            <Emisor><Nombre>A</Nombre><Identificacion><Tipo>02</Tipo><Numero>3101123456</Numero></Identificacion></Emisor>
            <Receptor><Identificacion><Tipo>01</Tipo><Numero>114480790</Numero></Identificacion></Receptor>
        </FacturaElectronica>"#;
        let ids = read_identifications(xml).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].party, "Emisor");
        assert_eq!(ids[0].identification.number(), "003101123456");
        assert_eq!(ids[1].party, "Receptor");
        assert_eq!(ids[1].identification.raw_number(), "114480790");
    }

    #[test]
    fn ignores_identification_outside_parties() {
        let xml = "<Raiz><Identificacion><Tipo>01</Tipo><Numero>1</Numero></Identificacion></Raiz>";
        assert!(read_identifications(xml).unwrap().is_empty());
    }

    #[test]
    fn rejects_oversized_number() {
        let xml = "<Emisor><Identificacion><Tipo>01</Tipo><Numero>1234567890123</Numero></Identificacion></Emisor>";
        assert!(matches!(
            read_identifications(xml),
            Err(FacturaError::Builder(_))
        ));
    }

    #[test]
    fn incomplete_identification_is_an_error() {
        let xml = "<Emisor><Identificacion><Tipo>01</Tipo></Identificacion></Emisor>";
        assert!(matches!(read_identifications(xml), Err(FacturaError::Xml(_))));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(read_identifications("<Emisor><Identificacion></Emisor>").is_err());
    }
}
