//! GDAL metadata XML parsing
//!
//! GDAL writes dataset and band metadata into tag 42112 as a small XML
//! document:
//!
//! ```text
//! <GDALMetadata>
//!   <Item name="CLOUD_COVER">3.2</Item>
//!   <Item name="SCALE" sample="0" role="scale">0.01</Item>
//! </GDALMetadata>
//! ```
//!
//! Band-scoped items are keyed `NAME[sample]`.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::tiff::errors::{TiffError, TiffResult};

fn xml_error(e: impl std::fmt::Display) -> TiffError {
    TiffError::GenericError(format!("Invalid GDAL metadata XML: {}", e))
}

/// Parse the `<Item>` entries of a GDAL metadata document
pub fn parse_gdal_metadata(xml: &str) -> TiffResult<BTreeMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = BTreeMap::new();
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(element) if element.name().as_ref() == b"Item" => {
                current = Some((item_key(&element)?, String::new()));
            }
            Event::Empty(element) if element.name().as_ref() == b"Item" => {
                items.insert(item_key(&element)?, String::new());
            }
            Event::Text(text) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&text.unescape().map_err(xml_error)?);
                }
            }
            Event::End(element) if element.name().as_ref() == b"Item" => {
                if let Some((key, value)) = current.take() {
                    items.insert(key, value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

fn item_key(element: &BytesStart) -> TiffResult<String> {
    let mut name = None;
    let mut sample = None;

    for attribute in element.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        let value = attribute.unescape_value().map_err(xml_error)?.into_owned();
        match attribute.key.as_ref() {
            b"name" => name = Some(value),
            b"sample" => sample = Some(value),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| xml_error("Item without a name attribute"))?;
    Ok(match sample {
        Some(sample) => format!("{}[{}]", name, sample),
        None => name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_dataset_and_band_items() {
        let xml = r#"<GDALMetadata>
            <Item name="CLOUD_COVER">3.2</Item>
            <Item name="SCALE" sample="0" role="scale">0.01</Item>
            <Item name="EMPTY"/>
            <Item name="NOTE">a &amp; b</Item>
        </GDALMetadata>"#;

        let items = parse_gdal_metadata(xml).unwrap();
        assert_eq!(items["CLOUD_COVER"], "3.2");
        assert_eq!(items["SCALE[0]"], "0.01");
        assert_eq!(items["EMPTY"], "");
        assert_eq!(items["NOTE"], "a & b");
    }

    #[test]
    fn unnamed_item_is_an_error() {
        assert!(parse_gdal_metadata("<GDALMetadata><Item>1</Item></GDALMetadata>").is_err());
    }
}
