//! Detail-page extractor
//!
//! Pure functions over a fetched detail document. The image-presence gates
//! run first: a "no image" placeholder or a missing primary image anchor
//! excludes the entry before any field extraction happens, so a [`Record`]
//! is only ever constructed with a resolvable image URL.

use crate::record::Record;
use scraper::{Html, Selector};
use std::collections::HashMap;

/// Outcome of extracting a detail page
#[derive(Debug)]
pub enum Extraction {
    /// The entry qualifies; all present fields were extracted
    Record(Record),

    /// The entry has no retrievable primary image and produces no record
    Excluded,
}

/// Fallback when the detail page carries no name element
const NAME_FALLBACK: &str = "Name not found";

/// Extracts a record from a detail-page document
///
/// Gating order:
/// 1. A `.photo-main .no_person_image` placeholder excludes the entry.
/// 2. A missing or unresolvable primary image anchor excludes the entry.
///
/// Only then are the name and the attribute table read. Absent attribute
/// labels yield absent fields, never an error.
pub fn extract_record(html: &str) -> Extraction {
    let document = Html::parse_document(html);

    // Gate: explicit "no image" placeholder
    if let Ok(no_image_sel) = Selector::parse(".photo-main .no_person_image") {
        if document.select(&no_image_sel).next().is_some() {
            return Extraction::Excluded;
        }
    }

    // Gate: primary image anchor with a resolvable reference
    let image_url = match primary_image_url(&document) {
        Some(url) => url,
        None => return Extraction::Excluded,
    };

    let name = person_name(&document).unwrap_or_else(|| NAME_FALLBACK.to_string());

    let mut attributes = attribute_table(&document);

    Extraction::Record(Record {
        image_url,
        name,
        birth_date: attributes.remove("Birth Date:"),
        death_date: attributes.remove("Death date:"),
        maiden_name: attributes.remove("Person's maiden name:"),
        extra_names: attributes.remove("Extra names:"),
        patronymic: attributes.remove("Patronymic:"),
        nationality: attributes.remove("Nationality:"),
        cemetery_info: attributes.remove("Cemetery:"),
    })
}

/// Resolves the primary image anchor's href to an absolute URL
///
/// The site serves scheme-relative hrefs (`//media.../img.jpg`); those get an
/// `https:` scheme. Absolute hrefs pass through unchanged.
fn primary_image_url(document: &Html) -> Option<String> {
    let anchor_sel = Selector::parse(".person-header-images .photo-main a").ok()?;
    let href = document
        .select(&anchor_sel)
        .next()
        .and_then(|a| a.value().attr("href"))?;

    if href.starts_with("//") {
        Some(format!("https:{}", href))
    } else {
        Some(href.to_string())
    }
}

/// Extracts the person name from the direct text of the name element
///
/// Nested markup (such as directional arrow spans) is excluded; only text
/// nodes that are immediate children of the element contribute.
fn person_name(document: &Html) -> Option<String> {
    let name_sel = Selector::parse("span.person-name").ok()?;
    let element = document.select(&name_sel).next()?;

    let name = element
        .children()
        .filter_map(|child| child.value().as_text().map(|text| &**text))
        .collect::<String>()
        .trim()
        .to_string();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Reads the label/value attribute table into a map
fn attribute_table(document: &Html) -> HashMap<String, String> {
    let mut attributes = HashMap::new();

    if let (Ok(dt_sel), Ok(dd_sel)) = (
        Selector::parse(".attributes dt"),
        Selector::parse(".attributes dd"),
    ) {
        for (dt, dd) in document.select(&dt_sel).zip(document.select(&dd_sel)) {
            let label = dt.text().collect::<String>().trim().to_string();
            let value = dd.text().collect::<String>().trim().to_string();
            attributes.insert(label, value);
        }
    }

    attributes
}
