// src/parsing/fields.rs

use std::collections::BTreeMap;
use std::fmt;

/// Raw `key: value` pairs, keys and values trimmed.
pub type FieldMap = BTreeMap<String, String>;

/// Scan `text` line by line for `key: value` pairs.
///
/// Splits at the first colon, so values may contain colons themselves.
/// Lines without a colon, or with an empty key, are skipped. A repeated
/// key keeps its last value.
pub fn extract_fields(text: &str) -> FieldMap {
    field_lines(text)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// `key: value` pairs in line order, before any deduplication.
pub(crate) fn field_lines(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.lines().filter_map(|line| {
        let (key, value) = line.split_once(':')?;
        let key = key.trim();
        (!key.is_empty()).then(|| (key, value.trim()))
    })
}

/// Offer attributes recognized in an issue body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OfferField {
    SchoolCode,
    Item,
    Quantity,
    Expiry,
    Notes,
}

impl OfferField {
    pub const REQUIRED: [OfferField; 4] = [
        OfferField::SchoolCode,
        OfferField::Item,
        OfferField::Quantity,
        OfferField::Expiry,
    ];

    const ALL: [OfferField; 5] = [
        OfferField::SchoolCode,
        OfferField::Item,
        OfferField::Quantity,
        OfferField::Expiry,
        OfferField::Notes,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            OfferField::SchoolCode => "school_code",
            OfferField::Item => "item",
            OfferField::Quantity => "quantity",
            OfferField::Expiry => "expiry",
            OfferField::Notes => "notes",
        }
    }

    /// Accepted spellings, canonical first. The Portuguese names come from
    /// the issue template schools already use.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            OfferField::SchoolCode => &["school_code", "escola_codinep", "school"],
            OfferField::Item => &["item"],
            OfferField::Quantity => &["quantity", "quantidade"],
            OfferField::Expiry => &["expiry", "validade", "expiry_date"],
            OfferField::Notes => &["notes", "observacoes"],
        }
    }

    fn from_key(raw: &str) -> Option<OfferField> {
        let key = normalize_key(raw);
        Self::ALL
            .into_iter()
            .find(|field| field.aliases().contains(&key.as_str()))
    }
}

impl fmt::Display for OfferField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lowercase, drop markdown bullets/bold, spaces to underscores.
fn normalize_key(raw: &str) -> String {
    raw.trim_matches(|c: char| c == '-' || c == '*' || c == '#' || c.is_whitespace())
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Everything needed to create an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferDraft {
    pub school_code: String,
    pub item: String,
    pub quantity: String,
    pub expiry: String,
    pub notes: Option<String>,
}

/// Typed outcome of parsing an offer submission.
#[derive(Debug, Clone, Default)]
pub struct OfferParse {
    /// Raw extraction from the body.
    pub fields: FieldMap,
    values: BTreeMap<OfferField, String>,
    /// Required fields still absent after the title fallback.
    pub missing: Vec<OfferField>,
    /// Fields filled in from the title rather than the body.
    pub inferred: Vec<OfferField>,
}

impl OfferParse {
    pub fn get(&self, field: OfferField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn draft(&self) -> Option<OfferDraft> {
        if !self.is_complete() {
            return None;
        }
        let take = |field| self.get(field).map(str::to_string);

        Some(OfferDraft {
            school_code: take(OfferField::SchoolCode)?,
            item: take(OfferField::Item)?,
            quantity: take(OfferField::Quantity)?,
            expiry: take(OfferField::Expiry)?,
            notes: take(OfferField::Notes),
        })
    }
}

/// Parse an offer from an issue `body`, falling back to the `title` for a
/// missing item or school code.
pub fn parse_offer(title: &str, body: &str) -> OfferParse {
    let fields = extract_fields(body);

    // Walk the lines, not `fields`: two spellings of one field resolve by
    // position, the later line winning.
    let mut values = BTreeMap::new();
    for (key, value) in field_lines(body) {
        let Some(field) = OfferField::from_key(key) else {
            continue;
        };
        if value.is_empty() {
            values.remove(&field);
        } else {
            values.insert(field, value.to_string());
        }
    }

    let mut inferred = Vec::new();
    let segments = title_segments(title);

    if !values.contains_key(&OfferField::SchoolCode) {
        if let Some(code) = segments.iter().find(|s| is_numeric_code(s)) {
            values.insert(OfferField::SchoolCode, code.to_string());
            inferred.push(OfferField::SchoolCode);
        }
    }

    if !values.contains_key(&OfferField::Item) {
        let school_code = values.get(&OfferField::SchoolCode).cloned();
        let item = segments
            .iter()
            .find(|s| !is_numeric_code(s) && Some(s.to_string()) != school_code);
        if let Some(item) = item {
            values.insert(OfferField::Item, item.to_string());
            inferred.push(OfferField::Item);
        }
    }

    let missing = OfferField::REQUIRED
        .into_iter()
        .filter(|f| !values.contains_key(f))
        .collect();

    OfferParse {
        fields,
        values,
        missing,
        inferred,
    }
}

/// "Doação: Arroz - 35000012" -> ["Arroz", "35000012"]
fn title_segments(title: &str) -> Vec<&str> {
    title
        .split(['-', '|'])
        .map(|segment| match segment.split_once(':') {
            Some((_, rest)) => rest.trim(),
            None => segment.trim(),
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_numeric_code(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
