// sigpc_xml.rs
use crate::domain::PurchaseLot;
use crate::purchases::PurchaseFeedError;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

/// Row element; matched at any depth.
const ROW_TAG: &[u8] = b"compra";

#[derive(Debug, Clone, Copy)]
enum Column {
    Description,
    PurchaseDate,
    Quantity,
}

impl Column {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"descricao" => Some(Column::Description),
            b"data_compra" => Some(Column::PurchaseDate),
            b"quantidade" => Some(Column::Quantity),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct RawRow {
    description: String,
    purchase_date: String,
    quantity: String,
}

impl RawRow {
    fn push(&mut self, column: Column, text: &str) {
        let slot = match column {
            Column::Description => &mut self.description,
            Column::PurchaseDate => &mut self.purchase_date,
            Column::Quantity => &mut self.quantity,
        };
        slot.push_str(text);
    }

    fn into_lot(self) -> Option<PurchaseLot> {
        let item = self.description.trim();
        if item.is_empty() {
            warn!("Skipping purchase row without a description");
            return None;
        }

        let quantity: f64 = match self.quantity.trim().parse() {
            Ok(q) => q,
            Err(_) => {
                warn!("Skipping '{item}': unreadable quantity '{}'", self.quantity);
                return None;
            }
        };
        if quantity == 0.0 {
            debug!("Skipping '{item}': zero quantity");
            return None;
        }

        let date = self.purchase_date.trim();
        Some(PurchaseLot {
            item: item.to_string(),
            purchase_date: (!date.is_empty()).then(|| date.to_string()),
            quantity,
        })
    }
}

/// Pull every `<compra>` row with a non-zero quantity out of a SIGPC export.
pub fn parse_purchases(xml: &str) -> Result<Vec<PurchaseLot>, PurchaseFeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut lots = Vec::new();
    let mut row: Option<RawRow> = None;
    let mut column: Option<Column> = None;

    loop {
        match reader.read_event()? {
            Event::Start(tag) => {
                let name = tag.local_name();
                if name.as_ref() == ROW_TAG {
                    row = Some(RawRow::default());
                    column = None;
                } else if row.is_some() {
                    column = Column::from_tag(name.as_ref());
                }
            }
            Event::Text(text) => {
                if let (Some(row), Some(column)) = (row.as_mut(), column) {
                    row.push(column, &text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let (Some(row), Some(column)) = (row.as_mut(), column) {
                    row.push(column, &String::from_utf8_lossy(&data));
                }
            }
            Event::End(tag) => {
                if tag.local_name().as_ref() == ROW_TAG {
                    lots.extend(row.take().and_then(RawRow::into_lot));
                }
                column = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lots)
}
