mod command;
mod fields;

pub use command::detect_command;
pub use fields::{parse_offer, OfferDraft, OfferField};
