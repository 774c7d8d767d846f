mod feed;
mod feed_error;
mod sigpc_xml;

pub use feed::fetch_feed;
pub use feed_error::PurchaseFeedError;
pub use sigpc_xml::parse_purchases;
