// replies.rs
//
// Markdown bodies a caller posts back on the originating issue.

use crate::domain::{Offer, OfferStatus};
use crate::lifecycle::{PublishOutcome, StatusOutcome};
use std::fmt::Write;

pub fn render_publish_reply(outcome: &PublishOutcome) -> String {
    match outcome {
        PublishOutcome::Created(offer) => render_offer_reply(offer),
        PublishOutcome::Incomplete { missing } => {
            let names: Vec<String> = missing.iter().map(|f| format!("`{f}`")).collect();
            format!(
                "Could not publish this offer: missing {}.\n\nPlease edit the issue using `key: value` lines.",
                names.join(", ")
            )
        }
        PublishOutcome::AlreadyPublished(offer) => format!(
            "Offer {} was already published and is currently **{}**.",
            offer.offer_id, offer.status
        ),
    }
}

/// Summary of a freshly published offer with its nearest entities.
pub fn render_offer_reply(offer: &Offer) -> String {
    let mut out = String::new();

    let school = if offer.school_name.is_empty() {
        offer.school_code.clone()
    } else {
        format!("{} ({})", offer.school_name, offer.school_code)
    };

    // writing into a String cannot fail
    let _ = writeln!(out, "### Offer {} is available", offer.offer_id);
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Item:** {}", offer.item);
    let _ = writeln!(out, "- **Quantity:** {}", offer.quantity);
    let _ = writeln!(out, "- **Expiry:** {}", offer.expiry);
    let _ = writeln!(out, "- **School:** {school}");
    if let Some(notes) = &offer.notes {
        let _ = writeln!(out, "- **Notes:** {notes}");
    }
    let _ = writeln!(out);

    if offer.recommendations.is_empty() {
        let _ = writeln!(
            out,
            "No nearby receiving entities could be located for this offer."
        );
    } else {
        let _ = writeln!(out, "Nearest receiving entities:");
        let _ = writeln!(out);
        for (i, rec) in offer.recommendations.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} ({:.2} km) - {}",
                i + 1,
                rec.entity_name,
                rec.distance_km,
                rec.address
            );
        }
    }

    let _ = writeln!(out);
    let _ = write!(out, "Comment `/reserve` to reserve it, then `/collect` once picked up.");
    out
}

/// Reply for a status comment; `None` when the comment held no command.
pub fn render_status_reply(offer_id: &str, outcome: &StatusOutcome) -> Option<String> {
    let text = match outcome {
        StatusOutcome::NoCommand => return None,
        StatusOutcome::NotFound { requested } => format!(
            "Offer {offer_id} was not found, so it could not be marked **{requested}**."
        ),
        StatusOutcome::Unchanged { status } => {
            format!("Offer {offer_id} is already **{status}**.")
        }
        StatusOutcome::Refused { current, requested } => format!(
            "Offer {offer_id} is **{current}** and cannot go back to **{requested}**."
        ),
        StatusOutcome::Advanced { offer, .. } => {
            let by = match offer.status {
                OfferStatus::Reserved => offer.reserved_by.as_deref(),
                OfferStatus::Collected => offer.collected_by.as_deref(),
                OfferStatus::Available => None,
            };
            match by {
                Some(actor) => format!("Offer {offer_id} is now **{}** by {actor}.", offer.status),
                None => format!("Offer {offer_id} is now **{}**.", offer.status),
            }
        }
    };
    Some(text)
}
