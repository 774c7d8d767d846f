use super::{OfferManager, StatusOutcome};
use crate::domain::Transition;
use crate::errors::StoreError;
use crate::parsing::detect_command;
use tracing::{debug, info, warn};

impl OfferManager<'_> {
    /// Status-update flow for a comment left on offer `offer_id`.
    ///
    /// Once a command is recognized the offers collection is always written
    /// back, changed or not.
    pub fn apply_comment(
        &self,
        offer_id: &str,
        comment: &str,
    ) -> Result<StatusOutcome, StoreError> {
        let Some(command) = detect_command(comment) else {
            debug!("No lifecycle command in comment on offer {offer_id}");
            return Ok(StatusOutcome::NoCommand);
        };
        let requested = command.target;
        let today = self.now().date_naive();

        self.store.with_offers(|offers| -> Result<StatusOutcome, StoreError> {
            let Some(offer) = offers.iter_mut().find(|o| o.offer_id == offer_id) else {
                warn!("Offer {offer_id} not found; cannot mark it {requested}");
                return Ok(StatusOutcome::NotFound { requested });
            };

            match offer.advance_to(requested, command.actor.as_deref()) {
                Transition::Unchanged => {
                    info!("Offer {offer_id} is already {requested}; no change");
                    Ok(StatusOutcome::Unchanged { status: requested })
                }
                Transition::Refused { current } => {
                    warn!("Offer {offer_id} is {current}; refusing to move it back to {requested}");
                    Ok(StatusOutcome::Refused { current, requested })
                }
                Transition::Advanced { from } => {
                    info!("Offer {offer_id}: {from} -> {requested}");

                    let history_appended = requested.is_terminal();
                    if history_appended {
                        self.store.history().append(&offer.history_record(today))?;
                        info!(
                            "Offer {offer_id} logged to {}",
                            self.store.history().path().display()
                        );
                    }

                    Ok(StatusOutcome::Advanced {
                        from,
                        offer: offer.clone(),
                        history_appended,
                    })
                }
            }
        })
    }
}
