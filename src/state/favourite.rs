//! Optimistic favourite toggle of a product card.

use crate::domain::mutation::MutationOutcome;
use crate::domain::types::VariationCode;
use crate::state::notification::{GENERIC_FAILURE, Notification};

/// Message shown when an anonymous visitor tries to save a product.
pub const SIGN_IN_TO_SAVE: &str = "Sign in to save";

/// Request produced by [`FavouriteToggle::toggle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FavouriteRequest {
    pub variation_code: VariationCode,
}

#[derive(Debug)]
pub struct FavouriteToggle {
    variation_code: VariationCode,
    is_favourite: bool,
    in_flight: usize,
}

impl FavouriteToggle {
    pub fn new(variation_code: VariationCode, is_favourite: bool) -> Self {
        Self {
            variation_code,
            is_favourite,
            in_flight: 0,
        }
    }

    /// Flag confirmed by the backend.
    pub fn is_favourite(&self) -> bool {
        self.is_favourite
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    /// What the heart icon shows: each unsettled toggle inverts the
    /// confirmed flag once.
    pub fn displayed(&self) -> bool {
        self.is_favourite ^ (self.in_flight % 2 == 1)
    }

    /// Starts a toggle. Anonymous visitors get a warning and no request.
    pub fn toggle(&mut self, authenticated: bool) -> Result<FavouriteRequest, Notification> {
        if !authenticated {
            return Err(Notification::warning(SIGN_IN_TO_SAVE));
        }
        self.in_flight += 1;
        Ok(FavouriteRequest {
            variation_code: self.variation_code.clone(),
        })
    }

    /// Flips the confirmed flag on success; on failure the display falls
    /// back to it and an error notification is returned.
    pub fn settle(&mut self, outcome: &MutationOutcome) -> Option<Notification> {
        self.in_flight = self.in_flight.saturating_sub(1);
        if outcome.success {
            self.is_favourite = !self.is_favourite;
            return None;
        }
        log::error!(
            "Favourite toggle failed for {}: {:?}",
            self.variation_code,
            outcome.error_msg
        );
        Some(Notification::error(
            outcome
                .error_msg
                .clone()
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        ))
    }
}
