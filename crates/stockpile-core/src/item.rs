//! Item records: the versioned state of one SKU.
//!
//! An [`ItemRecord`] is mutated in place by the store under per-SKU exclusion.
//! Every mutation method here is all-or-nothing: it validates first, then
//! applies and bumps `version`. A failed mutation leaves the record untouched.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::sku::Sku;

/// Validate a price value: non-negative and finite.
fn check_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::InvalidPrice(price));
    }
    Ok(price)
}

/// The input to `add`: an item as described by the caller, before it has an
/// identity in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub sku: Sku,
    pub price: f64,
    pub quantity: u32,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl NewItem {
    /// Describe a new item with stock levels only.
    pub fn new(sku: Sku, price: f64, quantity: u32) -> Self {
        Self {
            sku,
            price,
            quantity,
            name: None,
            description: None,
        }
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The versioned state of one SKU.
///
/// `version` starts at 1 on creation and increases by exactly one per applied
/// mutation. It orders change events and detects staleness; it is never
/// observed to move backward by any watcher. Removing and re-adding a SKU
/// creates a fresh record with `version` back at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub sku: Sku,
    pub price: f64,
    pub quantity: u32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: u64,
}

impl ItemRecord {
    /// Create the version-1 record for a new item.
    pub fn create(item: NewItem) -> Result<Self> {
        let price = check_price(item.price)?;
        Ok(Self {
            sku: item.sku,
            price,
            quantity: item.quantity,
            name: item.name,
            description: item.description,
            version: 1,
        })
    }

    /// `quantity += delta`.
    ///
    /// Zero deltas are accepted and still count as a mutation. Overflow is
    /// rejected, not wrapped or saturated.
    pub fn increase_quantity(&mut self, delta: u32) -> Result<()> {
        let quantity =
            self.quantity
                .checked_add(delta)
                .ok_or(CoreError::QuantityOverflow {
                    current: self.quantity,
                    delta,
                })?;
        self.quantity = quantity;
        self.bump();
        Ok(())
    }

    /// `quantity -= delta`, rejected when `delta` exceeds the current
    /// quantity. No partial application, no clamping to zero.
    pub fn decrease_quantity(&mut self, delta: u32) -> Result<()> {
        if delta > self.quantity {
            return Err(CoreError::InsufficientStock {
                requested: delta,
                available: self.quantity,
            });
        }
        self.quantity -= delta;
        self.bump();
        Ok(())
    }

    /// Replace the price.
    pub fn update_price(&mut self, price: f64) -> Result<()> {
        self.price = check_price(price)?;
        self.bump();
        Ok(())
    }

    /// Partial update of the descriptive fields.
    ///
    /// `None` leaves the existing value untouched; there is no way to clear a
    /// field through this operation.
    pub fn update_information(&mut self, name: Option<String>, description: Option<String>) {
        if let Some(name) = name {
            self.name = Some(name);
        }
        if let Some(description) = description {
            self.description = Some(description);
        }
        self.bump();
    }

    /// Bump the version counter for an applied mutation.
    ///
    /// Also used by the store when it synthesizes the terminal `Removed`
    /// event, so that event orders strictly after the last update.
    pub fn bump(&mut self) {
        self.version += 1;
    }
}
