//! Wire-shaped message types.
//!
//! These mirror the inventory schema's request/response pairs field for
//! field, so an RPC adapter maps them 1:1 onto the wire without touching the
//! core. Validation happens on conversion into core types, not here.

use serde::{Deserialize, Serialize};

use stockpile_core::{CoreError, ItemRecord, NewItem, Sku};

/// Identifies one item. Every identifier-taking call requires a non-empty
/// SKU and fails with `InvalidArgument` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemIdentifier {
    pub sku: String,
}

impl ItemIdentifier {
    pub fn new(sku: impl Into<String>) -> Self {
        Self { sku: sku.into() }
    }

    /// Validate into a core SKU.
    pub fn to_sku(&self) -> Result<Sku, CoreError> {
        Sku::new(self.sku.as_str())
    }
}

/// Stock levels for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStock {
    pub price: f64,
    pub quantity: u32,
}

/// Optional descriptive fields. Unset fields mean "leave untouched" on
/// update and "not provided" on add.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInformation {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A full item as it crosses the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub identifier: ItemIdentifier,
    pub stock: ItemStock,
    pub information: Option<ItemInformation>,
}

impl TryFrom<Item> for NewItem {
    type Error = CoreError;

    fn try_from(item: Item) -> Result<Self, Self::Error> {
        let sku = item.identifier.to_sku()?;
        let information = item.information.unwrap_or_default();
        Ok(NewItem {
            sku,
            price: item.stock.price,
            quantity: item.stock.quantity,
            name: information.name,
            description: information.description,
        })
    }
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let information = if record.name.is_some() || record.description.is_some() {
            Some(ItemInformation {
                name: record.name,
                description: record.description,
            })
        } else {
            None
        };
        Self {
            identifier: ItemIdentifier {
                sku: record.sku.into(),
            },
            stock: ItemStock {
                price: record.price,
                quantity: record.quantity,
            },
            information,
        }
    }
}

/// Request to change an item's quantity by a delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChangeRequest {
    pub sku: String,
    pub quantity: u32,
}

/// Request to replace an item's price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChangeRequest {
    pub sku: String,
    pub price: f64,
}

/// Request to update an item's descriptive fields. `None` fields are left
/// untouched, not cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInformationRequest {
    pub sku: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Outcome of a structural change (`add`, `remove`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryChangeResponse {
    /// Short human-readable outcome.
    pub status: String,
}

/// Outcome of a numeric mutation, echoing the authoritative post-mutation
/// state so callers never need a second read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUpdateResponse {
    pub status: String,
    pub price: f64,
    pub quantity: u32,
}

/// The full current snapshot set.
///
/// On the wire, `items` is field number 2: field 1 held a removed legacy
/// field and its number stays reserved for compatibility. Codec adapters
/// must preserve that numbering; it carries no further meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Items {
    pub items: Vec<Item>,
}
