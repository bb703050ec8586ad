//! Proptest generators for property-based testing.

use proptest::prelude::*;

use stockpile_core::{NewItem, Sku};

/// Generate a valid SKU.
pub fn sku() -> impl Strategy<Value = Sku> {
    "[A-Z][A-Z0-9-]{0,15}".prop_map(|s| Sku::new(s).unwrap())
}

/// Generate a non-negative, finite price.
pub fn price() -> impl Strategy<Value = f64> {
    (0u64..=10_000_00).prop_map(|cents| cents as f64 / 100.0)
}

/// Generate a starting quantity small enough that runs of deltas cannot
/// overflow.
pub fn quantity() -> impl Strategy<Value = u32> {
    0u32..=10_000
}

/// Generate an optional short text field.
pub fn text_field() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z ]{1,40}".prop_map(String::from))
}

/// Generate a new-item request with random stock and information.
pub fn new_item() -> impl Strategy<Value = NewItem> {
    (sku(), price(), quantity(), text_field(), text_field()).prop_map(
        |(sku, price, quantity, name, description)| {
            let mut item = NewItem::new(sku, price, quantity);
            if let Some(name) = name {
                item = item.with_name(name);
            }
            if let Some(description) = description {
                item = item.with_description(description);
            }
            item
        },
    )
}

/// A single stock operation against one item.
#[derive(Debug, Clone, PartialEq)]
pub enum StockOp {
    Increase(u32),
    Decrease(u32),
    SetPrice(f64),
}

/// Generate one stock operation with bounded deltas.
pub fn stock_op() -> impl Strategy<Value = StockOp> {
    prop_oneof![
        (0u32..=100).prop_map(StockOp::Increase),
        (0u32..=100).prop_map(StockOp::Decrease),
        price().prop_map(StockOp::SetPrice),
    ]
}

/// Generate a sequence of stock operations.
pub fn op_sequence(max_len: usize) -> impl Strategy<Value = Vec<StockOp>> {
    prop::collection::vec(stock_op(), 0..=max_len)
}
