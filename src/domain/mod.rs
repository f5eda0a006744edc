//! Domain model: catalog entities, selection state and the resolution engine.

pub mod catalog;
pub mod events;
pub mod resolve;
pub mod selection;
pub mod value_objects;

pub use catalog::{
    AxisId, CombinationId, CombinationIndex, OptionId, Product, ProductImage, ProductStatus,
    VariantCombination, VariationAxis, VariationOption,
};
pub use events::StorefrontEvent;
pub use resolve::{resolve, ResolvedVariant};
pub use selection::{SelectOutcome, SelectionState};
pub use value_objects::{Money, MoneyError, Quantity};
