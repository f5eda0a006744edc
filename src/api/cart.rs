//! Wire shape of the cart write API's add-item request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{CombinationId, OptionId};

/// Request body emitted to the cart endpoint. For single-axis products the
/// legacy `variationId` field is populated instead of `variantCombinationId`,
/// preserving compatibility with catalog entries that predate the combination
/// model; both fields are omitted for products without axes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_combination_id: Option<CombinationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<OptionId>,
}
