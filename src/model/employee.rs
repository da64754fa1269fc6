use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Alice Rahman",
        "device_id_num": "7"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    /// Auto-created employees take the name stored in the device's user registry.
    #[schema(example = "Alice Rahman")]
    pub name: String,

    /// Identifier assigned by the biometric device. Unique across all
    /// employees when present.
    #[schema(example = "7", nullable = true)]
    pub device_id_num: Option<String>,
}
