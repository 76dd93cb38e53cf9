use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field on a listing naming the donor who posted it.
pub const DONATOR_EMAIL: &str = "donatorEmail";
/// Field on a request naming the user who asked for the food.
pub const REQUESTER_EMAIL: &str = "requesterEmail";

/// The caller as carried inside an access token.
///
/// Only `email` is interpreted; anything else the client sent at login is
/// kept and signed back into the token untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Fields a donor may change on their own listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate {
    pub food_name: Option<Value>,
    pub food_image: Option<Value>,
    pub pickup_location: Option<Value>,
    pub expired_date: Option<Value>,
    pub additional_notes: Option<Value>,
}

impl ListingUpdate {
    /// Pairs of (stored field name, new value) for every field present.
    pub fn fields(self) -> Vec<(&'static str, Value)> {
        [
            ("foodName", self.food_name),
            ("foodImage", self.food_image),
            ("pickupLocation", self.pickup_location),
            ("expiredDate", self.expired_date),
            ("additionalNotes", self.additional_notes),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub food_status: Option<Value>,
}

impl StatusUpdate {
    pub fn fields(self) -> Vec<(&'static str, Value)> {
        self.food_status
            .map(|v| vec![("foodStatus", v)])
            .unwrap_or_default()
    }
}
