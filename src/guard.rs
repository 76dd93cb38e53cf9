//! Ownership checks binding the caller's identity to the documents a query
//! may touch.

use mongodb::bson::{doc, Document};

use crate::errors::ApiError;
use crate::models::Identity;
use crate::store::parse_object_id;

/// Builds the list filter for an endpoint scoped by `owner_field`.
///
/// A requested email that differs from the caller's is refused. With no
/// email the query is scoped to the caller, so the result is never an
/// unscoped filter.
pub fn owner_filter(
    identity: &Identity,
    requested: Option<&str>,
    owner_field: &str,
) -> Result<Document, ApiError> {
    match requested {
        Some(email) if email != identity.email => Err(ApiError::Forbidden),
        _ => {
            let mut filter = Document::new();
            filter.insert(owner_field, identity.email.as_str());
            Ok(filter)
        }
    }
}

/// Filter for a single document by its id.
pub fn by_id(id: &str) -> Result<Document, ApiError> {
    let oid = parse_object_id(id).ok_or_else(|| ApiError::InvalidId(id.to_string()))?;
    Ok(doc! { "_id": oid })
}

/// Filter for a single document by id that the caller owns through
/// `owner_field`.
pub fn owned_by_id(id: &str, identity: &Identity, owner_field: &str) -> Result<Document, ApiError> {
    let mut filter = by_id(id)?;
    filter.insert(owner_field, identity.email.as_str());
    Ok(filter)
}
