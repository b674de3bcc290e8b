//! Cafe listing model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The stable string key the store assigns to a listing.
///
/// Remote backends hand out their own push keys; the in-memory store
/// generates UUID v7 keys so they stay time-sortable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey(String);

impl EntryKey {
    /// Generate a new time-sortable key (in-memory store only).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this key
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for EntryKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A cafe listing as read from the store.
///
/// Field names on the wire match the backend collection exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CafeEntry {
    /// Display title
    #[serde(rename = "cafeTitle")]
    pub title: String,
    /// Free-text feature description
    #[serde(rename = "cafeFeatures")]
    pub features: String,
    /// Business hours text
    #[serde(rename = "cafeBusinesshours")]
    pub business_hours: String,
    /// Street address
    #[serde(rename = "cafeAddress")]
    pub address: String,
    /// Map reference URL
    #[serde(rename = "cafeMap")]
    pub map_url: String,
    /// Blob location of the cover image (e.g. `cafe-images/a.jpg`)
    #[serde(rename = "cafeImageLocation")]
    pub image_location: String,
    /// Server-assigned creation timestamp (Unix ms)
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

/// A cafe listing about to be written.
///
/// `createdAt` is not part of the draft: the store assigns it on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCafeEntry {
    #[serde(rename = "cafeTitle")]
    pub title: String,
    #[serde(rename = "cafeFeatures")]
    pub features: String,
    #[serde(rename = "cafeBusinesshours")]
    pub business_hours: String,
    #[serde(rename = "cafeAddress")]
    pub address: String,
    #[serde(rename = "cafeMap")]
    pub map_url: String,
    #[serde(rename = "cafeImageLocation")]
    pub image_location: String,
}

impl NewCafeEntry {
    /// Materialize the written record with the server-assigned timestamp.
    #[must_use]
    pub fn into_entry(self, created_at: i64) -> CafeEntry {
        CafeEntry {
            title: self.title,
            features: self.features,
            business_hours: self.business_hours,
            address: self.address,
            map_url: self.map_url,
            image_location: self.image_location,
            created_at,
        }
    }
}
