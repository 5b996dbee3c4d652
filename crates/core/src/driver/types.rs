use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A driver's full name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Name {
    pub first_name: String,
    pub last_name: String,
}

impl Name {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// Where a driver lives. Coordinates are kept as the strings the caller provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub full_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
}

impl Address {
    /// Creates an address without coordinates.
    pub fn new(full_address: impl Into<String>) -> Self {
        Self {
            full_address: full_address.into(),
            longitude: None,
            latitude: None,
        }
    }

    /// Sets both coordinates.
    pub fn with_coordinates(
        mut self,
        longitude: impl Into<String>,
        latitude: impl Into<String>,
    ) -> Self {
        self.longitude = Some(longitude.into());
        self.latitude = Some(latitude.into());
        self
    }
}

/// The car a driver operates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Car {
    pub maker: String,
    pub model: String,
    pub license_plate: String,
}

impl Car {
    pub fn new(
        maker: impl Into<String>,
        model: impl Into<String>,
        license_plate: impl Into<String>,
    ) -> Self {
        Self {
            maker: maker.into(),
            model: model.into(),
            license_plate: license_plate.into(),
        }
    }
}

/// A driver registered in the catalog.
///
/// `modified_at` stays `None` until the driver has been updated at least once
/// after creation. The nested objects are optional because a stored record may
/// lack them entirely, and that absence is preserved on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Driver {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car: Option<Car>,
}

impl Driver {
    /// Creates a new driver with a random ID, created now.
    pub fn new(name: Name, address: Address, car: Car) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            modified_at: None,
            name: Some(name),
            address: Some(address),
            car: Some(car),
        }
    }

    /// Sets a specific ID for this driver (useful for testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Stamps the driver as modified at `now`. Call before re-saving an
    /// existing driver.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_at = Some(now);
    }

    /// Returns true if the driver has never been updated since creation.
    pub fn is_new(&self) -> bool {
        self.modified_at.is_none()
    }
}
