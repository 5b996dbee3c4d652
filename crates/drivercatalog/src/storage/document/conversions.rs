//! Driver attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and the
//! `Driver` aggregate. These are testable in isolation without DynamoDB access,
//! and are the only place that knows the stored document shape.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use drivercatalog_core::driver::{Address, Car, Driver, Name};
use drivercatalog_core::storage::{RepositoryError, SortField};

use super::Item;

// ============================================================================
// Attribute names
// ============================================================================

pub const ID: &str = "Id";
pub const CREATED_AT: &str = "CreatedAt";
pub const MODIFIED_AT: &str = "ModifiedAt";
pub const NAME: &str = "Name";
pub const ADDRESS: &str = "Address";
pub const CAR: &str = "Car";

pub const FIRST_NAME: &str = "FirstName";
pub const LAST_NAME: &str = "LastName";
pub const FULL_ADDRESS: &str = "FullAddress";
pub const LONGITUDE: &str = "Longitude";
pub const LATITUDE: &str = "Latitude";
pub const MAKER: &str = "Maker";
pub const MODEL: &str = "Model";
pub const LICENSE_PLATE: &str = "LicensePlate";

// ============================================================================
// Driver conversions
// ============================================================================

/// Generate the primary key of a driver record.
pub fn driver_key(id: &str) -> Item {
    HashMap::from([(ID.to_string(), AttributeValue::S(id.to_string()))])
}

/// Convert a Driver to a DynamoDB item.
///
/// An unset `ModifiedAt` is written as an explicit NULL rather than omitted.
pub fn driver_to_item(driver: &Driver) -> Item {
    let mut item = HashMap::new();

    item.insert(ID.to_string(), AttributeValue::S(driver.id.clone()));
    item.insert(
        CREATED_AT.to_string(),
        AttributeValue::S(driver.created_at.to_rfc3339()),
    );
    item.insert(
        MODIFIED_AT.to_string(),
        match &driver.modified_at {
            Some(modified_at) => AttributeValue::S(modified_at.to_rfc3339()),
            None => AttributeValue::Null(true),
        },
    );

    if let Some(name) = &driver.name {
        item.insert(NAME.to_string(), AttributeValue::M(name_to_map(name)));
    }
    if let Some(address) = &driver.address {
        item.insert(
            ADDRESS.to_string(),
            AttributeValue::M(address_to_map(address)),
        );
    }
    if let Some(car) = &driver.car {
        item.insert(CAR.to_string(), AttributeValue::M(car_to_map(car)));
    }

    item
}

/// Convert a DynamoDB item to a Driver.
pub fn item_to_driver(item: &Item) -> Result<Driver, RepositoryError> {
    let name = match get_optional_map(item, NAME)? {
        Some(map) => Some(map_to_name(map)?),
        None => None,
    };
    let address = match get_optional_map(item, ADDRESS)? {
        Some(map) => Some(map_to_address(map)?),
        None => None,
    };
    let car = match get_optional_map(item, CAR)? {
        Some(map) => Some(map_to_car(map)?),
        None => None,
    };

    Ok(Driver {
        id: get_string(item, ID)?,
        created_at: get_datetime(item, CREATED_AT)?,
        modified_at: get_nullable_datetime(item, MODIFIED_AT)?,
        name,
        address,
        car,
    })
}

/// Read the sort key of a raw driver item: `Name.<field>`.
pub fn name_sort_key(item: &Item, field: SortField) -> Result<&str, RepositoryError> {
    let name = item
        .get(NAME)
        .and_then(|v| v.as_m().ok())
        .ok_or_else(|| missing_field(NAME))?;
    let key = field.attribute_name();

    name.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.as_str())
        .ok_or_else(|| missing_field(&format!("{NAME}.{key}")))
}

// ============================================================================
// Value object conversions
// ============================================================================

fn name_to_map(name: &Name) -> Item {
    HashMap::from([
        (
            FIRST_NAME.to_string(),
            AttributeValue::S(name.first_name.clone()),
        ),
        (
            LAST_NAME.to_string(),
            AttributeValue::S(name.last_name.clone()),
        ),
    ])
}

fn map_to_name(map: &Item) -> Result<Name, RepositoryError> {
    Ok(Name {
        first_name: get_string(map, FIRST_NAME)?,
        last_name: get_string(map, LAST_NAME)?,
    })
}

fn address_to_map(address: &Address) -> Item {
    let mut map = HashMap::new();
    map.insert(
        FULL_ADDRESS.to_string(),
        AttributeValue::S(address.full_address.clone()),
    );
    if let Some(longitude) = &address.longitude {
        map.insert(LONGITUDE.to_string(), AttributeValue::S(longitude.clone()));
    }
    if let Some(latitude) = &address.latitude {
        map.insert(LATITUDE.to_string(), AttributeValue::S(latitude.clone()));
    }
    map
}

fn map_to_address(map: &Item) -> Result<Address, RepositoryError> {
    Ok(Address {
        full_address: get_string(map, FULL_ADDRESS)?,
        longitude: get_optional_string(map, LONGITUDE)?,
        latitude: get_optional_string(map, LATITUDE)?,
    })
}

fn car_to_map(car: &Car) -> Item {
    HashMap::from([
        (MAKER.to_string(), AttributeValue::S(car.maker.clone())),
        (MODEL.to_string(), AttributeValue::S(car.model.clone())),
        (
            LICENSE_PLATE.to_string(),
            AttributeValue::S(car.license_plate.clone()),
        ),
    ])
}

fn map_to_car(map: &Item) -> Result<Car, RepositoryError> {
    Ok(Car {
        maker: get_string(map, MAKER)?,
        model: get_string(map, MODEL)?,
        license_plate: get_string(map, LICENSE_PLATE)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn missing_field(key: &str) -> RepositoryError {
    RepositoryError::InvalidData(format!("Missing or invalid field: {}", key))
}

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| missing_field(key))
}

/// Get an optional string attribute. A present key holding anything but a
/// string is malformed.
fn get_optional_string(item: &Item, key: &str) -> Result<Option<String>, RepositoryError> {
    match item.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_s()
            .map(|s| Some(s.to_string()))
            .map_err(|_| missing_field(key)),
    }
}

/// Get an optional nested map. A present key holding anything but a map is
/// malformed.
fn get_optional_map<'a>(item: &'a Item, key: &str) -> Result<Option<&'a Item>, RepositoryError> {
    match item.get(key) {
        None => Ok(None),
        Some(value) => value.as_m().map(Some).map_err(|_| missing_field(key)),
    }
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(item: &Item, key: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    parse_datetime(key, &s)
}

/// Get a datetime attribute that may hold the NULL marker. A missing key reads
/// the same as NULL.
fn get_nullable_datetime(item: &Item, key: &str) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    match item.get(key) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::S(s)) => parse_datetime(key, s).map(Some),
        Some(_) => Err(missing_field(key)),
    }
}

fn parse_datetime(key: &str, s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}
