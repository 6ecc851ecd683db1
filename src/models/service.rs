use crate::models::Document;

/// Fields returned by `GET /services/{id}`
pub const SERVICE_PROJECTION: [&str; 7] = [
    "_id",
    "service_id",
    "title",
    "img",
    "price",
    "description",
    "facility",
];

/// Keeps only the projected fields of a service document.
///
/// Values are passed through as stored; absent fields stay absent.
pub fn project_service(mut service: Document) -> Document {
    SERVICE_PROJECTION
        .iter()
        .filter_map(|&key| service.remove(key).map(|value| (key.to_string(), value)))
        .collect::<Document>()
}
