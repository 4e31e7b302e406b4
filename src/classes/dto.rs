use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub name: String,
    /// ISO-8601; parsed by the service so offset-less values can be placed in the class zone.
    pub date_time: String,
    pub instructor: String,
    pub available_slots: i32,
}
