use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub class_id: i64,
}
