//! Success envelopes

use serde::Serialize;

/// `{okay: true, data}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub okay: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { okay: true, data }
    }
}

/// `{okay: true, data: [...], itemCount}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCollectionResponse<T> {
    pub okay: bool,
    pub data: Vec<T>,
    pub item_count: usize,
}

impl<T> DataCollectionResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            okay: true,
            item_count: data.len(),
            data,
        }
    }
}
