use napi_derive::napi;
use serde::{Deserialize, Serialize};

#[napi(object)]
#[derive(Serialize, Deserialize, Debug)]
pub struct QueryResult {
    pub changes: i64,
    pub last_insert_rowid: i64,
}
