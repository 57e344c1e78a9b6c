//! Theater records.

use serde::{Deserialize, Serialize};

use super::TheaterId;

/// A venue where showings take place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theater {
    pub id: TheaterId,
    pub name: String,
}

impl Theater {
    pub fn new(id: impl Into<TheaterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
