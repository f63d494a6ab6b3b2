//! Wire-facing data models

use serde::{Deserialize, Serialize};

use crate::records::Record;

/// Public projection of a record
///
/// `Name` is the derived full name; the first/last split and the GUID are
/// never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub about: String,
    pub gender: String,
}

impl From<Record> for UserView {
    fn from(record: Record) -> Self {
        Self {
            name: record.full_name(),
            id: record.id,
            age: record.age,
            about: record.about,
            gender: record.gender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::record;

    #[test]
    fn test_user_view_json_shape() {
        let view = UserView::from(record(0, "Boyd", "Wolf", 22, "Nulla"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Id": 0,
                "Name": "Boyd Wolf",
                "Age": 22,
                "About": "Nulla",
                "Gender": "female",
            })
        );
    }
}
