use serde::{Deserialize, Serialize};

// Placeholder user shared with the front-end; the TypeScript type is generated by typeshare.
#[typeshare::typeshare]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}
