use crate::error::CoreError;
use crate::models::User;

const DUMMY_NAME: &str = "John Doe";
const DUMMY_EMAIL: &str = "john.doe@example.com";

/// The fixed placeholder user the front-end renders.
pub fn dummy_user() -> User {
    User {
        name: DUMMY_NAME.to_string(),
        email: DUMMY_EMAIL.to_string(),
    }
}

/// Serialize the dummy user as `{"name": .., "email": ..}`.
///
/// Serializing two strings cannot fail; the `Result` only carries
/// serde_json's signature through to the ABI layer.
pub fn get_dummy_user_json() -> Result<String, CoreError> {
    Ok(serde_json::to_string(&dummy_user())?)
}
