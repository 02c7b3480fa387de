use mathoku::models::User;
use mathoku::{dummy_user, get_dummy_user_json};

#[test]
fn dummy_user_json_has_exactly_name_and_email() {
    let json = get_dummy_user_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let object = value.as_object().expect("dummy user should be a JSON object");

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["email", "name"]);
    assert!(object["name"].is_string());
    assert!(object["email"].is_string());
}

#[test]
fn dummy_user_json_parses_into_the_fixed_record() {
    let user: User = serde_json::from_str(&get_dummy_user_json().unwrap()).unwrap();
    assert_eq!(user.name, "John Doe");
    assert_eq!(user.email, "john.doe@example.com");
    assert_eq!(user, dummy_user());
}

#[test]
fn dummy_user_json_is_stable() {
    let first = get_dummy_user_json().unwrap();
    for _ in 0..10 {
        assert_eq!(get_dummy_user_json().unwrap(), first);
    }
}
