/// Greeting used to verify the bridge round trip works.
pub fn greet(name: &str) -> String {
    format!("Hello, {name} from Rust!")
}
