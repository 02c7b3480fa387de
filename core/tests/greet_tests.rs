use mathoku::greet;

#[test]
fn greet_pins_the_template() {
    assert_eq!(greet("Ada"), "Hello, Ada from Rust!");
}

#[test]
fn greet_empty_name() {
    assert_eq!(greet(""), "Hello,  from Rust!");
}

#[test]
fn greet_non_ascii_name_is_kept_verbatim() {
    let name = "Zoë 数学 🦀";
    let greeting = greet(name);
    assert!(greeting.contains(name));
}

#[test]
fn greet_is_deterministic() {
    let names = ["", "Ada", "Grace Hopper", "名前", "line\nbreak"];
    for name in names {
        assert_eq!(greet(name), greet(name));
        assert!(greet(name).contains(name));
    }
}
