use docmodel::prelude::*;

#[derive(Record)]
struct Marker {}

fn main() {
    let marker = Marker {};

    assert!(marker.model().fields.is_empty());
    assert!(validate(&marker, &Context::default()).unwrap().is_empty());
}
