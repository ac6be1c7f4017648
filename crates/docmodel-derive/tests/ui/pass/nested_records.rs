use docmodel::prelude::*;
use std::collections::BTreeMap;

#[derive(Default, Record)]
#[record(rename_all = "camelCase")]
struct Order {
    #[record(tag = "orderId,required")]
    order_id: String,

    #[record(tag = ",omitempty")]
    lines: Vec<Line>,

    shipping: Option<Box<Address>>,
    meta: BTreeMap<String, Line>,

    #[record(tag = "-")]
    cache: Vec<u8>,
}

#[derive(Default, Record)]
struct Line {
    #[record(tag = "sku,required")]
    sku: String,
    qty: u32,
}

#[derive(Default, Record)]
struct Address {
    r#type: String,
}

fn main() {
    let order = Order::default();
    let model = order.model();

    assert_eq!(model.fields.len(), 5);
    assert_eq!(model.fields[0].name, "orderId");
    assert!(model.path.ends_with("::Order"));
    assert!(order.field(5).is_none());

    assert_eq!(Address::default().model().fields[0].ident, "type");
    assert_eq!(Line::default().model().fields[1].tag, "");
}
