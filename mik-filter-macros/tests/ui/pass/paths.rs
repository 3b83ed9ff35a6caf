// Generated code must not depend on names in scope at the call site
mod models {
    #[derive(mik_filter::Filterable)]
    pub struct Item {
        pub sku: String,
        pub price: f32,
    }
}

struct Shape;
struct FieldKind;

fn main() {
    let _ = (Shape, FieldKind);
    let specs = mik_filter::field_specs::<models::Item>();
    assert_eq!(specs.len(), 2);
}
