use mik_filter::{Filterable, Whitelist};

#[derive(Filterable)]
pub struct Order {
    pub id: u64,
    #[filter(rename = "state")]
    pub status: String,
    #[filter(skip)]
    pub internal_note: String,
    pub shipped_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn main() {
    let whitelist = Whitelist::for_type::<Order>();
    assert!(whitelist.contains("state"));
    assert!(!whitelist.contains("internal_note"));
}
