crate::declare_model! {
    /// An amenity a place can offer, e.g. "Wifi".
    pub struct Amenity {
        pub name: String = String::new(),
    }
}
