// Adapters layer: concrete implementations for external systems (http search, local storage).

pub mod local_storage;
pub mod scryfall;
