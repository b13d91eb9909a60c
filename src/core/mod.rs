pub mod finder;
pub mod resolver;
pub mod single_flight;

pub use crate::domain::model::{CommanderRecord, ScryfallCard, SearchOutcome, SelectionMode};
pub use crate::domain::ports::{CardSearch, ConfigProvider, Storage};
pub use crate::utils::error::Result;
