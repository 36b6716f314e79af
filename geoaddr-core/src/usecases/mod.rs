mod change_gate;
mod error;
mod format_display;
mod lookup_address;
mod resolve_address;
mod select_candidate;


pub use self::{
    change_gate::*, error::Error, format_display::*, lookup_address::*, resolve_address::*,
    select_candidate::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::entities::*;
}
