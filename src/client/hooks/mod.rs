mod discover;
mod home;
mod info;
mod paged;
mod search;
mod sections;

pub use discover::*;
pub use home::*;
pub use info::*;
pub use paged::PagedSnapshot;
pub use search::*;
pub use sections::*;
