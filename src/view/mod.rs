//! Interactive table exploration: paging primitives and the view controller
//! that composes filter → sort → paginate.

pub mod page;
pub mod state;
