pub mod entity;
pub mod layout;
pub mod util;
