pub mod guard;
pub mod visibility;

pub use visibility::{RouteTable, RouteTableBuilder, Visibility};
