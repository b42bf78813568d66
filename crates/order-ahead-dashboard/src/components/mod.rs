// crates/order-ahead-dashboard/src/components/mod.rs

pub mod order_list;
pub mod order_details;
pub mod status_bar;
pub mod help;
