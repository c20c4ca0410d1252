pub mod converter;
pub mod dispatch;
pub mod power;
