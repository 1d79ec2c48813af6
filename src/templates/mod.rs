//! Built-in storefront templates

mod bags;
mod classic;
mod gold;
mod wedding;

pub use bags::Bags;
pub use classic::Classic;
pub use gold::Gold;
pub use wedding::Wedding;
