pub mod models;
pub mod money;
pub mod pii;

pub use money::format_brl;
pub use pii::Masked;
