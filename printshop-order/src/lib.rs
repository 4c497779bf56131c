pub mod models;
pub mod totals;
pub mod status;
pub mod manager;
pub mod changes;
pub mod finance;
pub mod timeline;
pub mod filter;
pub mod stats;
pub mod print;

pub use models::{LineItem, Order, OrderStatus, PaymentMethod, PaymentStatus, Quote, QuoteStatus};
pub use totals::{PricedDocument, Totals};
pub use status::{StatusLabel, StatusPolicy, TransitionError};
pub use manager::{OrderError, OrderManager};
pub use changes::{ChangeError, ChangeHandler, NumericInput};
pub use finance::{Payment, PaymentError, PaymentLedger, PaymentRecordStatus, PaymentSummary};
pub use timeline::{TimelineEvent, TimelineEventKind};
pub use filter::{DateRange, OrderFilter, QuoteFilter};
pub use print::{PrintDocument, PrintParty};
pub use stats::{product_statistics, top_products, MonthlySales, ProductSales, ProductStatistics};
