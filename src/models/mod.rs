mod filter;
mod goal;
mod recurring;
mod session;
mod transaction;

pub use filter::TransactionFilter;
pub use goal::Goal;
pub use recurring::RecurringTransaction;
pub use session::{Session, SessionStore, User};
pub use transaction::{Ledger, Transaction};
