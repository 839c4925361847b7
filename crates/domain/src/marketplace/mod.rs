//! Marketplace resource models.
//!
//! Only the fields the client itself reads are typed; everything else the
//! backend sends is kept in `extra` so no data is lost on the way through.

mod amount;
mod contract;
mod listing;
mod page;
mod user;

pub use amount::Amount;
pub use contract::{Contract, ContractStatus, OfferRequest, PriceProposal};
pub use listing::{Listing, ListingUnit};
pub use page::Page;
pub use user::{RegisterRequest, Role, User};
