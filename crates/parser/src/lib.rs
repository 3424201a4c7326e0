pub mod html;
pub mod wallets;

pub use html::{process_page, ProcessedPage};
pub use wallets::find_wallets;
