//! UI Components

pub mod navbar;
pub mod network_banner;

pub use navbar::Navbar;
pub use network_banner::NetworkBanner;
