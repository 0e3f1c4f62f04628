//! Page modules

pub mod about;
pub mod browse;
pub mod holdings;

pub use about::AboutPage;
pub use browse::BrowsePage;
pub use holdings::HoldingsPage;
