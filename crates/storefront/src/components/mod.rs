//! UI components of a shop.
//!
//! Components hold handles to the shop's stores and expose the data each part
//! of the page renders. They never own filter or cart state themselves.

mod catalog;
mod sidebar;

pub use catalog::{CatalogView, POPULAR_KEYWORDS, ProductFeed};
pub use sidebar::{MobileSidebar, MobileSidebarView, SIDEBAR_KEYWORDS, Sidebar, SidebarView};
