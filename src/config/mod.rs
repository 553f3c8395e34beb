//! Configuration module

mod site;

pub use site::CommentsConfig;
pub use site::ReadingConfig;
pub use site::SiteConfig;
pub use site::StoreConfig;
