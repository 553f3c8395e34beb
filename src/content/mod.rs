//! Content module - resolves posts, sibling navigation and reading time

pub mod navigation;
pub mod page;
pub mod paths;
mod post;
pub mod reading_time;
pub mod resolver;

pub use navigation::SiblingNavigator;
pub use page::{PageResolver, StaticProps};
pub use paths::{Fallback, PathEnumerator, PathParams, StaticPaths};
pub use post::{
    CorpusListing, CorpusRecord, NavigationEntry, NavigationItems, Post, PostPage,
    RichTextBlock, Section,
};
pub use reading_time::ReadingTimeEstimator;
pub use resolver::{ContentResolver, ResolveError};
