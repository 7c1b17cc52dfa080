//! Knowledge base handlers.

mod index_article;
mod remove_article;

pub use index_article::{IndexArticleCommand, IndexArticleHandler, IndexArticleResult};
pub use remove_article::{RemoveArticleCommand, RemoveArticleHandler};
