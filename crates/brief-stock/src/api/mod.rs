//! Clients for the generation, market-data and news collaborators

pub mod crew;
pub mod news_apis;
pub mod yahoo;

pub use crew::CrewClient;
pub use news_apis::{FinnhubClient, FinnhubNewsArticle};
pub use yahoo::YahooFinanceClient;
