//! HTTP fetch collaborator for the bot's third-party data commands.
//!
//! [`HttpFetcher::fetch`] returns the status code and JSON body of a GET
//! request, caching successful responses for a short time. The typed records
//! in this crate are built from a [`FetchResponse`] by explicit field mapping;
//! a missing field is an error, never a default.

mod client;
mod error;
mod records;

pub use client::{FetchResponse, HttpFetcher};
pub use error::FetchError;
pub use records::{cat_image_url, BitcoinPrice, CovidStatus, DogImage, FactRecord};

/// Endpoints used by the bot commands.
pub mod endpoints {
    pub const FACT: &str = "https://uselessfacts.jsph.pl/random.json?language=en";
    pub const DOG: &str = "https://dog.ceo/api/breeds/image/random";
    pub const BITCOIN: &str = "https://api.coindesk.com/v1/bpi/currentprice/BTC.json";
    pub const COVID: &str =
        "https://api.apify.com/v2/key-value-stores/EaCBL1JNntjR3EakU/records/LATEST?disableRedirect=true";
    pub const CAT_BASE: &str = "https://cataas.com";
}
