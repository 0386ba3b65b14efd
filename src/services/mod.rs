// External service clients

pub mod email;
pub mod search;

pub use email::{MailError, MailService};
pub use search::{SearchError, SearchItem, SearchService};
