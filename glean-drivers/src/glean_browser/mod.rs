pub mod driver;
pub mod page;
pub mod session;

pub use driver::{ChromeSessionFactory, GleanDriver};
pub use session::{BrowserSession, DriverError, SessionFactory, Settle, WaitPolicy};
