pub mod email;

pub use email::{Email, EmailError, EmailQueue, LogMailer, Mailer};
