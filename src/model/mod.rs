pub mod entry;
pub mod id;
pub mod language;
pub mod user;

pub use entry::{Entry, EntryDraft};
pub use id::ObjectId;
pub use language::Language;
pub use user::{Role, User};
