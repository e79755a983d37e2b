pub mod definition;
pub mod deletion;
pub mod linker;
pub mod search;
pub mod users;
