pub mod assign;
pub mod edit;
pub mod hours;
pub mod init;
pub mod place;
pub mod setup;
pub mod status;
pub mod survey;
pub mod sync;
