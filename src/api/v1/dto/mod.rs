pub mod profile;
pub mod status;
