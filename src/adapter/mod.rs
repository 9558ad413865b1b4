pub mod catalog;
pub mod datastore;
