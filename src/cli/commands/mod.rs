pub mod authz;
pub mod db;
pub mod token;
