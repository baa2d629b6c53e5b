pub mod db;
pub mod workspace;
