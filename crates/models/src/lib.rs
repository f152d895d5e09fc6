pub mod errors;
pub mod db;
pub mod car;
pub mod reservation;
