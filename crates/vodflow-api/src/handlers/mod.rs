pub mod finalize;
pub mod health;
pub mod modify;
pub mod upload;
