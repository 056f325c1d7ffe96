pub mod checkin;
pub mod student;
