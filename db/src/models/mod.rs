pub mod attendance;
pub mod student;

pub use attendance::Entity as Attendance;
pub use student::Entity as Student;
