pub mod m202601100001_create_students;
pub mod m202601100002_create_attendance;
