pub mod classes;
pub mod core;
pub mod parents;
pub mod reports;
pub mod results;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod tutors;
pub mod users;
