pub mod coordinator;
pub mod model;
pub mod routes;


pub use coordinator::EmployeeCoordinator;
