pub mod advance;
pub mod attendance;
pub mod payment;
pub mod salary;
pub mod worker;
