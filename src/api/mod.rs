pub mod advance;
pub mod attendance;
pub mod payment;
pub mod payroll;
pub mod stats;
pub mod worker;
