pub mod course;
pub mod department;
pub mod dispatch;
pub mod ledger;
pub mod policy;
pub mod prereq;
pub mod reset;
pub mod shared;
pub mod stats;
pub mod student;
