pub mod dump;
pub mod run;
