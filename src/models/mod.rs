pub mod birth;

pub use birth::{BirthDetails, BirthForm};
