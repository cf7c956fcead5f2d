pub mod annotation;
pub mod coords;
pub mod enums;
pub mod insertion;
pub mod typedef;
