pub mod types;

pub use types::{
    DrawInstruction, GregorianDate, HebrewCalendarDate, PersonalDetails, Rgb,
};
