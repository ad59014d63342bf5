pub mod cell;
pub mod decide;
pub mod heading;
pub mod maze;
pub mod update;
