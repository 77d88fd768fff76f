use super::*;

mod notes;
mod organize;
mod report;
