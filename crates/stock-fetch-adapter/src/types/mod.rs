/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Task, token and file wire types for the fetch service
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

pub mod enums;
pub mod models;
pub mod requests;
pub mod responses;

pub use enums::*;
pub use models::*;
pub use requests::*;
pub use responses::*;
