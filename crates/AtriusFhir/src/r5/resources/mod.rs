pub mod body_structure;
pub use body_structure::*;

pub mod citation;
pub use citation::*;

pub mod observation;
pub use observation::*;

pub mod patient;
pub use patient::*;

pub mod resource;
pub use resource::*;
