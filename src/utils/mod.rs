pub mod feedback;
pub mod html;
pub mod logging;
pub mod validation;
