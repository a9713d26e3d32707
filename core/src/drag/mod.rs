pub mod session;

pub use session::{DragSession, DropOutcome, DropTarget};
