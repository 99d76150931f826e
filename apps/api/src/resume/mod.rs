// Resume builder core: document model, section editor, template styling,
// persistence and the editing session that ties them together.

pub mod document;
pub mod editor;
pub mod handlers;
pub mod session;
pub mod store;
pub mod template;
