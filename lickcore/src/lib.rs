//! lickcore — tablature model, fretboard geometry, and storage for LickHouse

pub mod fretboard;
pub mod key;
pub mod lick;
pub mod session;
pub mod store;

pub use lick::{Lick, LickError, Measure, NotePlacement, Technique};
pub use session::EditSession;
pub use store::{FolderNode, LickEntry, LickStore, StoreError};
