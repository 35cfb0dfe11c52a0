pub mod dispatch;
pub mod entities;
pub mod show;
pub mod sync;
