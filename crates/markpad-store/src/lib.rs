/// Durable persistence for the editor's current code and saved snapshots.
///
/// `RedbStore` implements `markpad_core::CodeStore` on top of an embedded
/// redb database kept in the application's data directory.
pub mod store;

pub use store::RedbStore;
